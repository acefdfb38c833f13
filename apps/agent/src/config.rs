//! Agent configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/wowcache/agent.toml`
//! - Windows: `%APPDATA%/wowcache/agent.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use wowcache_pipeline::BUILD_INFO_FILE;
use wowcache_watch::{CHANNELS, cache_dir};

/// Agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Game install root (the directory holding `_retail_`, `.build.info`).
    #[serde(default)]
    pub install_dir: String,

    /// API token sent with every upload.
    #[serde(default)]
    pub api_token: String,

    /// Whether successful uploads show a notification. Failures always do.
    #[serde(default = "default_true")]
    pub show_notifications: bool,

    /// Register the agent to start at login.
    #[serde(default)]
    pub run_at_login: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_dir: String::new(),
            api_token: String::new(),
            show_notifications: true,
            run_at_login: false,
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        // The token is a credential; restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Checks that `install_dir` looks like a real game install: at least one
/// channel cache directory plus the `.build.info` file.
pub fn is_valid_install_dir(install_dir: &Path) -> bool {
    if !install_dir.is_dir() {
        return false;
    }

    let has_cache = CHANNELS
        .iter()
        .any(|channel| cache_dir(install_dir, channel).is_dir());

    has_cache && install_dir.join(BUILD_INFO_FILE).is_file()
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("wowcache").join("agent.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("wowcache")
            .join("agent.toml"))
    }
}
