//! Run-at-login capability.
//!
//! The core pipeline knows nothing about how a host registers login items;
//! this trait is the whole contract. Freedesktop hosts get an XDG autostart
//! entry; anything else is a logged no-op.

use std::io;
use std::path::PathBuf;

/// Host capability for starting the agent at login.
pub trait Autostart: Send + Sync {
    fn enable(&self) -> io::Result<()>;
    fn disable(&self) -> io::Result<()>;
    fn is_enabled(&self) -> bool;
}

/// Brings the host registration in line with the configured flag.
pub fn apply(autostart: &dyn Autostart, run_at_login: bool) -> io::Result<()> {
    if run_at_login == autostart.is_enabled() {
        return Ok(());
    }
    if run_at_login {
        autostart.enable()
    } else {
        autostart.disable()
    }
}

/// Returns the autostart implementation for this host.
pub fn platform_autostart() -> Box<dyn Autostart> {
    #[cfg(unix)]
    {
        Box::new(XdgAutostart::new())
    }

    #[cfg(not(unix))]
    {
        Box::new(UnsupportedAutostart)
    }
}

/// XDG autostart via a `.desktop` entry in `~/.config/autostart`.
pub struct XdgAutostart {
    dir: PathBuf,
    exec: String,
}

impl XdgAutostart {
    pub fn new() -> Self {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
                PathBuf::from(home).join(".config")
            });
        let exec = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "wowcache-agent".into());

        Self {
            dir: config_home.join("autostart"),
            exec,
        }
    }

    /// Entry rooted at an explicit directory, for tests.
    pub fn with_dir(dir: PathBuf, exec: String) -> Self {
        Self { dir, exec }
    }

    fn entry_path(&self) -> PathBuf {
        self.dir.join("wowcache.desktop")
    }
}

impl Autostart for XdgAutostart {
    fn enable(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let entry = format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=wowcache\n\
             Comment=Uploads DBCache hotfix files\n\
             Exec={}\n\
             X-GNOME-Autostart-enabled=true\n",
            self.exec
        );
        std::fs::write(self.entry_path(), entry)?;
        tracing::info!(entry = %self.entry_path().display(), "autostart enabled");
        Ok(())
    }

    fn disable(&self) -> io::Result<()> {
        match std::fs::remove_file(self.entry_path()) {
            Ok(()) => {
                tracing::info!("autostart disabled");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn is_enabled(&self) -> bool {
        self.entry_path().is_file()
    }
}

/// Fallback for hosts without a supported login-item mechanism.
pub struct UnsupportedAutostart;

impl Autostart for UnsupportedAutostart {
    fn enable(&self) -> io::Result<()> {
        tracing::warn!("run-at-login is not supported on this host");
        Ok(())
    }

    fn disable(&self) -> io::Result<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
