use std::path::{Path, PathBuf};

/// Deployment channels that may carry a cache directory.
pub const CHANNELS: &[&str] = &["_retail_", "_ptr_", "_beta_"];

/// Locale subdirectory the game writes its caches under.
pub const LOCALE: &str = "enUS";

/// One monitored cache directory, tied to its deployment channel.
///
/// Built once at startup; the set never changes for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Channel directory name, e.g. `_retail_`.
    pub channel: String,
    /// Absolute cache directory being watched.
    pub dir: PathBuf,
}

/// Cache directory for one channel under the install root.
pub fn cache_dir(install_dir: &Path, channel: &str) -> PathBuf {
    install_dir
        .join(channel)
        .join("Cache")
        .join("ADB")
        .join(LOCALE)
}

/// Builds one [`WatchTarget`] per channel whose cache directory exists.
///
/// A missing channel (not installed, or never launched) is skipped silently;
/// an install with no cache directories at all yields an empty set.
pub fn watch_targets(install_dir: &Path) -> Vec<WatchTarget> {
    CHANNELS
        .iter()
        .map(|channel| WatchTarget {
            channel: (*channel).to_string(),
            dir: cache_dir(install_dir, channel),
        })
        .filter(|target| target.dir.is_dir())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_layout() {
        let dir = cache_dir(Path::new("/games/wow"), "_retail_");
        assert_eq!(dir, Path::new("/games/wow/_retail_/Cache/ADB/enUS"));
    }

    #[test]
    fn only_existing_channels_kept() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(cache_dir(tmp.path(), "_retail_")).unwrap();
        std::fs::create_dir_all(cache_dir(tmp.path(), "_beta_")).unwrap();

        let targets = watch_targets(tmp.path());
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].channel, "_retail_");
        assert_eq!(targets[1].channel, "_beta_");
    }

    #[test]
    fn empty_install_yields_no_targets() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(watch_targets(tmp.path()).is_empty());
    }

    #[test]
    fn channel_dir_without_cache_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("_retail_")).unwrap();
        assert!(watch_targets(tmp.path()).is_empty());
    }
}
