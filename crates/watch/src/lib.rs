//! Cache directory watching and upload-job dispatch.
//!
//! The game writes a fresh hotfix cache to a temporary name and renames it
//! to `DBCache.bin` when complete; that rename is the "file ready" signal.
//! One non-recursive watch per existing deployment channel feeds a bounded
//! job queue of depth one, so a cache landing while an upload is running is
//! dropped instead of piling up.

mod targets;
mod watcher;

pub use targets::{CHANNELS, LOCALE, WatchTarget, cache_dir, watch_targets};
pub use watcher::{CacheWatcher, UploadJob, cache_ready_path};

/// Filename the watcher reacts to, exactly.
pub const CACHE_FILENAME: &str = "DBCache.bin";

/// Extension filter applied before the exact-name check.
pub const CACHE_EXTENSION: &str = "bin";

/// Capacity of the upload-job queue: one job may wait while one runs;
/// anything beyond that is dropped.
pub const JOB_QUEUE_DEPTH: usize = 1;

/// Errors from establishing filesystem watches.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("filesystem watch error: {0}")]
    Notify(#[from] notify::Error),
}
