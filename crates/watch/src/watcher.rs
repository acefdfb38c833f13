use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::{CACHE_EXTENSION, CACHE_FILENAME, WatchError, WatchTarget};

/// One triggered upload, consumed by the pipeline worker and then discarded.
#[derive(Debug, Clone)]
pub struct UploadJob {
    /// Path of the cache file that was renamed into place.
    pub path: PathBuf,
    /// Event arrival time, epoch milliseconds.
    pub received_at: i64,
}

impl UploadJob {
    /// Creates a job for `path`, stamped with the current time.
    pub fn new(path: PathBuf) -> Self {
        let received_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self { path, received_at }
    }
}

/// Filesystem watcher over the configured cache directories.
///
/// The notify callback runs on the OS notification thread and must return
/// promptly, so it only filters the event and hands the job off with a
/// non-blocking send. A full queue means an upload is already in flight and
/// the event is dropped.
pub struct CacheWatcher {
    watcher: RecommendedWatcher,
    watched: Vec<WatchTarget>,
}

impl CacheWatcher {
    /// Creates the watcher, dispatching matching events into `jobs`.
    pub fn new(jobs: mpsc::Sender<UploadJob>) -> Result<Self, WatchError> {
        let watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let Some(path) = cache_ready_path(&event) {
                        dispatch(&jobs, path);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "filesystem watch error"),
            },
            notify::Config::default(),
        )?;

        Ok(Self {
            watcher,
            watched: Vec::new(),
        })
    }

    /// Adds a non-recursive watch on `target`'s directory.
    pub fn watch(&mut self, target: &WatchTarget) -> Result<(), WatchError> {
        self.watcher.watch(&target.dir, RecursiveMode::NonRecursive)?;
        self.watched.push(target.clone());
        tracing::info!(
            channel = %target.channel,
            dir = %target.dir.display(),
            "watching cache directory"
        );
        Ok(())
    }

    /// Targets currently being watched.
    pub fn watched(&self) -> &[WatchTarget] {
        &self.watched
    }
}

/// Returns the resulting path if `event` is the canonical cache file being
/// renamed into existence.
///
/// Filters in order: rename-to event kind, `.bin` extension, exact filename.
/// Plain writes are ignored; the game signals completion only by renaming.
pub fn cache_ready_path(event: &Event) -> Option<PathBuf> {
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both)) => {}
        _ => return None,
    }

    // For a paired rename the destination is the last path.
    let path = event.paths.last()?;

    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_none_or(|e| e != CACHE_EXTENSION)
    {
        return None;
    }
    if path
        .file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n != CACHE_FILENAME)
    {
        return None;
    }

    Some(path.clone())
}

fn dispatch(jobs: &mpsc::Sender<UploadJob>, path: PathBuf) {
    let job = UploadJob::new(path);
    match jobs.try_send(job) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(job)) => {
            tracing::debug!(
                path = %job.path.display(),
                "upload already in flight, dropping cache event"
            );
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            tracing::warn!("upload job queue closed, dropping cache event");
        }
    }
}
