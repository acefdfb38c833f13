use std::path::PathBuf;
use std::sync::Arc;

use wowcache_archive::ArchiveError;
use wowcache_format::FormatError;
use wowcache_upload::{UploadClient, UploadError, UploadOutcome};
use wowcache_watch::UploadJob;

use crate::notify::{Notifier, Severity};
use crate::BUILD_INFO_FILE;

/// Read-only configuration snapshot injected at construction.
///
/// The pipeline never reaches back into settings storage mid-job.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Game install root; `.build.info` lives directly under it.
    pub install_dir: PathBuf,
    /// Whether successful uploads produce a notification. Failures are
    /// always reported.
    pub show_success_notifications: bool,
}

/// Why a job never reached a server response.
///
/// HTTP-level rejection is not in here — a non-2xx reply is an
/// [`UploadOutcome`] and handled in the notify step.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("cache file has an invalid signature")]
    InvalidFormat,

    #[error("file unavailable: {0}")]
    FileUnavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected error: {0}")]
    Internal(String),
}

impl From<FormatError> for JobError {
    fn from(e: FormatError) -> Self {
        match e {
            FormatError::InvalidMagic { .. } => JobError::InvalidFormat,
            FormatError::Io(e) => JobError::Internal(e.to_string()),
        }
    }
}

impl From<ArchiveError> for JobError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::FileUnavailable { path, .. } => JobError::FileUnavailable(path),
            other => JobError::Internal(other.to_string()),
        }
    }
}

impl From<UploadError> for JobError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Network(e) => JobError::Network(e.to_string()),
            other => JobError::Internal(other.to_string()),
        }
    }
}

/// Per-job orchestration: validate, package, upload, notify.
pub struct UploadPipeline {
    ctx: PipelineContext,
    client: UploadClient,
    notifier: Arc<dyn Notifier>,
}

impl UploadPipeline {
    /// Creates a pipeline over the given client and notification sink.
    pub fn new(ctx: PipelineContext, client: UploadClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            ctx,
            client,
            notifier,
        }
    }

    /// Runs one job to completion and reports the outcome.
    ///
    /// Never propagates an error upward: whatever happens, the worker loop
    /// stays alive for the next cache rename.
    pub async fn run(&self, job: UploadJob) {
        tracing::info!(path = %job.path.display(), "cache upload triggered");
        self.notifier.upload_started();

        match self.execute(&job).await {
            Ok(outcome) if outcome.success => {
                tracing::info!(status = outcome.status, "cache uploaded");
                if self.ctx.show_success_notifications {
                    self.notifier
                        .notify("Uploaded", "Cache successfully uploaded!", Severity::Info);
                }
            }
            Ok(outcome) => {
                tracing::warn!(status = outcome.status, "server rejected cache upload");
                self.notifier.notify(
                    "Error uploading cache",
                    &format!("Server responded with HTTP {}", outcome.status),
                    Severity::Error,
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache upload failed");
                let (title, message) = failure_notification(&e);
                self.notifier.notify(title, &message, Severity::Error);
            }
        }

        self.notifier.upload_finished();
    }

    /// Validating → Packaging → Uploading. Stops at the first failed step;
    /// validation failures never reach the network.
    async fn execute(&self, job: &UploadJob) -> Result<UploadOutcome, JobError> {
        let mut cache_file = std::fs::File::open(&job.path)
            .map_err(|_| JobError::FileUnavailable(job.path.display().to_string()))?;
        wowcache_format::validate(&mut cache_file)?;
        drop(cache_file);

        let payload = wowcache_archive::build(&job.path)?;
        tracing::debug!(entries = payload.entry_count(), "archive packaged");

        let build_info_path = self.ctx.install_dir.join(BUILD_INFO_FILE);
        let build_info = std::fs::read(&build_info_path)
            .map_err(|_| JobError::FileUnavailable(build_info_path.display().to_string()))?;

        // An empty-but-valid cache is still uploaded; the server decides
        // whether it is worth keeping.
        let outcome = self.client.upload(payload.into_bytes(), &build_info).await?;
        Ok(outcome)
    }
}

/// Title/message pair for a failed job, matching what users have seen from
/// this tool historically.
fn failure_notification(error: &JobError) -> (&'static str, String) {
    match error {
        JobError::InvalidFormat => ("Error uploading cache!", "Cache file is invalid!".into()),
        JobError::FileUnavailable(_) => ("Error reading cache!", "File not found".into()),
        JobError::Network(msg) => (
            "Error uploading cache",
            format!("Could not reach server: {msg}"),
        ),
        JobError::Internal(msg) => ("Error uploading cache", format!("Unexpected error: {msg}")),
    }
}
