use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use wowcache_watch::UploadJob;

use crate::pipeline::UploadPipeline;

/// Dedicated serial consumer of the upload-job queue.
///
/// One job at a time, start to finish: no two archive builds or uploads
/// ever overlap, and notifications go out in completion order. The loop
/// outlives every job outcome and ends only on cancellation or when all
/// senders are gone.
pub async fn run_worker(
    mut jobs: mpsc::Receiver<UploadJob>,
    pipeline: UploadPipeline,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            job = jobs.recv() => {
                match job {
                    Some(job) => pipeline.run(job).await,
                    None => break,
                }
            }
        }
    }
    tracing::debug!("upload worker stopped");
}
