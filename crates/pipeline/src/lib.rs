//! Upload pipeline orchestration.
//!
//! Drives one triggered cache file through validate → package → upload →
//! notify. Every failure is absorbed here and turned into a user
//! notification; nothing a single job does can take down the watch loop.

mod notify;
mod pipeline;
mod worker;

pub use notify::{Notifier, Severity};
pub use pipeline::{JobError, PipelineContext, UploadPipeline};
pub use worker::run_worker;

/// Install-info file read fresh per job and sent base64-encoded alongside
/// the archive.
pub const BUILD_INFO_FILE: &str = ".build.info";
