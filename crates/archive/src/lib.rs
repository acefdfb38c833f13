//! In-memory cache archive builder.
//!
//! Packages a triggering cache file plus any sibling WDB caches into a
//! single compressed archive. The whole payload is materialized in memory
//! before upload starts; the multipart body needs a known length.

mod builder;

pub use builder::{ArchivePayload, aux_dir_for, build};

/// Entry name of the primary cache file inside the archive, whatever the
/// source file was called on disk.
pub const CANONICAL_ENTRY_NAME: &str = "DBCache.bin";

/// Extension of auxiliary cache files picked up next to the primary.
pub const AUX_EXTENSION: &str = "wdb";

/// Errors produced while building an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("cache file unavailable: {path}: {source}")]
    FileUnavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
