//! Cache archive upload client.
//!
//! One multipart POST per triggering cache file to the wow.tools upload
//! endpoint. HTTP-level rejection is an outcome, not an error; only
//! transport failures surface as [`UploadError`].

mod client;

pub use client::{UploadClient, UploadOutcome};

/// Fixed upload endpoint.
pub const UPLOAD_ENDPOINT: &str = "https://wow.tools/dbc/api/cache/uploadzip";

/// Multipart form field name for the archive part.
pub const FORM_PART_NAME: &str = "files";

/// Filename reported for the archive part.
pub const ARCHIVE_FILENAME: &str = "Cache.zip";

/// Header carrying the base64-encoded `.build.info` contents.
pub const BUILD_INFO_HEADER: &str = "WT-BuildInfo";

/// Header carrying the opaque user API token.
pub const USER_TOKEN_HEADER: &str = "WT-UserToken";

/// Client identifier sent as the `User-Agent`.
pub const CLIENT_IDENT: &str = "WoW.Tools uploader";

/// Errors from the upload client.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("API token is not a valid header value")]
    InvalidToken,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
