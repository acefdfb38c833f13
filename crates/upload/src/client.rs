use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart;

use crate::{
    ARCHIVE_FILENAME, BUILD_INFO_HEADER, CLIENT_IDENT, FORM_PART_NAME, UPLOAD_ENDPOINT,
    USER_TOKEN_HEADER, UploadError,
};

/// Bound on a single upload attempt, connect included. The transport default
/// would wait indefinitely on a stalled connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one upload attempt that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    /// `true` for any 2xx response.
    pub success: bool,
    /// HTTP status code of the response.
    pub status: u16,
}

/// Upload client bound to one API token.
///
/// The token and client identifier are fixed at construction; the build-info
/// header varies per request because the game can be patched between jobs.
#[derive(Debug)]
pub struct UploadClient {
    http: reqwest::Client,
    endpoint: String,
}

impl UploadClient {
    /// Creates a client authenticating as `token`.
    pub fn new(token: &str) -> Result<Self, UploadError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_TOKEN_HEADER,
            HeaderValue::from_str(token).map_err(|_| UploadError::InvalidToken)?,
        );

        let http = reqwest::Client::builder()
            .user_agent(CLIENT_IDENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: UPLOAD_ENDPOINT.to_string(),
        })
    }

    /// Overrides the fixed endpoint. Used by tests against a local server.
    pub fn with_endpoint(mut self, url: String) -> Self {
        self.endpoint = url;
        self
    }

    /// Performs exactly one multipart POST of `archive`.
    ///
    /// Any response at all is an [`UploadOutcome`]; `Err` means the request
    /// never completed (DNS, refused connection, timeout). No retry either
    /// way — the next cache rename is the retry.
    pub async fn upload(
        &self,
        archive: Vec<u8>,
        build_info: &[u8],
    ) -> Result<UploadOutcome, UploadError> {
        let size = archive.len();
        let form = multipart::Form::new().part(
            FORM_PART_NAME,
            multipart::Part::bytes(archive).file_name(ARCHIVE_FILENAME),
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .header(BUILD_INFO_HEADER, STANDARD.encode(build_info))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        tracing::info!(status = status.as_u16(), size, "upload attempt finished");

        Ok(UploadOutcome {
            success: status.is_success(),
            status: status.as_u16(),
        })
    }
}
