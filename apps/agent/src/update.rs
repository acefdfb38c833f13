//! Startup update check.
//!
//! One GET against the uploader download page with the current version; the
//! server answers a bare version string when a newer build exists. Failures
//! are logged and otherwise ignored — an unreachable update server must not
//! affect watching or uploading.

use std::time::Duration;

use wowcache_pipeline::{Notifier, Severity};

/// Update endpoint; also where users download the new build.
pub const VERSION_CHECK_URL: &str = "https://wow.tools/uploader/";

/// Checks for a newer release and notifies if one exists.
pub async fn check(base_url: &str, current: &str, notifier: &dyn Notifier) {
    match latest_version(base_url, current).await {
        Ok(Some(latest)) => {
            tracing::info!(%latest, "update available");
            notifier.notify(
                "Update available",
                &format!("An update to {latest} is available on {VERSION_CHECK_URL}"),
                Severity::Info,
            );
        }
        Ok(None) => tracing::debug!("agent is up to date"),
        Err(e) => tracing::warn!(error = %e, "update check failed"),
    }
}

/// Asks the server for the latest version string.
async fn latest_version(base_url: &str, current: &str) -> Result<Option<String>, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let body = client
        .get(format!("{base_url}?versionCheck={current}"))
        .send()
        .await?
        .text()
        .await?;

    Ok(newer_version(current, &body))
}

/// Interprets the version-check response.
///
/// A short body differing from the current version is the newer version
/// number; a long body is an HTML page (error or redirect) and is ignored.
fn newer_version(current: &str, body: &str) -> Option<String> {
    let body = body.trim();
    if !body.is_empty() && body.len() < 20 && body != current {
        Some(body.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, message: &str, _severity: Severity) {
            self.events
                .lock()
                .unwrap()
                .push((title.into(), message.into()));
        }
    }

    async fn mock_server(body: &str) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let _ = stream.read(&mut buf).await;

                let resp = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, handle)
    }

    #[test]
    fn newer_version_detected() {
        assert_eq!(newer_version("1.0.0", "1.0.1"), Some("1.0.1".into()));
    }

    #[test]
    fn same_version_ignored() {
        assert_eq!(newer_version("1.0.0", "1.0.0"), None);
    }

    #[test]
    fn long_body_ignored() {
        let html = "<html><body>Some error page from the server</body></html>";
        assert_eq!(newer_version("1.0.0", html), None);
    }

    #[test]
    fn empty_body_ignored() {
        assert_eq!(newer_version("1.0.0", ""), None);
        assert_eq!(newer_version("1.0.0", "   "), None);
    }

    #[tokio::test]
    async fn check_notifies_on_newer_version() {
        let (url, handle) = mock_server("2.0.0").await;

        let notifier = RecordingNotifier::default();
        check(&url, "1.0.0", &notifier).await;

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "Update available");
        assert!(events[0].1.contains("2.0.0"));
        handle.abort();
    }

    #[tokio::test]
    async fn check_silent_when_current() {
        let (url, handle) = mock_server("1.0.0").await;

        let notifier = RecordingNotifier::default();
        check(&url, "1.0.0", &notifier).await;

        assert!(notifier.events.lock().unwrap().is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn check_survives_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let notifier = RecordingNotifier::default();
        check(&format!("http://127.0.0.1:{port}"), "1.0.0", &notifier).await;

        assert!(notifier.events.lock().unwrap().is_empty());
    }
}
