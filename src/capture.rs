//! Snapshot capture: one immutable record per run.
//!
//! The pipeline is validate → resolve identifier → navigate → settle →
//! extract → persist. The snapshot directory is created only after
//! extraction has succeeded, so any earlier failure leaves the archive
//! untouched; the browser session is released through `Drop` on every exit
//! path.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::browser::{Browser, FetchBrowser, Page, PageReadyHook};
use crate::config::{CaptureConfig, Config};
use crate::models::{SnapshotMeta, SnapshotRecord};
use crate::text;
use crate::timestamp;
use crate::warn::{StderrWarnings, WarnSink};

/// Capture failure taxonomy. Every variant leaves the archive untouched.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The target URL failed validation. Raised before any network or
    /// filesystem activity.
    #[error("invalid target URL: {0}")]
    InvalidInput(String),

    /// Navigation failed outright: network error, timeout, or no response.
    #[error("navigation failed: {0:#}")]
    Navigation(anyhow::Error),

    /// The main document responded with a non-success status.
    #[error("navigation failed: received HTTP status {0}")]
    BadStatus(u16),

    /// Extraction or persistence failed after a successful navigation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Per-call options for [`capture`]. Defaults are wired for the CLI; tests
/// override freely.
#[derive(Default)]
pub struct CaptureOptions {
    /// Identifier base override for deterministic reruns; defaults to the
    /// current UTC instant.
    pub timestamp: Option<String>,
    /// CI run identifier recorded in `meta.json`.
    pub github_run_id: Option<String>,
    /// Driver override; defaults to the built-in HTTP fetch driver.
    pub browser: Option<Arc<dyn Browser>>,
    /// Invoked after the page is open, before navigation.
    pub page_ready: Option<Arc<dyn PageReadyHook>>,
    /// Sink for non-fatal warnings; defaults to stderr.
    pub warnings: Option<Arc<dyn WarnSink>>,
}

/// Capture one snapshot of `target_url` into the archive.
pub async fn capture(
    config: &Config,
    target_url: &str,
    options: CaptureOptions,
) -> Result<SnapshotRecord, CaptureError> {
    validate_url(target_url)?;

    let base = options
        .timestamp
        .clone()
        .unwrap_or_else(timestamp::timestamp_base);
    let (identifier, snapshot_dir) =
        timestamp::unique_snapshot_dir(&config.archive.root, &base);

    let warnings: Arc<dyn WarnSink> = options
        .warnings
        .unwrap_or_else(|| Arc::new(StderrWarnings));

    let browser: Arc<dyn Browser> = match options.browser {
        Some(browser) => browser,
        None => Arc::new(FetchBrowser::new()?),
    };

    // Dropped on every exit path below, releasing the session.
    let mut page = browser.open_page().await?;

    if let Some(hook) = &options.page_ready {
        hook.on_page_ready(page.as_mut()).await?;
    }

    let navigation_timeout = Duration::from_millis(config.capture.navigation_timeout_ms);
    let response = page
        .navigate(target_url, navigation_timeout)
        .await
        .map_err(CaptureError::Navigation)?;

    if response.status < 200 || response.status >= 400 {
        return Err(CaptureError::BadStatus(response.status));
    }

    settle(page.as_mut(), &config.capture, warnings.as_ref()).await;

    let html = page.content().await?;
    let user_agent = page.user_agent();
    drop(page);

    let extracted = text::readable_text(&html);

    persist(
        &snapshot_dir,
        &identifier,
        target_url,
        response.status,
        user_agent,
        options.github_run_id,
        &html,
        &extracted,
    )
}

/// Reject anything that is not an absolute http(s) URL, before any side
/// effect occurs.
pub fn validate_url(target_url: &str) -> Result<(), CaptureError> {
    if target_url.is_empty() {
        return Err(CaptureError::InvalidInput(
            "target URL is required".to_string(),
        ));
    }
    let parsed = Url::parse(target_url)
        .map_err(|err| CaptureError::InvalidInput(format!("{target_url}: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CaptureError::InvalidInput(format!(
            "URL must use http or https, got '{other}'"
        ))),
    }
}

/// Best-effort settle after navigation: a bounded network-idle wait whose
/// timeout is a warning rather than an error, followed by a fixed delay for
/// late-rendering content.
async fn settle(page: &mut dyn Page, capture: &CaptureConfig, warnings: &dyn WarnSink) {
    let idle_timeout = Duration::from_millis(capture.network_idle_timeout_ms);
    if !idle_timeout.is_zero() {
        if let Err(err) = page.wait_for_network_idle(idle_timeout).await {
            warnings.warn(&format!("Continuing without network idle: {err:#}"));
        }
    }

    let settle_delay = Duration::from_millis(capture.settle_delay_ms);
    if !settle_delay.is_zero() {
        tokio::time::sleep(settle_delay).await;
    }
}

#[allow(clippy::too_many_arguments)]
fn persist(
    snapshot_dir: &Path,
    identifier: &str,
    url: &str,
    status: u16,
    user_agent: String,
    github_run_id: Option<String>,
    html: &str,
    extracted: &str,
) -> Result<SnapshotRecord, CaptureError> {
    std::fs::create_dir_all(snapshot_dir)
        .with_context(|| format!("failed to create {}", snapshot_dir.display()))?;

    let html_path = snapshot_dir.join("page.html");
    let text_path = snapshot_dir.join("page.txt");
    let meta_path = snapshot_dir.join("meta.json");

    std::fs::write(&html_path, html)
        .with_context(|| format!("failed to write {}", html_path.display()))?;
    std::fs::write(&text_path, extracted)
        .with_context(|| format!("failed to write {}", text_path.display()))?;

    let meta = SnapshotMeta {
        url: url.to_string(),
        timestamp: identifier.to_string(),
        status,
        user_agent,
        github_run_id,
    };
    let json = serde_json::to_string_pretty(&meta).context("failed to encode meta.json")?;
    std::fs::write(&meta_path, format!("{json}\n"))
        .with_context(|| format!("failed to write {}", meta_path.display()))?;

    Ok(SnapshotRecord {
        snapshot_dir: snapshot_dir.to_path_buf(),
        timestamp: identifier.to_string(),
        url: url.to_string(),
        html_path,
        text_path,
        meta_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::NavigationResponse;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeBrowser {
        html: String,
        status: u16,
        idle_fails: bool,
    }

    impl FakeBrowser {
        fn serving(html: &str) -> Arc<Self> {
            Arc::new(Self {
                html: html.to_string(),
                status: 200,
                idle_fails: false,
            })
        }
    }

    #[async_trait]
    impl Browser for FakeBrowser {
        async fn open_page(&self) -> Result<Box<dyn Page>> {
            Ok(Box::new(FakePage {
                html: self.html.clone(),
                status: self.status,
                idle_fails: self.idle_fails,
            }))
        }
    }

    struct FakePage {
        html: String,
        status: u16,
        idle_fails: bool,
    }

    #[async_trait]
    impl Page for FakePage {
        async fn navigate(&mut self, _url: &str, _timeout: Duration) -> Result<NavigationResponse> {
            Ok(NavigationResponse {
                status: self.status,
            })
        }

        async fn wait_for_network_idle(&mut self, _timeout: Duration) -> Result<()> {
            if self.idle_fails {
                anyhow::bail!("simulated network idle timeout");
            }
            Ok(())
        }

        async fn content(&mut self) -> Result<String> {
            Ok(self.html.clone())
        }

        fn user_agent(&self) -> String {
            "fake-agent".to_string()
        }
    }

    struct CollectingSink(Mutex<Vec<String>>);

    impl WarnSink for CollectingSink {
        fn warn(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn test_config(tmp: &TempDir) -> Config {
        let mut cfg = Config::with_roots(tmp.path().join("archive"), tmp.path().join("docs"));
        cfg.capture.settle_delay_ms = 0;
        cfg
    }

    fn options_with(browser: Arc<dyn Browser>) -> CaptureOptions {
        CaptureOptions {
            browser: Some(browser),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn fixed_timestamp_produces_dup_suffixes() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let browser = FakeBrowser::serving("<html><body><p>hi</p></body></html>");

        for expected in [
            "2024-01-02T12-00-00Z",
            "2024-01-02T12-00-00Z-dup1",
            "2024-01-02T12-00-00Z-dup2",
        ] {
            let options = CaptureOptions {
                timestamp: Some("2024-01-02T12-00-00Z".to_string()),
                ..options_with(browser.clone())
            };
            let record = capture(&cfg, "http://example.com/", options).await.unwrap();
            assert_eq!(record.timestamp, expected);
            assert!(record.html_path.exists());
        }
    }

    #[tokio::test]
    async fn invalid_urls_fail_before_any_side_effect() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);

        for bad in ["", "not-a-url", "ftp://example.com/file", "example.com"] {
            let err = capture(&cfg, bad, CaptureOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(err, CaptureError::InvalidInput(_)), "url: {bad}");
        }
        assert!(!cfg.archive.root.exists());
    }

    #[tokio::test]
    async fn bad_status_leaves_archive_untouched() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let browser = Arc::new(FakeBrowser {
            html: "<html><body>missing</body></html>".to_string(),
            status: 404,
            idle_fails: false,
        });

        let err = capture(&cfg, "http://example.com/gone", options_with(browser))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::BadStatus(404)));
        assert!(!cfg.archive.root.exists());
    }

    #[tokio::test]
    async fn network_idle_timeout_is_a_warning_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let browser = Arc::new(FakeBrowser {
            html: "<html><body><p>still here</p></body></html>".to_string(),
            status: 200,
            idle_fails: true,
        });
        let sink = Arc::new(CollectingSink(Mutex::new(Vec::new())));

        let options = CaptureOptions {
            warnings: Some(sink.clone()),
            ..options_with(browser)
        };
        let record = capture(&cfg, "http://example.com/", options).await.unwrap();

        assert!(record.html_path.exists());
        let warnings = sink.0.lock().unwrap();
        assert!(warnings.iter().any(|w| w.contains("network idle")));
    }

    #[tokio::test]
    async fn script_content_never_reaches_extracted_text() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let browser = FakeBrowser::serving(concat!(
            "<html><head><style>body { color: red; }</style>",
            "<script>console.log('ignored');</script></head>",
            "<body><h1>Hello</h1><p>World</p></body></html>"
        ));

        let record = capture(&cfg, "http://example.com/", options_with(browser))
            .await
            .unwrap();

        let html = std::fs::read_to_string(&record.html_path).unwrap();
        let text = std::fs::read_to_string(&record.text_path).unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains("console.log"));
        assert!(!text.contains("color: red"));
    }

    #[tokio::test]
    async fn metadata_records_status_agent_and_run_id() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let browser = FakeBrowser::serving("<html><body>ok</body></html>");

        let options = CaptureOptions {
            github_run_id: Some("12345".to_string()),
            ..options_with(browser)
        };
        let record = capture(&cfg, "https://example.com/page", options)
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&record.meta_path).unwrap();
        assert!(raw.ends_with('\n'));
        let meta: SnapshotMeta = serde_json::from_str(&raw).unwrap();
        assert_eq!(meta.url, "https://example.com/page");
        assert_eq!(meta.timestamp, record.timestamp);
        assert_eq!(meta.status, 200);
        assert_eq!(meta.user_agent, "fake-agent");
        assert_eq!(meta.github_run_id.as_deref(), Some("12345"));
    }
}
