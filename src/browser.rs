//! Browser capability seam.
//!
//! The capture pipeline only needs "launch a browser, open a page,
//! navigate, wait for idle, read content". [`Browser`] and [`Page`] express
//! that contract as trait objects so a full rendering driver can be plugged
//! in without touching the pipeline; the built-in [`FetchBrowser`] drives a
//! plain HTTP client and does not execute scripts. Session teardown is
//! `Drop`-based, so resources are released on every exit path, including
//! early returns on navigation failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of a navigation: the HTTP status of the main document response.
#[derive(Debug, Clone, Copy)]
pub struct NavigationResponse {
    pub status: u16,
}

/// A launchable browser session factory.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open a fresh page (new context; no shared cookies or cache).
    async fn open_page(&self) -> Result<Box<dyn Page>>;
}

/// One open page within a browser session.
#[async_trait]
pub trait Page: Send {
    /// Navigate to `url`, bounded by `timeout`.
    ///
    /// Errors cover network failures, timeouts, and missing responses;
    /// checking the response status is the caller's job.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResponse>;

    /// Wait until the page has gone network-idle, bounded by `timeout`.
    ///
    /// An `Err` here means the page never settled; callers treat it as
    /// non-fatal since many pages never go fully idle.
    async fn wait_for_network_idle(&mut self, timeout: Duration) -> Result<()>;

    /// The rendered markup of the current document.
    async fn content(&mut self) -> Result<String>;

    /// The user-agent string the page was fetched with.
    fn user_agent(&self) -> String;
}

/// Hook invoked once a page is open but before navigation.
///
/// Instrumentation seam: request interception, header tweaks, or fault
/// injection in tests.
#[async_trait]
pub trait PageReadyHook: Send + Sync {
    async fn on_page_ready(&self, page: &mut dyn Page) -> Result<()>;
}

const USER_AGENT: &str = concat!("siteshot/", env!("CARGO_PKG_VERSION"));

/// Built-in driver: a plain HTTP fetch.
///
/// Captures the served markup as-is. Pages that require script execution to
/// render should plug an external rendering driver in behind the same
/// traits.
pub struct FetchBrowser {
    client: reqwest::Client,
}

impl FetchBrowser {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Browser for FetchBrowser {
    async fn open_page(&self) -> Result<Box<dyn Page>> {
        Ok(Box::new(FetchPage {
            client: self.client.clone(),
            content: None,
        }))
    }
}

struct FetchPage {
    client: reqwest::Client,
    content: Option<String>,
}

#[async_trait]
impl Page for FetchPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResponse> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;
        self.content = Some(body);

        Ok(NavigationResponse { status })
    }

    async fn wait_for_network_idle(&mut self, _timeout: Duration) -> Result<()> {
        // A single fetch has no outstanding requests once the body is read.
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        self.content
            .clone()
            .context("no document loaded; navigate first")
    }

    fn user_agent(&self) -> String {
        USER_AGENT.to_string()
    }
}
