//! Page fetching for the extraction pipeline.
//!
//! The pipeline only needs one operation from the network: fetch a URL and
//! return its body as text. That operation sits behind the [`PageFetch`]
//! trait so the orchestrator can be driven by [`HttpFetcher`] in production
//! and by in-memory fakes in tests.
//!
//! # Failure Model
//!
//! A fetch fails if the request cannot be completed or the body cannot be
//! read. Non-success status codes are not failures: the body is still
//! returned (and usually yields no matches), with a warning logged.
//! There are no retries and no timeout.

use reqwest::Client;
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::utils::truncate_for_log;

/// Trait for fetching a page body.
pub trait PageFetch {
    /// Fetch `url` and return the full response body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Which step of a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// Sending the request or receiving the response head.
    Request,
    /// Reading the response body.
    Body,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Request => f.write_str("request failed"),
            FetchStage::Body => f.write_str("failed to read body"),
        }
    }
}

/// A transport failure while fetching one page.
#[derive(Debug)]
pub struct FetchError {
    pub url: String,
    pub stage: FetchStage,
    source: Box<dyn Error + Send + Sync>,
}

impl FetchError {
    pub fn new(
        url: impl Into<String>,
        stage: FetchStage,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            url: url.into(),
            stage,
            source: source.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}: {}", self.stage, self.url, self.source)
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let source: &(dyn Error + 'static) = &*self.source;
        Some(source)
    }
}

/// [`PageFetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetch for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, FetchStage::Request, e))?;

        let status = response.status();
        // `text()` consumes the response; on error the connection is dropped here.
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::new(url, FetchStage::Body, e))?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                body_preview = %truncate_for_log(&body, 200),
                "Non-success status; parsing body anyway"
            );
        }
        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
