//! HTTP access to the teletext frontend.
//!
//! Two URL shapes, both parameterized only by page number:
//! - `BASE/pages.js` — the page directory blob
//! - `BASE/{page}_{sub:02}.htm` — one (page, sub-page) document
//!
//! Transient failures are retried with exponential backoff and jitter before
//! surfacing. Client errors (404 and friends) are not retried: a missing
//! page stays missing.

use crate::error::Result;
use crate::models::{PageDirectory, TeletextPage};
use crate::parse;
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use url::Url;

const MAX_RETRIES: usize = 3;
const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Client for one teletext frontend.
#[derive(Debug, Clone)]
pub struct TeletextClient {
    http: reqwest::Client,
    base: Url,
}

impl TeletextClient {
    /// Build a client for the frontend rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // Url::join treats a path without a trailing slash as a file, so
        // normalize before parsing.
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// URL of the page directory blob.
    pub fn directory_url(&self) -> Result<Url> {
        Ok(self.base.join("pages.js")?)
    }

    /// URL of one (page, sub-page) document, e.g. `104_01.htm`.
    pub fn page_url(&self, page: u16, sub_page: u8) -> Result<Url> {
        Ok(self.base.join(&format!("{page}_{sub_page:02}.htm"))?)
    }

    /// Fetch and parse the page directory.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn fetch_directory(&self) -> Result<PageDirectory> {
        let url = self.directory_url()?;
        let blob = self.get_text_with_backoff(url).await?;
        let directory = parse::parse_directory(&blob)?;
        tracing::info!(pages = directory.len(), "Fetched page directory");
        Ok(directory)
    }

    /// Fetch and parse one teletext page.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn fetch_page(&self, page: u16, sub_page: u8) -> Result<TeletextPage> {
        let url = self.page_url(page, sub_page)?;
        let html = self.get_text_with_backoff(url).await?;
        parse::parse_page(page, sub_page, &html)
    }

    /// GET a URL as text, retrying transient failures.
    ///
    /// Backoff doubles from one second per attempt, capped, with 0–250ms of
    /// random jitter. Client errors are returned immediately.
    async fn get_text_with_backoff(&self, url: Url) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let result = async {
                let response = self.http.get(url.clone()).send().await?;
                let response = response.error_for_status()?;
                response.text().await
            }
            .await;

            match result {
                Ok(text) => return Ok(text),
                Err(e) => {
                    attempt += 1;
                    let client_error = e
                        .status()
                        .map(|status| status.is_client_error())
                        .unwrap_or(false);
                    if client_error || attempt > MAX_RETRIES {
                        tracing::error!(
                            %url,
                            attempt,
                            max = MAX_RETRIES,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            "GET failed"
                        );
                        return Err(e.into());
                    }

                    let mut delay = BASE_DELAY.saturating_mul(1 << (attempt - 1));
                    if delay > MAX_DELAY {
                        delay = MAX_DELAY;
                    }
                    let jitter_ms: u64 = rand::rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    tracing::warn!(
                        %url,
                        attempt,
                        max = MAX_RETRIES,
                        ?delay,
                        error = %e,
                        "GET attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
