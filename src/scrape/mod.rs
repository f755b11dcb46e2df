//! Search page scraping: fetch, extract, filter.

pub mod extractor;
pub mod recency;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::allowlist::CompanyAllowlist;
use crate::constants::{BROWSER_ACCEPT_LANGUAGE, BROWSER_USER_AGENT};
use crate::posting::{Posting, RawPosting};

pub use extractor::extract_postings;

/// Why a scrape cycle produced no result.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch search page: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search page returned status {0}")]
    Status(StatusCode),
}

/// Fetches the configured search page and filters its postings.
///
/// Holds no state between cycles; every call issues exactly one request and
/// starts from an empty result.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    search_url: String,
    allowlist: CompanyAllowlist,
}

impl Scraper {
    /// Create a scraper with a browser-like HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        search_url: impl Into<String>,
        allowlist: CompanyAllowlist,
        timeout: Duration,
    ) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(client, search_url, allowlist))
    }

    /// Create a scraper around an existing HTTP client.
    #[must_use]
    pub fn with_client(
        client: Client,
        search_url: impl Into<String>,
        allowlist: CompanyAllowlist,
    ) -> Self {
        Self {
            client,
            search_url: search_url.into(),
            allowlist,
        }
    }

    /// Run one scrape cycle and return the classified outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or answers with a
    /// non-success status.
    pub async fn scrape(&self) -> Result<Vec<Posting>, ScrapeError> {
        info!(url = %self.search_url, "Fetching search page");

        let response = self.client.get(&self.search_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status));
        }

        // Decoded per the Content-Type charset; undecodable bytes become U+FFFD.
        let html = response.text().await?;

        let raw = extract_postings(&html);
        debug!(cards = raw.len(), "Extracted listing cards");

        Ok(self.filter(raw))
    }

    /// Run one scrape cycle, logging the outcome.
    ///
    /// Failures are logged and reported as an empty result; the caller never
    /// sees an error from this method.
    pub async fn run_cycle(&self) -> Vec<Posting> {
        info!("Starting internship scrape");

        match self.scrape().await {
            Ok(postings) => {
                report(&postings);
                info!("Scrape complete");
                postings
            }
            Err(e) => {
                error!("Scrape failed: {e}");
                Vec::new()
            }
        }
    }

    /// Apply the company filter, then the recency filter.
    #[must_use]
    pub fn filter(&self, raw: Vec<RawPosting>) -> Vec<Posting> {
        filter_postings(raw, &self.allowlist)
    }
}

/// Keep postings from allowlisted companies that are inside the freshness window.
#[must_use]
pub fn filter_postings(raw: Vec<RawPosting>, allowlist: &CompanyAllowlist) -> Vec<Posting> {
    raw.into_iter()
        .filter(|p| allowlist.matches(&p.company))
        .map(Posting::from_raw)
        .filter(Posting::is_fresh)
        .collect()
}

/// Log the result of a cycle, one line per posting.
pub fn report(postings: &[Posting]) {
    info!("Found {} new internships:", postings.len());
    for posting in postings {
        info!(
            "→ {} — {} ({})",
            posting.company, posting.title, posting.posted_text
        );
    }
}
