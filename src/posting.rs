//! Posting records produced by a scrape run.

use serde::Serialize;

use crate::scrape::recency;

/// A listing card as read from the search page, before any filtering.
///
/// Fields absent from the markup are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPosting {
    pub title: String,
    pub company: String,
    pub posted_text: String,
    pub link: String,
}

/// A posting with its estimated age.
///
/// Serialized as the dashboard reads it; the posted text goes out as `timeAgo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub title: String,
    pub company: String,
    #[serde(rename = "timeAgo")]
    pub posted_text: String,
    pub link: String,
    pub hours_since_posted: u32,
}

impl Posting {
    /// Attach the age estimate derived from `posted_text`.
    #[must_use]
    pub fn from_raw(raw: RawPosting) -> Self {
        let hours_since_posted = recency::hours_since_posted(&raw.posted_text);
        Self {
            title: raw.title,
            company: raw.company,
            posted_text: raw.posted_text,
            link: raw.link,
            hours_since_posted,
        }
    }

    /// Whether the posting falls inside the freshness window.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        recency::is_fresh(self.hours_since_posted)
    }
}
