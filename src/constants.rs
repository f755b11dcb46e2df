//! Shared constants used across the application.

/// User agent string sent with search page requests.
///
/// The search site serves a blocked or reduced page to default client
/// identifiers, so requests present themselves as a desktop browser.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// `Accept-Language` header sent with search page requests.
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Default search page: intern keyword, posted in the last 24 hours.
pub const DEFAULT_SEARCH_URL: &str = "https://www.linkedin.com/jobs/search?keywords=intern&f_TP=1";

/// Postings older than this are not reported.
pub const FRESHNESS_WINDOW_HOURS: u32 = 12;

/// Age assigned to postings whose posted-time text cannot be classified.
pub const UNKNOWN_AGE_HOURS: u32 = 100;

/// Age assigned to any posted-time text mentioning days.
pub const DAY_AGE_HOURS: u32 = 24;

/// Display name used in the `From` header of notification mails.
pub const MAIL_SENDER_NAME: &str = "Internship Tracker Bot";
