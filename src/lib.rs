//! Internship watch library.
//!
//! Fetches a job-search results page, keeps postings from allowlisted
//! companies that went up in the last 12 hours, and reports them through
//! the log, an e-mail, or an HTTP endpoint.

pub mod allowlist;
pub mod config;
pub mod constants;
pub mod job;
pub mod notify;
pub mod posting;
pub mod scrape;
pub mod web;
