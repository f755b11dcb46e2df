//! Notification mail rendering.
//!
//! Every posting field comes from scraped markup, so the body is built with
//! maud, which escapes interpolated text.

use maud::{html, Markup};

use crate::constants::FRESHNESS_WINDOW_HOURS;
use crate::posting::Posting;

/// Subject and HTML body of a notification mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

/// Render the notification mail for a set of postings.
#[must_use]
pub fn render_email(postings: &[Posting]) -> EmailContent {
    EmailContent {
        subject: render_subject(postings.len()),
        html: render_body(postings).into_string(),
    }
}

/// Subject line. The window shown is the recency filter's window.
#[must_use]
pub fn render_subject(count: usize) -> String {
    format!("🧭 {count} New Internship Postings (last {FRESHNESS_WINDOW_HOURS}h)")
}

fn render_body(postings: &[Posting]) -> Markup {
    html! {
        h3 { "New Internships Found" }
        ul {
            @for posting in postings {
                li {
                    b { (posting.company) }
                    " — "
                    (posting.title)
                    br;
                    "Posted: "
                    (posting.posted_text)
                    br;
                    @if is_web_link(&posting.link) {
                        a href=(posting.link) { "View Posting" }
                    } @else {
                        "No link available"
                    }
                }
            }
        }
    }
}

/// Only http(s) links are rendered as anchors.
fn is_web_link(link: &str) -> bool {
    url::Url::parse(link).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}
