use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::posting::RawPosting;

static CARD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".base-card").expect("Invalid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".base-search-card__title").expect("Invalid selector"));
static COMPANY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".base-search-card__subtitle").expect("Invalid selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.base-card__full-link").expect("Invalid selector"));
static TIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time").expect("Invalid selector"));

/// Extract one raw posting per listing card, in document order.
///
/// Missing sub-elements become empty strings. Markup that contains no
/// listing cards yields an empty vector.
#[must_use]
pub fn extract_postings(html: &str) -> Vec<RawPosting> {
    let document = Html::parse_document(html);

    document
        .select(&CARD_SELECTOR)
        .map(|card| RawPosting {
            title: select_text(&card, &TITLE_SELECTOR),
            company: select_text(&card, &COMPANY_SELECTOR),
            posted_text: select_text(&card, &TIME_SELECTOR),
            link: select_attr(&card, &LINK_SELECTOR, "href"),
        })
        .collect()
}

/// Concatenated text of every match under `card`, trimmed.
fn select_text(card: &ElementRef, selector: &Selector) -> String {
    let text: String = card.select(selector).flat_map(|el| el.text()).collect();
    text.trim().to_string()
}

/// Attribute value of the first match under `card`.
fn select_attr(card: &ElementRef, selector: &Selector, attr: &str) -> String {
    card.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, company: &str, posted: &str, link: &str) -> String {
        format!(
            r#"<li><div class="base-card">
                <a class="base-card__full-link" href="{link}"><span class="sr-only">{title}</span></a>
                <div class="base-search-card__info">
                    <h3 class="base-search-card__title">
                        {title}
                    </h3>
                    <h4 class="base-search-card__subtitle">
                        <a href="https://example.com/company">{company}</a>
                    </h4>
                    <div class="base-search-card__metadata">
                        <time class="job-search-card__listdate" datetime="2024-01-01">
                            {posted}
                        </time>
                    </div>
                </div>
            </div></li>"#
        )
    }

    #[test]
    fn test_extract_single_card() {
        let html = format!(
            "<html><body><ul>{}</ul></body></html>",
            card("SWE Intern", "Acme Corp", "3 hours ago", "https://x/jobs/1")
        );

        let postings = extract_postings(&html);

        assert_eq!(postings.len(), 1);
        assert_eq!(
            postings[0],
            RawPosting {
                title: "SWE Intern".to_string(),
                company: "Acme Corp".to_string(),
                posted_text: "3 hours ago".to_string(),
                link: "https://x/jobs/1".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_preserves_document_order() {
        let html = format!(
            "<ul>{}{}{}</ul>",
            card("A", "Acme", "1h", "https://x/a"),
            card("B", "Globex", "2h", "https://x/b"),
            card("C", "Initech", "3h", "https://x/c"),
        );

        let titles: Vec<String> = extract_postings(&html)
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let html = r#"<div class="base-card"><h3 class="base-search-card__title">Data Intern</h3></div>"#;

        let postings = extract_postings(html);

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Data Intern");
        assert_eq!(postings[0].company, "");
        assert_eq!(postings[0].posted_text, "");
        assert_eq!(postings[0].link, "");
    }

    #[test]
    fn test_link_without_href_is_empty() {
        let html = r#"<div class="base-card"><a class="base-card__full-link">no href</a></div>"#;

        let postings = extract_postings(html);

        assert_eq!(postings[0].link, "");
    }

    #[test]
    fn test_no_cards() {
        assert!(extract_postings("<html><body><p>Sign in</p></body></html>").is_empty());
        assert!(extract_postings("").is_empty());
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let html = r#"<div class="base-card"><h3 class="base-search-card__title">Broken Intern<div><span>"#;

        let postings = extract_postings(html);

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Broken Intern");
    }
}
