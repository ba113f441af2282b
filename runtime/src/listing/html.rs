//! Offline extraction from a saved listing page.
//!
//! Applies the same two rules as the in-browser extraction script, so a page
//! snapshot ranks identically to a live run. Synchronous, because `scraper`
//! types are `!Send`.

use super::{ListingSelectors, RawEntry};
use crate::error::{ScrapeError, ScrapeResult};
use scraper::{ElementRef, Html, Selector};

/// Extract listing entries from raw HTML.
pub fn extract_from_html(html: &str, selectors: &ListingSelectors) -> ScrapeResult<Vec<RawEntry>> {
    let container = parse_selector(&selectors.container)?;
    let title = parse_selector(&selectors.title)?;
    let age = parse_selector(&selectors.age)?;

    let document = Html::parse_document(html);

    let entries = document
        .select(&container)
        .map(|el| {
            let title_text = el.select(&title).next().map(element_text);

            let mut age_el = el.select(&age).next();
            if age_el.is_none() && selectors.age_in_next_sibling {
                age_el = el
                    .next_siblings()
                    .find_map(ElementRef::wrap)
                    .and_then(|sibling| sibling.select(&age).next());
            }

            RawEntry::from_extracted(title_text, age_el.map(element_text))
        })
        .collect();

    Ok(entries)
}

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector(format!("{selector}: {e:?}")))
}

/// Visible-ish text of an element, whitespace-collapsed like `innerText`.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
