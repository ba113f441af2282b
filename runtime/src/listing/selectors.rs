//! The selector contract between the collector and the listing page markup.
//!
//! If the upstream markup changes, extraction does not fail. Titles and ages
//! silently fall back to the sentinels instead.

use super::RawEntry;
use crate::error::{ScrapeError, ScrapeResult};
use crate::renderer::js_string;
use serde::{Deserialize, Serialize};

/// CSS selectors identifying listing entries and their fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// One element per entry.
    pub container: String,
    /// Title link, relative to the container.
    pub title: String,
    /// Relative-age text, relative to the container.
    pub age: String,
    /// Also look for the age in the container's next element sibling.
    /// Hacker News puts it in the subtext row below each entry row.
    pub age_in_next_sibling: bool,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: ".athing".to_string(),
            title: ".titleline > a".to_string(),
            age: ".age".to_string(),
            age_in_next_sibling: true,
        }
    }
}

/// One record as returned by the in-page extraction script.
#[derive(Debug, Deserialize)]
struct ExtractedRecord {
    title: Option<String>,
    time: Option<String>,
}

impl ListingSelectors {
    /// JavaScript that maps every container element to `{title, time}`,
    /// with `null` for a field whose element is missing.
    pub fn extraction_script(&self) -> String {
        format!(
            r#"(() => Array.from(document.querySelectorAll({container})).map((el) => {{
    const titleEl = el.querySelector({title});
    let ageEl = el.querySelector({age});
    if (!ageEl && {sibling} && el.nextElementSibling) {{
        ageEl = el.nextElementSibling.querySelector({age});
    }}
    return {{
        title: titleEl ? titleEl.innerText : null,
        time: ageEl ? ageEl.innerText : null,
    }};
}}))()"#,
            container = js_string(&self.container),
            title = js_string(&self.title),
            age = js_string(&self.age),
            sibling = self.age_in_next_sibling,
        )
    }
}

/// Decode the value returned by [`ListingSelectors::extraction_script`].
pub fn parse_extracted(value: serde_json::Value) -> ScrapeResult<Vec<RawEntry>> {
    // No matching elements at all can come back as null
    if value.is_null() {
        return Ok(Vec::new());
    }

    let records: Vec<ExtractedRecord> =
        serde_json::from_value(value).map_err(|e| ScrapeError::Extraction(e.to_string()))?;

    Ok(records
        .into_iter()
        .map(|r| RawEntry::from_extracted(r.title, r.time))
        .collect())
}
