//! HTML `<title>` extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::constants::NO_TITLE;

#[allow(clippy::expect_used)]
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid")); // Static selector, safe to panic

/// Returns the first `<title>` text with whitespace collapsed, or `"N/A"`.
#[must_use]
pub fn extract_title(body: &str) -> String {
    let document = Html::parse_document(body);
    match document.select(&TITLE_SELECTOR).next() {
        Some(element) => element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" "),
        None => NO_TITLE.to_string(),
    }
}
