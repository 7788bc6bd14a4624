//! Anchor scraping for HTML directory listings.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::instrument;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Extract file identifiers from an HTML directory listing.
///
/// Every `<a>` element with non-empty text contributes its text, entity
/// decoded, in document order. The text is taken rather than `href`
/// because listings percent-encode hrefs. Directory entries keep their
/// trailing `/`; deciding what to do with them is left to the caller.
///
/// ```
/// use lockstep_catalog::parse_listing;
///
/// let html = r#"<pre>
/// <a href="notes.txt">notes.txt</a>
/// <a href="old%20things/">old things/</a>
/// <a href="fish%26chips.txt">fish&amp;chips.txt</a>
/// </pre>"#;
/// assert_eq!(parse_listing(html), ["notes.txt", "old things/", "fish&chips.txt"]);
/// ```
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let entries: Vec<String> = document
        .select(&ANCHOR_SELECTOR)
        .map(|anchor| anchor.text().collect::<String>())
        .filter(|text| !text.is_empty())
        .collect();
    tracing::debug!(entries = entries.len(), "Parsed listing");
    entries
}
