//! Harvesting configuration links out of fetched markup.

use crate::classifier::Classifier;

use log::{debug, warn};
use scraper::{Html, Selector};

/// Extract every hyperlink target in `markup` that looks like a proxy link.
///
/// Links are returned in document order and are not deduplicated. Only
/// `<a href>` attributes are inspected; text content is ignored. The HTML
/// parser recovers from malformed input, so broken fragments simply yield
/// no links.
pub fn extract_links(markup: &str, classifier: &Classifier) -> Vec<String> {
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Failed to build anchor selector: {:?}", e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(markup);
    let links: Vec<String> = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| classifier.is_extractable(href))
        .map(str::to_string)
        .collect();

    debug!("Extracted {} configuration links from markup", links.len());
    links
}
