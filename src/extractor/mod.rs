//! extract hyperlink targets from html and resolve them to absolute urls
mod container;

pub use self::container::{Extractor, PatternMatches};

use crate::{errors::ScrapeError, patterns::LinkPattern};
use std::collections::HashSet;

/// Unique, absolute urls found on a single page; iteration order is unspecified
pub type LinkSet = HashSet<String>;

/// css selector used to enumerate hyperlink elements that carry a target
pub(super) const HYPERLINK_SELECTOR: &str = "a[href]";

/// parse `html` fetched from `page_url` and return every hyperlink target that matches `pattern`,
/// resolved against `page_url`
///
/// an empty set means nothing matched; it is not an error
pub fn extract(page_url: &str, html: &[u8], pattern: &LinkPattern) -> Result<LinkSet, ScrapeError> {
    let extractor = Extractor::parse(page_url, html)?;
    Ok(extractor.extract(pattern))
}

/// same as [extract](fn.extract.html), but compiles `pattern` first
///
/// prefer compiling a [LinkPattern](../patterns/struct.LinkPattern.html) once when the same
/// expression is used against more than one page
pub fn extract_with_str(
    page_url: &str,
    html: &[u8],
    pattern: &str,
) -> Result<LinkSet, ScrapeError> {
    let compiled = LinkPattern::new("", pattern)?;
    extract(page_url, html, &compiled)
}
