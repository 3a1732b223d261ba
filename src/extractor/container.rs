use super::*;
use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde::Serialize;
use url::{ParseError, Url};

lazy_static! {
    /// `HYPERLINK_SELECTOR` as a scraper::Selector, parsed once
    static ref HYPERLINKS: Selector = Selector::parse(HYPERLINK_SELECTOR).unwrap();
}

/// Links found on a single page for a single pattern
#[derive(Debug, Clone, Serialize)]
pub struct PatternMatches {
    /// label of the pattern that produced these links
    pub label: String,

    /// the raw regular expression
    pub pattern: String,

    /// unique absolute urls
    pub links: LinkSet,
}

/// A parsed page, ready to have any number of patterns applied to it
///
/// The document is parsed once; each call to `extract` walks the already-built tree
#[derive(Debug)]
pub struct Extractor {
    /// url the page was fetched from, used as the base for relative hrefs
    pub(super) base: Url,

    /// parsed html
    pub(super) document: Html,
}

impl Extractor {
    /// parse `page_url` as a base url and `html` as a document
    ///
    /// content holding a NUL byte is treated as binary rather than markup and rejected
    pub fn parse(page_url: &str, html: &[u8]) -> Result<Self, ScrapeError> {
        log::trace!("enter: parse({}, [{} bytes])", page_url, html.len());

        let base = Url::parse(page_url).map_err(|e| ScrapeError::Parse {
            url: page_url.to_string(),
            reason: format!("page url can't be used as a base: {e}"),
        })?;

        if html.contains(&0) {
            return Err(ScrapeError::Parse {
                url: page_url.to_string(),
                reason: "content is binary, not markup".to_string(),
            });
        }

        let text = String::from_utf8_lossy(html);
        let document = Html::parse_document(&text);

        log::trace!("exit: parse");
        Ok(Self { base, document })
    }

    /// every non-empty hyperlink target on the page, in document order, with surrounding
    /// whitespace removed
    pub fn hrefs(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .select(&HYPERLINKS)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
    }

    /// apply `pattern` to every hyperlink target and return the resolved matches
    ///
    /// hrefs that match but can't be resolved are logged and skipped
    pub fn extract(&self, pattern: &LinkPattern) -> LinkSet {
        log::trace!("enter: extract({})", pattern.as_str());

        let mut links = LinkSet::new();

        for href in self.hrefs() {
            if !pattern.is_match(href) {
                continue;
            }

            match self.resolve(href) {
                Ok(absolute) => {
                    links.insert(absolute);
                }
                Err(e) => {
                    log::warn!("skipping href on {}: {:#}", self.base, e);
                }
            }
        }

        log::trace!("exit: extract -> {:?}", links);
        links
    }

    /// apply each pattern in turn, preserving the order of `patterns`
    pub fn extract_all(&self, patterns: &[LinkPattern]) -> Vec<PatternMatches> {
        patterns
            .iter()
            .map(|pattern| PatternMatches {
                label: pattern.label().to_string(),
                pattern: pattern.as_str().to_string(),
                links: self.extract(pattern),
            })
            .collect()
    }

    /// turn an href into an absolute url
    ///
    /// - already absolute (has a scheme): returned verbatim, no normalization
    /// - relative, root-relative or scheme-relative: joined against the page url
    pub(super) fn resolve(&self, href: &str) -> Result<String> {
        match Url::parse(href) {
            Ok(_) => Ok(href.to_string()),
            Err(ParseError::RelativeUrlWithoutBase) => {
                let joined = self
                    .base
                    .join(href)
                    .with_context(|| format!("Could not join {} with {}", self.base, href))?;
                Ok(joined.to_string())
            }
            Err(e) => bail!("Could not parse {}: {}", href, e),
        }
    }
}
