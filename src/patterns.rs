//! labelled, precompiled regular expressions that hyperlink targets are tested against
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ScrapeError;

/// expression used to find magnet links (starts with `magnet:`)
pub const MAGNET_PATTERN: &str = r"^magnet:";

/// expression used to find .torrent file downloads (ends with `.torrent`)
pub const TORRENT_PATTERN: &str = r"\.torrent$";

/// Uncompiled pattern as it appears in a config file or on the command line
///
/// ```toml
/// [[patterns]]
/// label = "zip archives"
/// regex = '\.zip$'
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// human readable name used in output, i.e. `No {label} found on {url}`
    #[serde(default)]
    pub label: String,

    /// regular expression, matched anywhere within the href unless anchored
    pub regex: String,
}

impl PatternSpec {
    /// create a `PatternSpec` without a label; the compiled pattern names itself after the regex
    pub fn unlabelled(regex: &str) -> Self {
        Self {
            label: String::new(),
            regex: regex.to_string(),
        }
    }
}

/// built-in patterns used when none are configured
pub fn default_patterns() -> Vec<PatternSpec> {
    vec![
        PatternSpec {
            label: "magnet links".to_string(),
            regex: MAGNET_PATTERN.to_string(),
        },
        PatternSpec {
            label: ".torrent file links".to_string(),
            regex: TORRENT_PATTERN.to_string(),
        },
    ]
}

/// A compiled pattern, built once and reused across every page in a batch
#[derive(Debug, Clone)]
pub struct LinkPattern {
    /// name used when rendering results
    label: String,

    /// compiled expression
    regex: Regex,
}

impl LinkPattern {
    /// compile `regex` into a `LinkPattern` named `label`
    ///
    /// an empty label falls back to the expression itself
    pub fn new(label: &str, regex: &str) -> Result<Self, ScrapeError> {
        let compiled = Regex::new(regex).map_err(|e| ScrapeError::Pattern {
            pattern: regex.to_string(),
            reason: e.to_string(),
        })?;

        let label = if label.is_empty() {
            format!("links matching {regex}")
        } else {
            label.to_string()
        };

        Ok(Self {
            label,
            regex: compiled,
        })
    }

    /// label used in output
    pub fn label(&self) -> &str {
        &self.label
    }

    /// the raw expression
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// unanchored search of `href`
    pub fn is_match(&self, href: &str) -> bool {
        self.regex.is_match(href)
    }
}

impl TryFrom<&PatternSpec> for LinkPattern {
    type Error = ScrapeError;

    fn try_from(spec: &PatternSpec) -> Result<Self, Self::Error> {
        Self::new(&spec.label, &spec.regex)
    }
}

/// compile every spec, failing on the first invalid expression
pub fn compile_all(specs: &[PatternSpec]) -> Result<Vec<LinkPattern>, ScrapeError> {
    log::trace!("enter: compile_all({:?})", specs);

    let compiled = specs
        .iter()
        .map(LinkPattern::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    log::trace!("exit: compile_all -> {} patterns", compiled.len());
    Ok(compiled)
}
