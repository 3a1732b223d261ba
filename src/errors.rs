use std::{error, fmt};

/// Every way a run of linkscrape can fail
///
/// `Config`, `File` and `Pattern` are fatal to the whole run; `Fetch` and `Parse` only ever
/// abandon the url they belong to
#[derive(Debug)]
pub enum ScrapeError {
    /// invalid or missing selection of inputs (--url / --file)
    Config(String),

    /// batch input file is missing or unreadable
    File {
        /// path given by the user
        path: String,

        /// underlying cause
        reason: String,
    },

    /// network or http status failure for a single url
    Fetch {
        /// url that was requested
        url: String,

        /// underlying transport error or status code
        reason: String,
    },

    /// content could not be treated as markup, or the page url can't act as a base
    Parse {
        /// url of the page being parsed
        url: String,

        /// what went wrong
        reason: String,
    },

    /// a regular expression failed to compile
    Pattern {
        /// the raw expression as given
        pattern: String,

        /// error reported by the regex crate
        reason: String,
    },
}

impl ScrapeError {
    /// whether or not this error should stop the entire run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScrapeError::Config(_) | ScrapeError::File { .. } | ScrapeError::Pattern { .. }
        )
    }
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::Config(msg) => write!(f, "{msg}"),
            ScrapeError::File { path, reason } => {
                write!(f, "Could not read targets from '{path}': {reason}")
            }
            ScrapeError::Fetch { url, reason } => write!(f, "Error fetching {url}: {reason}"),
            ScrapeError::Parse { url, reason } => write!(f, "Could not parse {url}: {reason}"),
            ScrapeError::Pattern { pattern, reason } => {
                write!(f, "Invalid pattern '{pattern}': {reason}")
            }
        }
    }
}

impl error::Error for ScrapeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// only the run-level variants are fatal
    fn fatal_variants_are_config_file_and_pattern() {
        assert!(ScrapeError::Config("nope".into()).is_fatal());
        assert!(ScrapeError::File {
            path: "targets.txt".into(),
            reason: "gone".into()
        }
        .is_fatal());
        assert!(ScrapeError::Pattern {
            pattern: "(".into(),
            reason: "unclosed group".into()
        }
        .is_fatal());
        assert!(!ScrapeError::Fetch {
            url: "http://localhost".into(),
            reason: "refused".into()
        }
        .is_fatal());
        assert!(!ScrapeError::Parse {
            url: "http://localhost".into(),
            reason: "binary".into()
        }
        .is_fatal());
    }

    #[test]
    /// fetch errors name both the url and the cause
    fn fetch_error_display_includes_url_and_cause() {
        let err = ScrapeError::Fetch {
            url: "http://localhost/page".into(),
            reason: "404 Not Found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://localhost/page"));
        assert!(msg.contains("404 Not Found"));
    }
}
