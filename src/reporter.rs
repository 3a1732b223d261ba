//! rendering of per-url results to the terminal and, optionally, an output file
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use console::{strip_ansi_codes, style};
use serde::Serialize;

use crate::{
    config::Configuration,
    errors::ScrapeError,
    extractor::PatternMatches,
    traits::ScrapeSerialize,
    utils::fmt_err,
};

/// horizontal rule framing section headers in human readable output
const RULE: &str = "========================================================";

/// How results are rendered
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// section per url, section per pattern, completion banner
    #[default]
    Text,

    /// matched urls only, one per line
    Silent,

    /// one json object per url, plus a summary object
    Json,
}

/// given the current settings for silent and json, determine the output format (DRY helper)
pub fn determine_output_format(silent: bool, json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if silent {
        OutputFormat::Silent
    } else {
        OutputFormat::Text
    }
}

/// Outcome of scraping a single url
#[derive(Debug, Serialize)]
pub struct PageReport {
    #[serde(rename = "type")]
    /// Name of this type of struct, used for serialization, i.e. `{"type":"page"}`
    kind: String,

    /// url that was scraped
    pub url: String,

    /// per-pattern matches, in pattern order; empty when `error` is set
    pub results: Vec<PatternMatches>,

    /// why this url could not be scraped
    pub error: Option<String>,
}

impl PageReport {
    /// successful scrape of `url`
    pub fn found(url: &str, results: Vec<PatternMatches>) -> Self {
        Self {
            kind: "page".to_string(),
            url: url.to_string(),
            results,
            error: None,
        }
    }

    /// failed scrape of `url`
    pub fn failed(url: &str, error: &ScrapeError) -> Self {
        Self {
            kind: "page".to_string(),
            url: url.to_string(),
            results: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// whether or not this url failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// links matched by a single pattern, sorted for stable display
    fn sorted_links(matches: &PatternMatches) -> Vec<&String> {
        let mut links: Vec<&String> = matches.links.iter().collect();
        links.sort();
        links
    }

    /// matched urls, one per line; a link matched by more than one pattern is printed once,
    /// under the first pattern that matched it
    fn as_silent_str(&self) -> String {
        let mut output = String::new();
        let mut seen = HashSet::new();

        for matches in &self.results {
            for link in Self::sorted_links(matches) {
                if seen.insert(link) {
                    output.push_str(link);
                    output.push('\n');
                }
            }
        }

        output
    }
}

impl ScrapeSerialize for PageReport {
    /// Create a string representation of the report
    ///
    /// ex:
    /// ========================================================
    /// SCRAPING RESULTS FOR: http://localhost/releases
    /// ========================================================
    ///
    /// --- Found magnet links ---
    /// magnet:?xt=urn:btih:ABC123
    ///
    /// --- Found .torrent file links ---
    /// No .torrent file links found on http://localhost/releases
    fn as_str(&self) -> String {
        let mut output = format!(
            "\n{RULE}\n{} {}\n{RULE}\n",
            style("SCRAPING RESULTS FOR:").bold(),
            self.url
        );

        if let Some(error) = &self.error {
            output.push_str(&format!("\n{}\n", fmt_err(error)));
            return output;
        }

        for matches in &self.results {
            output.push_str(&format!(
                "\n{}\n",
                style(format!("--- Found {} ---", matches.label)).cyan()
            ));

            if matches.links.is_empty() {
                output.push_str(&format!(
                    "{}\n",
                    style(format!("No {} found on {}", matches.label, self.url)).dim()
                ));
                continue;
            }

            for link in Self::sorted_links(matches) {
                output.push_str(link);
                output.push('\n');
            }
        }

        output
    }

    /// Create an NDJSON representation of the report
    ///
    /// (expanded for clarity)
    /// ex:
    /// {
    ///   "type": "page",
    ///   "url": "http://localhost/releases",
    ///   "results": [
    ///     {"label": "magnet links", "pattern": "^magnet:", "links": ["magnet:?xt=..."]}
    ///   ],
    ///   "error": null
    /// }\n
    fn as_json(&self) -> Result<String> {
        let mut json = serde_json::to_string(&self)
            .with_context(|| fmt_err(&format!("Could not convert {} to JSON", self.url)))?;
        json.push('\n');
        Ok(json)
    }
}

/// Totals for an entire batch
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct BatchSummary {
    #[serde(rename = "type")]
    /// Name of this type of struct, used for serialization, i.e. `{"type":"summary"}`
    kind: String,

    /// number of urls attempted
    pub processed: usize,

    /// number of urls that could not be fetched or parsed
    pub failed: usize,
}

impl BatchSummary {
    /// empty summary, ready to be tallied
    pub fn new() -> Self {
        Self {
            kind: "summary".to_string(),
            ..Default::default()
        }
    }

    /// count one more url
    pub fn tally(&mut self, report: &PageReport) {
        self.processed += 1;

        if report.is_error() {
            self.failed += 1;
        }
    }
}

impl ScrapeSerialize for BatchSummary {
    /// the completion banner
    fn as_str(&self) -> String {
        format!(
            "\n{RULE}\n{}\n{RULE}\n",
            style("SCRAPING COMPLETE.").green().bold()
        )
    }

    /// Create an NDJSON representation of the summary
    ///
    /// ex: {"type":"summary","processed":3,"failed":1}\n
    fn as_json(&self) -> Result<String> {
        let mut json = serde_json::to_string(&self)
            .with_context(|| fmt_err("Could not convert BatchSummary to JSON"))?;
        json.push('\n');
        Ok(json)
    }
}

/// Writes rendered results to `terminal` and to the output file, if one was given
pub struct Reporter<W: Write> {
    /// destination for normal output, stdout outside of tests
    terminal: W,

    /// how results are rendered
    format: OutputFormat,

    /// optional copy of all output, without colors
    file: Option<BufWriter<std::fs::File>>,
}

impl<W: Write> Reporter<W> {
    /// create a Reporter from the run's configuration
    pub fn new(config: &Configuration, terminal: W) -> Result<Self> {
        let file = if config.output.is_empty() {
            None
        } else {
            let f = OpenOptions::new() // std fs
                .create(true)
                .append(true)
                .open(&config.output)
                .with_context(|| fmt_err(&format!("Could not open {}", &config.output)))?;
            Some(BufWriter::new(f))
        };

        Ok(Self {
            terminal,
            format: determine_output_format(config.silent, config.json),
            file,
        })
    }

    /// render the results for a single url
    pub fn report_page(&mut self, report: &PageReport) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Text => report.as_str(),
            OutputFormat::Json => report.as_json()?,
            OutputFormat::Silent => {
                if let Some(error) = &report.error {
                    // nothing but urls go to stdout; errors still need to be seen
                    eprintln!("{}", fmt_err(error));
                }
                report.as_silent_str()
            }
        };

        self.emit(&rendered)
    }

    /// render the end-of-batch banner / summary
    pub fn finish(&mut self, summary: &BatchSummary) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Text => summary.as_str(),
            OutputFormat::Json => summary.as_json()?,
            OutputFormat::Silent => String::new(),
        };

        self.emit(&rendered)?;

        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }

        Ok(())
    }

    /// write to the terminal and the output file
    fn emit(&mut self, rendered: &str) -> Result<()> {
        if rendered.is_empty() {
            return Ok(());
        }

        self.terminal.write_all(rendered.as_bytes())?;
        self.terminal.flush()?;

        if let Some(file) = self.file.as_mut() {
            file.write_all(strip_ansi_codes(rendered).as_bytes())?;
        }

        Ok(())
    }

    /// hand back the terminal writer
    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::LinkSet;
    use std::fs::read_to_string;
    use tempfile::TempDir;

    fn matches(label: &str, links: &[&str]) -> PatternMatches {
        PatternMatches {
            label: label.to_string(),
            pattern: "x".to_string(),
            links: links.iter().map(|s| s.to_string()).collect::<LinkSet>(),
        }
    }

    fn sample_report() -> PageReport {
        PageReport::found(
            "http://localhost/releases",
            vec![
                matches("magnet links", &["magnet:?xt=urn:btih:ABC123"]),
                matches(".torrent file links", &[]),
            ],
        )
    }

    fn config(silent: bool, json: bool) -> Configuration {
        Configuration {
            silent,
            json,
            ..Default::default()
        }
    }

    #[test]
    /// json wins over silent
    fn output_format_precedence() {
        assert_eq!(determine_output_format(false, false), OutputFormat::Text);
        assert_eq!(determine_output_format(true, false), OutputFormat::Silent);
        assert_eq!(determine_output_format(true, true), OutputFormat::Json);
        assert_eq!(determine_output_format(false, true), OutputFormat::Json);
    }

    #[test]
    /// text output lists matches and says so when nothing was found
    fn page_report_as_str_lists_matches_and_none_found() {
        let text = strip_ansi_codes(&sample_report().as_str()).to_string();

        assert!(text.contains("SCRAPING RESULTS FOR: http://localhost/releases"));
        assert!(text.contains("--- Found magnet links ---\nmagnet:?xt=urn:btih:ABC123\n"));
        assert!(text.contains("--- Found .torrent file links ---"));
        assert!(text.contains("No .torrent file links found on http://localhost/releases"));
    }

    #[test]
    /// failed pages show the error instead of pattern sections
    fn page_report_as_str_with_error() {
        let err = ScrapeError::Fetch {
            url: "http://localhost/down".to_string(),
            reason: "server responded with 500 Internal Server Error".to_string(),
        };
        let report = PageReport::failed("http://localhost/down", &err);
        let text = strip_ansi_codes(&report.as_str()).to_string();

        assert!(report.is_error());
        assert!(text.contains("Error fetching http://localhost/down"));
        assert!(text.contains("500"));
        assert!(!text.contains("--- Found"));
    }

    #[test]
    /// json output is one object per line
    fn page_report_as_json() {
        let json = sample_report().as_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "page");
        assert_eq!(value["url"], "http://localhost/releases");
        assert_eq!(value["results"][0]["links"][0], "magnet:?xt=urn:btih:ABC123");
        assert!(value["error"].is_null());
    }

    #[test]
    /// summary counts processed and failed urls
    fn batch_summary_tallies() {
        let mut summary = BatchSummary::new();
        summary.tally(&sample_report());
        summary.tally(&PageReport::failed(
            "http://localhost",
            &ScrapeError::Parse {
                url: "http://localhost".to_string(),
                reason: "binary".to_string(),
            },
        ));

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            summary.as_json().unwrap(),
            "{\"type\":\"summary\",\"processed\":2,\"failed\":1}\n"
        );
    }

    #[test]
    /// the text reporter ends with the completion banner
    fn reporter_text_ends_with_banner() {
        let mut reporter = Reporter::new(&config(false, false), Vec::new()).unwrap();
        reporter.report_page(&sample_report()).unwrap();
        reporter.finish(&BatchSummary::new()).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let output = strip_ansi_codes(&output);

        assert!(output.contains("magnet:?xt=urn:btih:ABC123"));
        assert!(output.trim_end().ends_with(RULE));
        assert!(output.contains("SCRAPING COMPLETE."));
    }

    #[test]
    /// silent output is nothing but urls
    fn reporter_silent_only_prints_urls() {
        let mut reporter = Reporter::new(&config(true, false), Vec::new()).unwrap();
        reporter.report_page(&sample_report()).unwrap();
        reporter.finish(&BatchSummary::new()).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "magnet:?xt=urn:btih:ABC123\n");
    }

    #[test]
    /// a link matched by two patterns is only printed once in silent mode
    fn reporter_silent_prints_each_link_once() {
        let report = PageReport::found(
            "http://localhost/",
            vec![
                matches("torrents", &["http://localhost/a.torrent"]),
                matches("everything", &["http://localhost/a.torrent", "http://localhost/b"]),
            ],
        );

        let mut reporter = Reporter::new(&config(true, false), Vec::new()).unwrap();
        reporter.report_page(&report).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "http://localhost/a.torrent\nhttp://localhost/b\n");
    }

    #[test]
    /// output file receives an uncolored copy of everything
    fn reporter_writes_output_file() {
        let tmp_dir = TempDir::new().unwrap();
        let out = tmp_dir.path().join("results.txt");
        let config = Configuration {
            output: out.to_str().unwrap().to_string(),
            ..Default::default()
        };

        let mut reporter = Reporter::new(&config, Vec::new()).unwrap();
        reporter.report_page(&sample_report()).unwrap();
        reporter.finish(&BatchSummary::new()).unwrap();

        let contents = read_to_string(&out).unwrap();
        assert!(contents.contains("SCRAPING RESULTS FOR: http://localhost/releases"));
        assert!(contents.contains("SCRAPING COMPLETE."));
        assert!(!contents.contains('\u{1b}'));
    }
}
