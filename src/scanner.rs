//! the batch driver: fetch each target, apply every pattern, report, move on
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use futures::{stream, StreamExt};
use reqwest::Client;
use tokio::time::Instant;

use crate::{
    errors::ScrapeError,
    extractor::{Extractor, PatternMatches},
    fetcher,
    patterns::LinkPattern,
    reporter::{BatchSummary, PageReport, Reporter},
};

/// Runs fetch + extract pipelines over a list of target urls
///
/// a failure for one url is reported and never stops the urls that come after it
#[derive(Debug)]
pub struct Scraper {
    /// client shared by every fetch
    client: Client,

    /// patterns compiled once for the whole batch
    patterns: Vec<LinkPattern>,

    /// maximum number of pipelines in flight
    parallel: usize,

    /// upper bound on the wall-clock time of an entire batch
    time_limit: Option<Duration>,
}

impl Scraper {
    /// create a new Scraper; a `parallel` of 0 is treated as 1
    pub fn new(
        client: Client,
        patterns: Vec<LinkPattern>,
        parallel: usize,
        time_limit: Option<Duration>,
    ) -> Self {
        Self {
            client,
            patterns,
            parallel: parallel.max(1),
            time_limit,
        }
    }

    /// scrape every target, rendering each result in target order as soon as it's available
    ///
    /// the only errors returned are those encountered while writing output
    pub async fn run<W: Write>(
        &self,
        targets: &[String],
        reporter: &mut Reporter<W>,
    ) -> Result<BatchSummary> {
        log::trace!("enter: run({:?})", targets);

        // a limit too large to be represented as an Instant is no limit at all
        let deadline = self
            .time_limit
            .and_then(|limit| Instant::now().checked_add(limit));
        let mut summary = BatchSummary::new();

        // `buffered` yields results in the order the targets were given, regardless of which
        // pipeline finishes first
        let mut pages = stream::iter(targets)
            .map(|url| self.scrape(url, deadline))
            .buffered(self.parallel);

        while let Some(report) = pages.next().await {
            summary.tally(&report);
            reporter.report_page(&report)?;
        }

        reporter.finish(&summary)?;

        log::info!(
            "scraped {} url(s), {} failed",
            summary.processed,
            summary.failed
        );
        log::trace!("exit: run -> {:?}", summary);
        Ok(summary)
    }

    /// fetch and extract a single url, converting any failure into a report
    pub async fn scrape(&self, url: &str, deadline: Option<Instant>) -> PageReport {
        log::trace!("enter: scrape({})", url);

        let report = match self.try_scrape(url, deadline).await {
            Ok(results) => PageReport::found(url, results),
            Err(e) => {
                log::warn!("{}", e);
                PageReport::failed(url, &e)
            }
        };

        log::trace!("exit: scrape -> {:?}", report);
        report
    }

    /// the fallible part of `scrape`
    async fn try_scrape(
        &self,
        url: &str,
        deadline: Option<Instant>,
    ) -> Result<Vec<PatternMatches>, ScrapeError> {
        let body = fetcher::fetch(&self.client, url, deadline).await?;
        let extractor = Extractor::parse(url, &body)?;
        Ok(extractor.extract_all(&self.patterns))
    }
}
