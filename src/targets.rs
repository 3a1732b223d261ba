//! turn the user's choice of `--url` or `--file` into an ordered list of target urls
use std::fs::read_to_string;
use std::path::Path;

use crate::errors::ScrapeError;

/// Resolve the target urls for a run
///
/// exactly one of `url` or `file` must be given. Files hold one url per line; lines are trimmed
/// and blank lines are ignored. There is no comment syntax.
pub fn resolve(url: Option<&str>, file: Option<&str>) -> Result<Vec<String>, ScrapeError> {
    log::trace!("enter: resolve({:?}, {:?})", url, file);

    let targets = match (url, file) {
        (Some(_), Some(_)) => {
            return Err(ScrapeError::Config(
                "--url and --file are mutually exclusive; provide only one".to_string(),
            ))
        }
        (None, None) => {
            return Err(ScrapeError::Config(
                "one of --url or --file is required".to_string(),
            ))
        }
        (Some(single), None) => {
            let trimmed = single.trim();

            if trimmed.is_empty() {
                return Err(ScrapeError::Config("--url must not be empty".to_string()));
            }

            vec![trimmed.to_string()]
        }
        (None, Some(path)) => read_targets_file(path)?,
    };

    if targets.is_empty() {
        return Err(ScrapeError::Config(
            "No valid URLs provided. Exiting.".to_string(),
        ));
    }

    log::trace!("exit: resolve -> {:?}", targets);
    Ok(targets)
}

/// read newline separated urls from `path`
fn read_targets_file(path: &str) -> Result<Vec<String>, ScrapeError> {
    if !Path::new(path).exists() {
        return Err(ScrapeError::File {
            path: path.to_string(),
            reason: "file not found".to_string(),
        });
    }

    let contents = read_to_string(path).map_err(|e| ScrapeError::File {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
