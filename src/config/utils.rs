use crate::{
    patterns::{default_patterns, PatternSpec},
    utils::{module_colorizer, status_colorizer},
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
use anyhow::{bail, Result};
#[cfg(not(test))]
use std::process::exit;
use std::time::Duration;

/// simple helper to clean up some code reuse below; panics under test / exits in prod
pub(super) fn report_and_exit(err: &str) -> ! {
    eprintln!(
        "{} {}: {}",
        status_colorizer("ERROR"),
        module_colorizer("Configuration::new"),
        err
    );

    #[cfg(test)]
    panic!();
    #[cfg(not(test))]
    exit(1);
}

// functions timeout, user_agent, redirects, parallel and patterns are used to provide defaults
// in the event that a linkscrape.toml is found but one or more of the values below aren't listed
// in the config.  This way, we get the correct defaults upon Deserialization

/// default Configuration type for use in json output
pub(super) fn serialized_type() -> String {
    String::from("configuration")
}

/// default timeout value
pub(super) fn timeout() -> u64 {
    DEFAULT_TIMEOUT
}

/// default user-agent
pub(super) fn user_agent() -> String {
    String::from(DEFAULT_USER_AGENT)
}

/// default redirects value
pub(super) fn redirects() -> bool {
    true
}

/// default parallel value
pub(super) fn parallel() -> usize {
    1
}

/// default patterns
pub(super) fn patterns() -> Vec<PatternSpec> {
    default_patterns()
}

/// split a header given as `Name: value` into its two halves
pub fn split_header(header: &str) -> Result<(String, String)> {
    let Some((name, value)) = header.split_once(':') else {
        bail!("expected a header in the form 'Name: value', got '{}'", header);
    };

    let name = name.trim();

    if name.is_empty() {
        bail!("header name must not be empty: '{}'", header);
    }

    Ok((name.to_string(), value.trim().to_string()))
}

/// Parse a time spec such as `30s`, `10m`, `2h` or `1d` into a Duration
///
/// returns None when the spec can't be understood or doesn't fit in a u64 number of seconds
pub fn parse_time_limit(time_spec: &str) -> Option<Duration> {
    let mut chars = time_spec.trim().chars();
    let unit = chars.next_back()?;
    let length = chars.as_str().parse::<u64>().ok()?;

    let multiplier: u64 = match unit.to_ascii_lowercase() {
        's' => 1,
        'm' => 60,           // minutes
        'h' => 60 * 60,      // hours
        'd' => 60 * 60 * 24, // days
        _ => return None,
    };

    length.checked_mul(multiplier).map(Duration::from_secs)
}
