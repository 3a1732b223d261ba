use anyhow::Result;
use console::{strip_ansi_codes, style};
use std::io::Write;

use crate::traits::ScrapeSerialize;

/// Takes in a string and colors it using console::style
///
/// mainly just a wrapper to get the error messages colored consistently
pub fn fmt_err(msg: &str) -> String {
    format!("{}: {}", status_colorizer("ERROR"), msg)
}

/// Takes in a string and examines the first character to return a color version of the same
/// string
pub fn status_colorizer(status: &str) -> String {
    match status.chars().next() {
        Some('E') => style(status).red().bold().to_string(), // error
        Some('W') => style(status).yellow().to_string(),     // warning
        Some('O') => style(status).green().bold().to_string(), // ok
        Some('M') => style(status).cyan().to_string(),       // matched
        _ => status.to_string(),
    }
}

/// Takes in a string and colors it using console::style
///
/// mainly just a wrapper to get the module names colored consistently
pub fn module_colorizer(modname: &str) -> String {
    style(modname).cyan().to_string()
}

/// write the given value to `writer`, either as NDJSON or as its human readable form
///
/// colors are removed from the human readable form, since the destination is a file
pub fn write_to<T>(value: &T, writer: &mut dyn Write, convert_to_json: bool) -> Result<()>
where
    T: ScrapeSerialize,
{
    let contents = if convert_to_json {
        value.as_json()?
    } else {
        strip_ansi_codes(&value.as_str()).to_string()
    };

    writer.write_all(contents.as_bytes())?;
    writer.flush()?;

    Ok(())
}
