use clap::{crate_authors, crate_description, crate_version, Arg, ArgAction, Command};

/// Create and return an instance of [clap::Command](https://docs.rs/clap/latest/clap/struct.Command.html), i.e. the Command Line Interface's configuration
pub fn initialize() -> Command {
    let app = Command::new("linkscrape")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!());

    /////////////////////////////////////////////////////////////////////
    // group - target selection
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help_heading("Target selection")
                .help("The single URL of the webpage to scrape"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_hint(clap::ValueHint::FilePath)
                .help_heading("Target selection")
                .help("Path to a file containing a list of URLs, one per line"),
        );

    /////////////////////////////////////////////////////////////////////
    // group - matching
    /////////////////////////////////////////////////////////////////////
    let app = app.arg(
        Arg::new("patterns")
            .short('p')
            .long("pattern")
            .value_name("REGEX")
            .num_args(1)
            .action(ArgAction::Append)
            .help_heading("Matching")
            .help(
                "Regular expression tested against each link's href (unanchored); may be used \
                 more than once (default: ^magnet: and \\.torrent$)",
            ),
    );

    /////////////////////////////////////////////////////////////////////
    // group - client settings
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("user_agent")
                .short('a')
                .long("user-agent")
                .value_name("USER_AGENT")
                .help_heading("Client settings")
                .help("Sets the User-Agent (default: a desktop Chrome user agent)"),
        )
        .arg(
            Arg::new("timeout")
                .short('T')
                .long("timeout")
                .value_name("SECONDS")
                .help_heading("Client settings")
                .help("Number of seconds before a request times out (default: 10)"),
        )
        .arg(
            Arg::new("headers")
                .short('H')
                .long("headers")
                .value_name("HEADER")
                .num_args(1)
                .action(ArgAction::Append)
                .help_heading("Client settings")
                .help("Specify HTTP headers to be used in each request (ex: -H Header:val -H 'stuff: things')"),
        )
        .arg(
            Arg::new("proxy")
                .short('x')
                .long("proxy")
                .value_name("PROXY")
                .value_hint(clap::ValueHint::Url)
                .help_heading("Client settings")
                .help("Proxy to use for requests (ex: http(s)://host:port, socks5(h)://host:port)"),
        )
        .arg(
            Arg::new("insecure")
                .short('k')
                .long("insecure")
                .num_args(0)
                .help_heading("Client settings")
                .help("Disables TLS certificate validation"),
        )
        .arg(
            Arg::new("no_redirects")
                .long("no-redirects")
                .num_args(0)
                .help_heading("Client settings")
                .help("Do not follow redirects"),
        );

    /////////////////////////////////////////////////////////////////////
    // group - batch settings
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .value_name("PARALLEL_SCRAPES")
                .help_heading("Batch settings")
                .help("Number of URLs fetched at the same time; output order is unaffected (default: 1)"),
        )
        .arg(
            Arg::new("time_limit")
                .long("time-limit")
                .value_name("TIME_SPEC")
                .value_parser(valid_time_spec)
                .help_heading("Batch settings")
                .help("Limit total run time of the batch (ex: --time-limit 10m)"),
        );

    /////////////////////////////////////////////////////////////////////
    // group - output settings
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .action(ArgAction::Count)
                .help_heading("Output settings")
                .help("Increase verbosity level (use -vv or more for greater effect)"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .num_args(0)
                .help_heading("Output settings")
                .help("Only print matched URLs"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .num_args(0)
                .help_heading("Output settings")
                .help("Emit results (and --debug-log entries) as NDJSON"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .value_hint(clap::ValueHint::FilePath)
                .help_heading("Output settings")
                .help("Output file to write results to (use w/ --json for JSON entries)"),
        )
        .arg(
            Arg::new("debug_log")
                .long("debug-log")
                .value_name("FILE")
                .value_hint(clap::ValueHint::FilePath)
                .help_heading("Output settings")
                .help("Output file to write log entries (use w/ --json for JSON entries)"),
        );

    app.after_long_help(
        "EXAMPLES:\n    \
        Magnet and .torrent links from a single page:\n        \
            linkscrape --url https://example.com/releases\n\n    \
        Many pages, one URL per line:\n        \
            linkscrape -f urls.txt\n\n    \
        Custom patterns, only print the links:\n        \
            linkscrape -u https://example.com/ -p '\\.iso$' -p '\\.zip$' --silent\n",
    )
}

/// Validate that a string is formatted as a number followed by s, m, h, or d (10d, 30s, etc...)
/// and that the number of seconds it describes fits in a u64
fn valid_time_spec(time_spec: &str) -> Result<String, String> {
    let mut chars = time_spec.chars();
    let unit = chars.next_back();
    let number = chars.as_str();

    let multiplier: Option<u64> = match unit.map(|c| c.to_ascii_lowercase()) {
        Some('s') => Some(1),
        Some('m') => Some(60),
        Some('h') => Some(60 * 60),
        Some('d') => Some(60 * 60 * 24),
        _ => None,
    };

    let seconds = match (multiplier, number.parse::<u64>()) {
        (Some(multiplier), Ok(length)) if !number.is_empty() => length.checked_mul(multiplier),
        _ => None,
    };

    if seconds.is_some() {
        Ok(time_spec.to_string())
    } else {
        Err(
            "Expected a non-negative, whole number followed by s, m, h, or d (case insensitive)"
                .to_string(),
        )
    }
}
