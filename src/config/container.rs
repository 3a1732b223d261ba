use super::utils::{
    parallel, parse_time_limit, patterns, redirects, report_and_exit, serialized_type,
    split_header, timeout, user_agent,
};
use crate::{
    client::{self, ClientConfig},
    parser,
    patterns::PatternSpec,
    traits::ScrapeSerialize,
    utils::fmt_err,
    DEFAULT_CONFIG_NAME,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{parser::ValueSource, ArgMatches};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    env::{current_dir, current_exe},
    fs::read_to_string,
    path::{Path, PathBuf},
};

/// macro helper to abstract away repetitive configuration updates
macro_rules! update_config_if_present {
    ($conf_val:expr, $matches:ident, $arg_name:expr, $arg_type:ty) => {
        match $matches.get_one::<$arg_type>($arg_name) {
            Some(value) => *$conf_val = value.to_owned(), // Update value
            None => {}
        }
    };
}

/// macro helper to abstract away repetitive if not default: update checks
macro_rules! update_if_not_default {
    ($old:expr, $new:expr, $default:expr) => {
        if $new != $default {
            *$old = $new;
        }
    };
}

/// macro helper to abstract away repetitive checks to see if the user has specified a value
/// for a given argument from the commandline or if we just had a default value in the parser
macro_rules! came_from_cli {
    ($matches:ident, $arg_name:expr) => {
        matches!(
            $matches.value_source($arg_name),
            Some(ValueSource::CommandLine)
        )
    };
}

/// macro helper to abstract away repetitive if not default: update checks, specifically for
/// values that are number types, i.e. usize, u64, etc
macro_rules! update_config_with_num_type_if_present {
    ($conf_val:expr, $matches:ident, $arg_name:expr, $arg_type:ty) => {
        if let Some(val) = $matches.get_one::<String>($arg_name) {
            match val.parse::<$arg_type>() {
                Ok(v) => *$conf_val = v,
                Err(_) => {
                    report_and_exit(&format!(
                        "Invalid value for --{}, must be a positive integer",
                        $arg_name
                    ));
                }
            }
        }
    };
}

/// Represents the final configuration of a run.
///
/// This struct is the combination of the following:
/// - default configuration values
/// - plus overrides read from a configuration file
/// - plus command-line options
///
/// In that order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Configuration {
    #[serde(rename = "type", default = "serialized_type")]
    /// Name of this type of struct, used for serialization, i.e. `{"type":"configuration"}`
    pub kind: String,

    /// Path to the config file used
    #[serde(default)]
    pub config: String,

    /// The single target URL
    #[serde(default)]
    pub target_url: String,

    /// File holding one target URL per line
    #[serde(default)]
    pub targets_file: String,

    /// Patterns tested against every hyperlink target
    #[serde(default = "patterns")]
    pub patterns: Vec<PatternSpec>,

    /// Sets the User-Agent
    #[serde(default = "user_agent")]
    pub user_agent: String,

    /// Number of seconds before a request times out (default: 10)
    #[serde(default = "timeout")]
    pub timeout: u64,

    /// HTTP headers to be used in each request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Proxy to use for requests (ex: http(s)://host:port, socks5(h)://host:port)
    #[serde(default)]
    pub proxy: String,

    /// Disables TLS certificate validation
    #[serde(default)]
    pub insecure: bool,

    /// Follow redirects
    #[serde(default = "redirects")]
    pub redirects: bool,

    /// Number of URLs fetched at the same time
    #[serde(default = "parallel")]
    pub parallel: usize,

    /// The maximum runtime for a batch, expressed as N[smdh] where N can be parsed into a
    /// non-negative integer and the next character is either s, m, h, or d (case insensitive)
    #[serde(default)]
    pub time_limit: String,

    /// Level of verbosity, equates to log level
    #[serde(default)]
    pub verbosity: u8,

    /// Only print matched URLs
    #[serde(default)]
    pub silent: bool,

    /// Emit results and log entries as NDJSON
    #[serde(default)]
    pub json: bool,

    /// Output file to write results to (default: stdout only)
    #[serde(default)]
    pub output: String,

    /// File in which to store debug output, used in conjunction with verbosity to dictate which
    /// logs are written
    #[serde(default)]
    pub debug_log: String,
}

impl Default for Configuration {
    /// Builds the default Configuration for linkscrape
    fn default() -> Self {
        Configuration {
            kind: serialized_type(),
            config: String::new(),
            target_url: String::new(),
            targets_file: String::new(),
            patterns: patterns(),
            user_agent: user_agent(),
            timeout: timeout(),
            headers: HashMap::new(),
            proxy: String::new(),
            insecure: false,
            redirects: redirects(),
            parallel: parallel(),
            time_limit: String::new(),
            verbosity: 0,
            silent: false,
            json: false,
            output: String::new(),
            debug_log: String::new(),
        }
    }
}

impl Configuration {
    /// Creates a [Configuration](struct.Configuration.html) object with the following
    /// built-in default values
    ///
    /// - **patterns**: `^magnet:` and `\.torrent$`
    /// - **user_agent**: [`DEFAULT_USER_AGENT`](../constant.DEFAULT_USER_AGENT.html)
    /// - **timeout**: `10` seconds
    /// - **redirects**: `true`
    /// - **insecure**: `false`
    /// - **proxy**: `None`
    /// - **headers**: `None`
    /// - **parallel**: `1` (one url at a time)
    /// - **time_limit**: `None` (no limit on length of the batch)
    /// - **verbosity**: `0` (no logging enabled)
    /// - **silent**: `false`
    /// - **json**: `false`
    /// - **output**: `None` (print to stdout)
    /// - **debug_log**: `None`
    ///
    /// After which, any values defined in a
    /// [linkscrape.toml](../constant.DEFAULT_CONFIG_NAME.html) config file will override the
    /// built-in defaults.
    ///
    /// `linkscrape.toml` can be placed in any of the following locations (in the order shown):
    /// - `/etc/linkscrape/`
    /// - `CONFIG_DIR/linkscrape/`
    /// - The same directory as the `linkscrape` executable
    /// - The user's current working directory
    ///
    /// If more than one valid configuration file is found, each one overwrites the values found
    /// previously.
    ///
    /// Finally, any options/arguments given on the commandline will override both built-in and
    /// config-file specified values.
    pub fn new() -> Result<Self> {
        // when compiling for test, we want to eliminate the runtime dependency of the parser
        if cfg!(test) {
            return Ok(Configuration::default());
        }

        let args = parser::initialize().get_matches();

        Self::from_matches(&args)
    }

    /// build a Configuration from already-parsed command line arguments, layered on top of any
    /// config files found on disk
    pub fn from_matches(args: &ArgMatches) -> Result<Self> {
        let mut config = Configuration::default();

        Self::parse_config_files(&mut config)?;

        let cli_config = Self::parse_cli_args(args);

        Self::merge_config(&mut config, cli_config);

        config.validate()?;

        Ok(config)
    }

    /// check the values that the command line parser would have rejected, but that can still
    /// arrive through a config file
    pub(super) fn validate(&self) -> Result<()> {
        if self.parallel == 0 {
            bail!(fmt_err("Invalid value for parallel, must be at least 1"));
        }

        if !self.time_limit.is_empty() && parse_time_limit(&self.time_limit).is_none() {
            bail!(fmt_err(&format!(
                "Invalid value for time_limit '{}', expected a whole number followed by s, m, h, or d",
                self.time_limit
            )));
        }

        Ok(())
    }

    /// build the http client described by this configuration
    pub fn build_client(&self) -> Result<Client> {
        let proxy = if self.proxy.is_empty() {
            None
        } else {
            Some(self.proxy.as_str())
        };

        client::initialize(ClientConfig {
            timeout: self.timeout,
            user_agent: &self.user_agent,
            redirects: self.redirects,
            insecure: self.insecure,
            headers: &self.headers,
            proxy,
        })
    }

    /// the single url, if one was configured
    pub fn url(&self) -> Option<&str> {
        (!self.target_url.is_empty()).then_some(self.target_url.as_str())
    }

    /// the targets file, if one was configured
    pub fn file(&self) -> Option<&str> {
        (!self.targets_file.is_empty()).then_some(self.targets_file.as_str())
    }

    /// Parse all possible versions of the linkscrape.toml file, adhering to the order of
    /// precedence outlined above
    fn parse_config_files(config: &mut Self) -> Result<()> {
        // merge a config found at /etc/linkscrape/linkscrape.toml
        let config_file = Path::new("/etc/linkscrape").join(DEFAULT_CONFIG_NAME);
        Self::parse_and_merge_config(config_file, config)?;

        // merge a config found at ~/.config/linkscrape/linkscrape.toml
        // config_dir() resolves to one of the following
        //   - linux: $XDG_CONFIG_HOME or $HOME/.config
        //   - macOS: $HOME/Library/Application Support
        //   - windows: {FOLDERID_RoamingAppData}
        if let Some(config_dir) = dirs::config_dir() {
            let config_file = config_dir.join("linkscrape").join(DEFAULT_CONFIG_NAME);
            Self::parse_and_merge_config(config_file, config)?;
        }

        // merge a config found in same the directory as linkscrape executable
        let exe_path = current_exe()?;
        let bin_dir = exe_path
            .parent()
            .ok_or_else(|| anyhow!("Couldn't load config"))?;
        let config_file = bin_dir.join(DEFAULT_CONFIG_NAME);
        Self::parse_and_merge_config(config_file, config)?;

        // merge a config found in the user's current working directory
        let cwd = current_dir()?;
        let config_file = cwd.join(DEFAULT_CONFIG_NAME);
        Self::parse_and_merge_config(config_file, config)?;

        Ok(())
    }

    /// Given a set of ArgMatches read from the CLI, update and return the default Configuration
    /// settings
    pub(super) fn parse_cli_args(args: &ArgMatches) -> Self {
        let mut config = Configuration::default();

        update_config_if_present!(&mut config.target_url, args, "url", String);
        update_config_if_present!(&mut config.targets_file, args, "file", String);
        update_config_if_present!(&mut config.output, args, "output", String);
        update_config_if_present!(&mut config.debug_log, args, "debug_log", String);
        update_config_if_present!(&mut config.time_limit, args, "time_limit", String);
        update_config_with_num_type_if_present!(&mut config.parallel, args, "parallel", usize);

        if config.parallel == 0 {
            report_and_exit("Invalid value for --parallel, must be at least 1");
        }

        if let Some(arg) = args.get_many::<String>("patterns") {
            config.patterns = arg.map(|regex| PatternSpec::unlabelled(regex)).collect();
        }

        if came_from_cli!(args, "silent") {
            config.silent = true;
        }

        if came_from_cli!(args, "json") {
            config.json = true;
        }

        if args.get_count("verbosity") > 0 {
            // get_count returns 0 if none are found; this is protected in
            // an if block so a verbosity from a config file isn't clobbered
            config.verbosity = args.get_count("verbosity");
        }

        ////
        // organizational breakpoint; all options below alter the Client configuration
        ////
        update_config_if_present!(&mut config.proxy, args, "proxy", String);
        update_config_if_present!(&mut config.user_agent, args, "user_agent", String);
        update_config_with_num_type_if_present!(&mut config.timeout, args, "timeout", u64);

        if came_from_cli!(args, "insecure") {
            config.insecure = true;
        }

        if came_from_cli!(args, "no_redirects") {
            config.redirects = false;
        }

        if let Some(headers) = args.get_many::<String>("headers") {
            for val in headers {
                // runs before the logger exists, so a warning here would never be seen
                let Ok((name, value)) = split_header(val) else {
                    report_and_exit(&format!(
                        "Invalid header: '{val}', expected the form 'Name: value'"
                    ));
                };
                config.headers.insert(name, value);
            }
        }

        config
    }

    /// Given a configuration file's location and an instance of `Configuration`, read in
    /// the config file if found and update the current settings with the settings found therein
    fn parse_and_merge_config(config_file: PathBuf, config: &mut Self) -> Result<()> {
        if config_file.exists() {
            // save off a string version of the path before it goes out of scope
            let conf_str = config_file.to_str().unwrap_or("").to_string();
            let settings = Self::parse_config(config_file)
                .with_context(|| fmt_err(&format!("Could not parse {conf_str}")))?;

            // set the config used for viewing in the debug log
            config.config = conf_str;

            // update the settings
            Self::merge_config(config, settings);
        }
        Ok(())
    }

    /// Given two Configurations, overwrite `settings` with the fields found in `settings_to_merge`
    pub(super) fn merge_config(conf: &mut Self, new: Self) {
        // does not include the following Configuration fields, as they don't make sense here
        //  - kind
        //  - config
        update_if_not_default!(&mut conf.target_url, new.target_url, "");
        update_if_not_default!(&mut conf.targets_file, new.targets_file, "");
        update_if_not_default!(&mut conf.patterns, new.patterns, patterns());
        update_if_not_default!(&mut conf.user_agent, new.user_agent, user_agent());
        update_if_not_default!(&mut conf.timeout, new.timeout, timeout());
        update_if_not_default!(&mut conf.headers, new.headers, HashMap::new());
        update_if_not_default!(&mut conf.proxy, new.proxy, "");
        update_if_not_default!(&mut conf.insecure, new.insecure, false);
        update_if_not_default!(&mut conf.redirects, new.redirects, redirects());
        update_if_not_default!(&mut conf.parallel, new.parallel, parallel());
        update_if_not_default!(&mut conf.time_limit, new.time_limit, "");
        update_if_not_default!(&mut conf.verbosity, new.verbosity, 0);
        update_if_not_default!(&mut conf.silent, new.silent, false);
        update_if_not_default!(&mut conf.json, new.json, false);
        update_if_not_default!(&mut conf.output, new.output, "");
        update_if_not_default!(&mut conf.debug_log, new.debug_log, "");
    }

    /// If present, read in `DEFAULT_CONFIG_NAME` and deserialize the specified values
    ///
    /// uses serde to deserialize the toml into a `Configuration` struct
    pub(super) fn parse_config(config_file: PathBuf) -> Result<Self> {
        let content = read_to_string(config_file)?;
        let config: Self = toml::from_str(content.as_str())?;
        Ok(config)
    }
}

impl ScrapeSerialize for Configuration {
    /// Simple wrapper around the Debug representation
    fn as_str(&self) -> String {
        format!("{:#?}\n", *self)
    }

    /// Create an NDJSON representation of the current run's Configuration
    ///
    /// (expanded for clarity)
    /// ex:
    /// {
    ///    "type":"configuration",
    ///    "config":"/home/user/.config/linkscrape/linkscrape.toml",
    ///    "target_url":"https://localhost.com",
    ///    "patterns":[{"label":"magnet links","regex":"^magnet:"}, ...],
    /// ...
    /// }\n
    fn as_json(&self) -> Result<String> {
        let mut json = serde_json::to_string(&self)
            .with_context(|| fmt_err("Could not convert Configuration to JSON"))?;
        json.push('\n');
        Ok(json)
    }
}
