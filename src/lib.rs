pub mod client;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod logger;
mod message;
pub mod parser;
pub mod patterns;
pub mod reporter;
pub mod scanner;
pub mod targets;
pub mod traits;
pub mod utils;

/// Version pulled from Cargo.toml at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default filename for config file settings
///
/// Expected location is in the same directory as the linkscrape binary.
pub const DEFAULT_CONFIG_NAME: &str = "linkscrape.toml";

/// Default number of seconds before a single fetch is abandoned
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Default User-Agent header, a desktop browser so that pages render the same content they'd
/// show a person
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// asserts default config name is correct
    fn default_config_name() {
        assert_eq!(DEFAULT_CONFIG_NAME, "linkscrape.toml");
    }

    #[test]
    /// asserts default version is correct
    fn default_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    /// asserts default timeout is correct
    fn default_timeout() {
        assert_eq!(DEFAULT_TIMEOUT, 10);
    }

    #[test]
    /// the user agent is a single line
    fn default_user_agent_is_one_line() {
        assert!(DEFAULT_USER_AGENT.starts_with("Mozilla/5.0 (Windows NT 10.0; Win64; x64) "));
        assert!(DEFAULT_USER_AGENT.ends_with("Chrome/91.0.4472.124 Safari/537.36"));
        assert!(!DEFAULT_USER_AGENT.contains('\n'));
        assert!(!DEFAULT_USER_AGENT.contains("  "));
    }
}
