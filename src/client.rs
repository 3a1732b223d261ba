use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client, Proxy};
use std::collections::HashMap;
use std::convert::TryInto;
use std::time::Duration;

/// Maximum number of redirects followed when redirects are enabled
pub const MAX_REDIRECTS: usize = 10;

/// Configuration struct for initializing a reqwest client
#[derive(Debug)]
pub struct ClientConfig<'a> {
    /// The timeout for requests in seconds
    pub timeout: u64,
    /// The User-Agent string to use for requests
    pub user_agent: &'a str,
    /// Whether to follow redirects
    pub redirects: bool,
    /// Whether to allow insecure connections
    pub insecure: bool,
    /// Headers to include in requests
    pub headers: &'a HashMap<String, String>,
    /// Proxy server to use for requests
    pub proxy: Option<&'a str>,
}

/// Create and return an instance of [reqwest::Client](https://docs.rs/reqwest/latest/reqwest/struct.Client.html)
pub fn initialize(config: ClientConfig<'_>) -> Result<Client> {
    log::trace!("enter: initialize({:?})", config);

    let policy = if config.redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    let header_map: HeaderMap = config
        .headers
        .try_into()
        .context("Could not convert headers into a HeaderMap")?;

    let mut client = Client::builder()
        .timeout(Duration::new(config.timeout, 0))
        .user_agent(config.user_agent)
        .danger_accept_invalid_certs(config.insecure)
        .default_headers(header_map)
        .redirect(policy);

    if let Some(some_proxy) = config.proxy {
        if !some_proxy.is_empty() {
            // it's not an empty string; set the proxy
            let proxy_obj = Proxy::all(some_proxy)
                .with_context(|| format!("Could not use {some_proxy} as a proxy"))?;
            client = client.proxy(proxy_obj);
        }
    }

    log::trace!("exit: initialize");
    Ok(client.build()?)
}
