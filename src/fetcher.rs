//! single http GET of a target page
use reqwest::{Client, Url};
use tokio::time::{timeout_at, Instant};

use crate::errors::ScrapeError;

/// Request `url` and return the raw body on any 2xx status
///
/// Anything else, including transport errors and non-2xx statuses, becomes a
/// `ScrapeError::Fetch` naming the url and the cause. When `deadline` is given, a request still
/// in flight at that instant is abandoned. Failures are never retried.
pub async fn fetch(
    client: &Client,
    url: &str,
    deadline: Option<Instant>,
) -> Result<Vec<u8>, ScrapeError> {
    log::trace!("enter: fetch({}, {:?})", url, deadline);

    let fetch_error = |reason: String| ScrapeError::Fetch {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| fetch_error(format!("invalid url: {e}")))?;

    let request = async {
        let response = client.get(parsed).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>(body.to_vec())
    };

    let result = match deadline {
        Some(when) => match timeout_at(when, request).await {
            Ok(inner) => inner,
            Err(_) => return Err(fetch_error("time limit reached".to_string())),
        },
        None => request.await,
    };

    let body = result.map_err(|e| match e.status() {
        Some(status) => fetch_error(format!("server responded with {status}")),
        // the alternate form of anyhow's Display walks the source chain, so the reason reads
        // like "error sending request ...: tcp connect error: Connection refused"
        None => fetch_error(format!("{:#}", anyhow::Error::from(e))),
    })?;

    log::debug!("fetched {} bytes from {}", body.len(), url);
    log::trace!("exit: fetch -> [{} bytes]", body.len());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    /// a 200 response hands back the body untouched
    async fn fetch_returns_body_on_success() {
        let srv = MockServer::start();
        let mock = srv.mock(|when, then| {
            when.method(GET)
                .path("/page")
                .header("user-agent", "linkscrape-test");
            then.status(200).body("<a href=\"x.torrent\">x</a>");
        });

        let client = Client::builder()
            .user_agent("linkscrape-test")
            .build()
            .unwrap();

        let body = fetch(&client, &srv.url("/page"), None).await.unwrap();

        assert_eq!(body, b"<a href=\"x.torrent\">x</a>");
        assert_eq!(mock.hits(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    /// a non-2xx status is a FetchError carrying the status and is requested exactly once
    async fn fetch_fails_on_error_status_without_retry() {
        let srv = MockServer::start();
        let mock = srv.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let err = fetch(&Client::new(), &srv.url("/missing"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Fetch { .. }));
        assert!(err.to_string().contains("404"));
        assert_eq!(mock.hits(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    /// urls that don't parse never hit the network
    async fn fetch_rejects_invalid_url() {
        let err = fetch(&Client::new(), "not a url", None).await.unwrap_err();
        assert!(err.to_string().contains("invalid url"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    /// transport failures carry their underlying cause
    async fn fetch_reports_connection_refused_cause() {
        // grab a free port, then close it so nothing is listening there
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = fetch(&Client::new(), &format!("http://127.0.0.1:{port}/"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Fetch { .. }));
        let message = err.to_string().to_lowercase();
        assert!(message.contains("error sending request"));
        assert!(message.contains("refused"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    /// a deadline that has already passed abandons the request
    async fn fetch_honors_deadline() {
        let srv = MockServer::start();
        srv.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_secs(2)).body("late");
        });

        let deadline = Instant::now() + Duration::from_millis(50);
        let err = fetch(&Client::new(), &srv.url("/slow"), Some(deadline))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("time limit reached"));
    }
}
