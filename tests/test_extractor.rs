use assert_cmd::prelude::*;
use httpmock::Method::GET;
use httpmock::MockServer;
use linkscrape::extractor::{extract, extract_with_str};
use linkscrape::patterns::{LinkPattern, MAGNET_PATTERN, TORRENT_PATTERN};
use predicates::prelude::*;
use std::process::Command;

/// a typical release listing
const RELEASES: &str = r#"<!DOCTYPE html>
<html>
  <head><title>releases</title><link href="style.css" rel="stylesheet"></head>
  <body>
    <ul>
      <li><a href="magnet:?xt=urn:btih:AAA">first</a></li>
      <li><a href="https://mirror.example.org/pub/first.torrent">first (mirror)</a></li>
      <li><a href="files/second.torrent">second</a></li>
      <li><a href="../third.torrent">third</a></li>
      <li><a href="//cdn.example.net/fourth.torrent">fourth</a></li>
      <li><a href="files/second.torrent">second, again</a></li>
      <li><a href="second.torrent.sig">signature</a></li>
      <li><a href="magnet:?xt=urn:btih:AAA">first, again</a></li>
    </ul>
  </body>
</html>"#;

#[test]
/// magnet links are kept verbatim and deduplicated
fn extractor_finds_magnet_links_in_listing() {
    let pattern = LinkPattern::new("magnet links", MAGNET_PATTERN).unwrap();
    let links = extract(
        "http://example.com/pub/releases/",
        RELEASES.as_bytes(),
        &pattern,
    )
    .unwrap();

    assert_eq!(links.len(), 1);
    assert!(links.contains("magnet:?xt=urn:btih:AAA"));
}

#[test]
/// every flavor of torrent link is made absolute; suffix-only matching skips the signature
fn extractor_resolves_torrent_links_in_listing() {
    let pattern = LinkPattern::new("torrents", TORRENT_PATTERN).unwrap();
    let links = extract(
        "http://example.com/pub/releases/",
        RELEASES.as_bytes(),
        &pattern,
    )
    .unwrap();

    assert_eq!(links.len(), 4);
    assert!(links.contains("https://mirror.example.org/pub/first.torrent"));
    assert!(links.contains("http://example.com/pub/releases/files/second.torrent"));
    assert!(links.contains("http://example.com/pub/third.torrent"));
    assert!(links.contains("http://cdn.example.net/fourth.torrent"));
}

#[test]
/// <link href> isn't a hyperlink
fn extractor_ignores_non_anchor_elements() {
    let links = extract_with_str(
        "http://example.com/pub/releases/",
        RELEASES.as_bytes(),
        r"\.css$",
    )
    .unwrap();

    assert!(links.is_empty());
}

#[test]
/// a bad regex is reported as an error, not an empty result
fn extractor_reports_invalid_pattern() {
    let result = extract_with_str("http://example.com/", RELEASES.as_bytes(), "[");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid pattern '['"));
}

#[test]
/// relative links are resolved against the url the page was requested from
fn extractor_resolves_against_requested_url() -> Result<(), Box<dyn std::error::Error>> {
    let srv = MockServer::start();
    let mock = srv.mock(|when, then| {
        when.method(GET).path("/pub/releases/");
        then.status(200).body(RELEASES);
    });

    let cmd = Command::cargo_bin("linkscrape")
        .unwrap()
        .arg("--url")
        .arg(srv.url("/pub/releases/"))
        .arg("--silent")
        .unwrap();

    cmd.assert().success().stdout(
        predicate::str::contains("magnet:?xt=urn:btih:AAA")
            .and(predicate::str::contains(srv.url(
                "/pub/releases/files/second.torrent",
            )))
            .and(predicate::str::contains(srv.url("/pub/third.torrent")))
            .and(predicate::str::contains(
                "https://mirror.example.org/pub/first.torrent",
            ))
            .and(predicate::str::contains("http://cdn.example.net/fourth.torrent"))
            .and(predicate::str::contains("second.torrent.sig").not()),
    );

    assert_eq!(mock.hits(), 1);
    Ok(())
}
