//! Document fetching.
//!
//! [`fetch`] turns a location into a parsed [`Document`]. A location that is an
//! absolute `http://` or `https://` address is retrieved through a
//! [`Fetcher`]; anything else is treated as the document content itself. The
//! literal mode lets tests and offline runs feed fixture markup straight into
//! the pipeline without a server.
//!
//! Transport failures (connection errors, non-success status) surface as
//! [`FetchError`]. Parsing never fails; see [`crate::document`].

use crate::document::{DataDocument, Document, MarkupDocument};
use async_trait::async_trait;
use log::debug;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status { url: Url, status: u16 },
    #[error("Invalid location {location:?}: {source}")]
    InvalidLocation {
        location: String,
        source: url::ParseError,
    },
}

/// How the fetched text should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// HTML listing pages.
    Markup,
    /// XML detail documents.
    Data,
}

/// Retrieves raw text from a network address.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// True when `location` names a network resource rather than literal content.
pub fn is_network_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch `location` (or take it literally) and parse it as `kind`.
pub async fn fetch(
    fetcher: &dyn Fetcher,
    location: &str,
    kind: DocumentKind,
) -> Result<Document, FetchError> {
    let text = if is_network_location(location) {
        let url = Url::parse(location).map_err(|source| FetchError::InvalidLocation {
            location: location.to_string(),
            source,
        })?;
        fetcher.get_text(&url).await?
    } else {
        location.to_string()
    };
    Ok(parse(&text, kind))
}

pub fn parse(text: &str, kind: DocumentKind) -> Document {
    match kind {
        DocumentKind::Markup => Document::Markup(MarkupDocument::parse(text)),
        DocumentKind::Data => Document::Data(DataDocument::parse(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StructuredDocument;
    use crate::test_helpers::MapFetcher;

    #[tokio::test]
    async fn literal_content_is_parsed_without_fetching() {
        let fetcher = MapFetcher::default();
        let doc = fetch(&fetcher, "<p class='x'>hello</p>", DocumentKind::Markup)
            .await
            .unwrap();
        assert_eq!(doc.query("p.x").unwrap().text(), "hello");
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn network_location_goes_through_fetcher() {
        let fetcher = MapFetcher::default().with("https://example.com/a", "<image>big.png</image>");
        let doc = fetch(&fetcher, "https://example.com/a", DocumentKind::Data)
            .await
            .unwrap();
        assert_eq!(doc.query("image").unwrap().text(), "big.png");
        assert_eq!(fetcher.requests(), vec!["https://example.com/a".to_string()]);
    }

    #[tokio::test]
    async fn non_success_status_propagates() {
        let fetcher = MapFetcher::default();
        let err = fetch(&fetcher, "https://example.com/missing", DocumentKind::Markup)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn malformed_network_location_is_rejected() {
        let fetcher = MapFetcher::default();
        let err = fetch(&fetcher, "http://[::1", DocumentKind::Markup)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidLocation { .. }));
    }

    #[test]
    fn network_location_detection() {
        assert!(is_network_location("https://github.com/x"));
        assert!(is_network_location("http://localhost:8080/proxy"));
        assert!(!is_network_location("/proxy/github"));
        assert!(!is_network_location("<html></html>"));
    }
}
