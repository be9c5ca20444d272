pub mod document;
pub mod http;
pub mod markup;

pub use document::{MemoryBackground, MemoryLoader, StaticDocument};
pub use http::{HttpImageFetcher, HttpInlineImage};
pub use markup::{DownloadButtonMarkup, PageMarkup};

use curtain_core::DocumentError;
use reqwest::{Client, Url};

/// Fetches a page and builds a static document whose relative sources
/// resolve against the page URL.
pub async fn fetch_document(client: &Client, url: &str) -> Result<StaticDocument, DocumentError> {
    let base = Url::parse(url).map_err(|e| DocumentError::parsing_error(format!("{}: {}", url, e)))?;
    let html = client
        .get(base.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| DocumentError::fetch_error(url, e.to_string()))?
        .text()
        .await
        .map_err(|e| DocumentError::fetch_error(url, e.to_string()))?;

    tracing::debug!(url, bytes = html.len(), "page markup fetched");
    StaticDocument::parse(&html, HttpImageFetcher::new(client.clone(), Some(base)))
}
