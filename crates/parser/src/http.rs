use async_trait::async_trait;
use curtain_core::{DocumentError, ImageFetcher, ImageReadiness, InlineImage, LoadOutcome};
use reqwest::{Client, Url};

/// Loads images over HTTP, resolving relative sources against the page URL.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
    base: Option<Url>,
}

impl HttpImageFetcher {
    pub fn new(client: Client, base: Option<Url>) -> Self {
        Self { client, base }
    }

    pub fn resolve(&self, src: &str) -> Result<Url, DocumentError> {
        if src.trim().is_empty() {
            return Err(DocumentError::parsing_error("empty image source"));
        }
        match (Url::parse(src), &self.base) {
            (Ok(url), _) => Ok(url),
            (Err(_), Some(base)) => base
                .join(src)
                .map_err(|e| DocumentError::parsing_error(format!("{}: {}", src, e))),
            (Err(e), None) => Err(DocumentError::parsing_error(format!(
                "relative source {} without a base URL: {}",
                src, e
            ))),
        }
    }

    /// A 2xx response with a non-empty body counts as loaded.
    pub async fn load(&self, src: &str) -> LoadOutcome {
        let url = match self.resolve(src) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(src, error = %e, "cannot resolve image source");
                return LoadOutcome::Failed;
            }
        };

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%url, error = %e, "image request failed");
                return LoadOutcome::Failed;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(%url, status = %response.status(), "image request rejected");
            return LoadOutcome::Failed;
        }
        match response.bytes().await {
            Ok(body) if !body.is_empty() => LoadOutcome::Loaded,
            Ok(_) => {
                tracing::debug!(%url, "image body empty");
                LoadOutcome::Failed
            }
            Err(e) => {
                tracing::debug!(%url, error = %e, "image body truncated");
                LoadOutcome::Failed
            }
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> LoadOutcome {
        self.load(url).await
    }
}

/// An `<img>` from static markup. Nothing is decoded ahead of time, so every
/// one of them settles through a request.
#[derive(Debug, Clone)]
pub struct HttpInlineImage {
    source: String,
    fetcher: HttpImageFetcher,
}

impl HttpInlineImage {
    pub fn new(source: impl Into<String>, fetcher: HttpImageFetcher) -> Self {
        Self {
            source: source.into(),
            fetcher,
        }
    }
}

#[async_trait]
impl InlineImage for HttpInlineImage {
    fn source(&self) -> &str {
        &self.source
    }

    async fn readiness(&self) -> ImageReadiness {
        ImageReadiness::pending()
    }

    async fn settled(&self) -> LoadOutcome {
        self.fetcher.load(&self.source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: Option<&str>) -> HttpImageFetcher {
        HttpImageFetcher::new(Client::new(), base.map(|b| Url::parse(b).unwrap()))
    }

    #[test]
    fn resolves_relative_sources_against_base() {
        let fetcher = fetcher(Some("https://wedding.test/invite/index.html"));
        assert_eq!(
            fetcher.resolve("/images/hero.jpg").unwrap().as_str(),
            "https://wedding.test/images/hero.jpg"
        );
        assert_eq!(
            fetcher.resolve("qr/bride.jpg").unwrap().as_str(),
            "https://wedding.test/invite/qr/bride.jpg"
        );
    }

    #[test]
    fn absolute_sources_ignore_base() {
        let fetcher = fetcher(None);
        assert_eq!(
            fetcher.resolve("https://cdn.test/a.jpg").unwrap().as_str(),
            "https://cdn.test/a.jpg"
        );
    }

    #[test]
    fn relative_source_without_base_is_an_error() {
        assert!(fetcher(None).resolve("/images/hero.jpg").is_err());
        assert!(fetcher(Some("https://wedding.test/")).resolve("  ").is_err());
    }

    #[tokio::test]
    async fn unresolvable_source_settles_as_failed() {
        assert_eq!(fetcher(None).load("images/a.jpg").await, LoadOutcome::Failed);
    }
}
