use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use curtain_core::{
    BackgroundTarget, Document, DocumentError, InlineImage, LoaderSurface, PageSnapshot,
};

use crate::http::{HttpImageFetcher, HttpInlineImage};
use crate::markup::PageMarkup;

/// A `[data-bg]` element held in memory; records its rendered background.
#[derive(Debug, Default)]
pub struct MemoryBackground {
    source: Option<String>,
    style: Mutex<Option<String>>,
}

impl MemoryBackground {
    pub fn new(source: Option<String>) -> Self {
        Self {
            source,
            style: Mutex::new(None),
        }
    }

    /// The element's `background-image` value, once applied.
    pub fn background_image(&self) -> Option<String> {
        self.style
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl BackgroundTarget for MemoryBackground {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    async fn apply_background(&self, url: &str) -> Result<(), DocumentError> {
        *self.style.lock().unwrap_or_else(PoisonError::into_inner) = Some(format!("url({})", url));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemoryLoader {
    hidden: AtomicBool,
    attached: AtomicBool,
}

impl Default for MemoryLoader {
    fn default() -> Self {
        Self {
            hidden: AtomicBool::new(false),
            attached: AtomicBool::new(true),
        }
    }
}

impl MemoryLoader {
    pub fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }

    pub fn is_present(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoaderSurface for MemoryLoader {
    async fn mark_hidden(&self) -> Result<(), DocumentError> {
        self.hidden.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_attached(&self) -> bool {
        self.is_present()
    }

    async fn detach(&self) -> Result<(), DocumentError> {
        if self.attached.swap(false, Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DocumentError::detached("#loader"))
        }
    }
}

/// Document built from static HTML. Images are fetched over HTTP; background
/// and loader mutations land on in-memory elements you can inspect afterwards.
#[derive(Debug)]
pub struct StaticDocument {
    markup: PageMarkup,
    fetcher: HttpImageFetcher,
    backgrounds: Vec<Arc<MemoryBackground>>,
    loader: Option<Arc<MemoryLoader>>,
}

impl StaticDocument {
    pub fn new(markup: PageMarkup, fetcher: HttpImageFetcher) -> Self {
        let backgrounds = markup
            .backgrounds
            .iter()
            .map(|source| Arc::new(MemoryBackground::new(source.clone())))
            .collect();
        let loader = markup.has_loader.then(|| Arc::new(MemoryLoader::default()));
        Self {
            markup,
            fetcher,
            backgrounds,
            loader,
        }
    }

    pub fn parse(html: &str, fetcher: HttpImageFetcher) -> Result<Self, DocumentError> {
        Ok(Self::new(PageMarkup::parse(html)?, fetcher))
    }

    pub fn markup(&self) -> &PageMarkup {
        &self.markup
    }

    pub fn fetcher(&self) -> &HttpImageFetcher {
        &self.fetcher
    }

    pub fn backgrounds(&self) -> &[Arc<MemoryBackground>] {
        &self.backgrounds
    }

    pub fn loader(&self) -> Option<&Arc<MemoryLoader>> {
        self.loader.as_ref()
    }
}

#[async_trait]
impl Document for StaticDocument {
    async fn snapshot(&self) -> Result<PageSnapshot, DocumentError> {
        let images = self
            .markup
            .images
            .iter()
            .map(|src| {
                Arc::new(HttpInlineImage::new(src.clone(), self.fetcher.clone()))
                    as Arc<dyn InlineImage>
            })
            .collect();
        let backgrounds = self
            .backgrounds
            .iter()
            .map(|b| Arc::clone(b) as Arc<dyn BackgroundTarget>)
            .collect();
        let loader = self
            .loader
            .as_ref()
            .map(|l| Arc::clone(l) as Arc<dyn LoaderSurface>);

        Ok(PageSnapshot {
            images,
            backgrounds,
            loader,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[tokio::test]
    async fn snapshot_mirrors_markup() {
        let html = r#"<div id="loader"></div><img src="a.jpg"><div data-bg="b.jpg"></div><div data-bg=""></div>"#;
        let document = StaticDocument::parse(html, HttpImageFetcher::new(Client::new(), None)).unwrap();

        let snapshot = document.snapshot().await.unwrap();
        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[0].source(), "a.jpg");
        assert_eq!(snapshot.backgrounds.len(), 2);
        assert_eq!(snapshot.backgrounds[1].source(), Some(""));
        assert!(snapshot.loader.is_some());
    }

    #[tokio::test]
    async fn memory_loader_detaches_once() {
        let loader = MemoryLoader::default();
        loader.mark_hidden().await.unwrap();
        assert!(loader.is_hidden());
        assert!(loader.detach().await.is_ok());
        assert!(loader.detach().await.is_err());
        assert!(!loader.is_attached().await);
    }

    #[tokio::test]
    async fn applied_background_is_rendered_as_url() {
        let background = MemoryBackground::new(Some("/images/hero.jpg".to_string()));
        background.apply_background("/images/hero.jpg").await.unwrap();
        assert_eq!(
            background.background_image().as_deref(),
            Some("url(/images/hero.jpg)")
        );
    }
}
