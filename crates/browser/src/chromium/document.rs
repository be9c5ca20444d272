use async_trait::async_trait;
use chromiumoxide::page::Page;
use curtain_core::{
    BackgroundTarget, Document, DocumentError, ImageFetcher, ImageReadiness, InlineImage,
    LoadOutcome, LoaderSurface, PageSnapshot,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::script;
use crate::shared::js::preload;

#[derive(Debug, Deserialize)]
struct Enumeration {
    images: Vec<EnumeratedImage>,
    backgrounds: Vec<EnumeratedBackground>,
    loader: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnumeratedImage {
    id: String,
    src: String,
}

#[derive(Debug, Deserialize)]
struct EnumeratedBackground {
    id: String,
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Readiness {
    complete: bool,
    natural_height: u32,
}

/// A live page, enumerated by tagging elements in place.
#[derive(Clone)]
pub struct ChromiumDocument {
    page: Page,
}

impl ChromiumDocument {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl Document for ChromiumDocument {
    async fn snapshot(&self) -> Result<PageSnapshot, DocumentError> {
        let token = format!("c{}", uuid::Uuid::new_v4().simple());
        let value = script::call(&self.page, preload::ENUMERATE, &[json!(token)], "Enumerate")
            .await
            .map_err(|e| DocumentError::enumeration_error(e.message))?;
        let enumeration: Enumeration = serde_json::from_value(value)
            .map_err(|e| DocumentError::enumeration_error(format!("unexpected enumeration result: {}", e)))?;

        tracing::debug!(
            images = enumeration.images.len(),
            backgrounds = enumeration.backgrounds.len(),
            loader = enumeration.loader.is_some(),
            "page enumerated"
        );

        let images = enumeration
            .images
            .into_iter()
            .map(|image| {
                Arc::new(ChromiumImage {
                    page: self.page.clone(),
                    id: image.id,
                    source: image.src,
                }) as Arc<dyn InlineImage>
            })
            .collect();
        let backgrounds = enumeration
            .backgrounds
            .into_iter()
            .map(|target| {
                Arc::new(ChromiumBackground {
                    page: self.page.clone(),
                    id: target.id,
                    source: target.source,
                }) as Arc<dyn BackgroundTarget>
            })
            .collect();
        let loader = enumeration.loader.map(|id| {
            Arc::new(ChromiumLoader {
                page: self.page.clone(),
                id,
            }) as Arc<dyn LoaderSurface>
        });

        Ok(PageSnapshot {
            images,
            backgrounds,
            loader,
        })
    }
}

pub struct ChromiumImage {
    page: Page,
    id: String,
    source: String,
}

#[async_trait]
impl InlineImage for ChromiumImage {
    fn source(&self) -> &str {
        &self.source
    }

    async fn readiness(&self) -> ImageReadiness {
        let state = script::call(&self.page, preload::IMAGE_READINESS, &[json!(self.id)], "ImageReadiness")
            .await
            .and_then(|v| {
                serde_json::from_value::<Readiness>(v).map_err(|e| DocumentError::script_error(e.to_string()))
            });
        match state {
            Ok(r) => ImageReadiness {
                complete: r.complete,
                natural_height: r.natural_height,
            },
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "readiness probe failed, waiting on events");
                ImageReadiness::pending()
            }
        }
    }

    async fn settled(&self) -> LoadOutcome {
        match script::call(&self.page, preload::IMAGE_SETTLED, &[json!(self.id)], "ImageSettled").await {
            Ok(v) if v.as_str() == Some("loaded") => LoadOutcome::Loaded,
            Ok(_) => LoadOutcome::Failed,
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "image wait failed");
                LoadOutcome::Failed
            }
        }
    }
}

pub struct ChromiumBackground {
    page: Page,
    id: String,
    source: Option<String>,
}

#[async_trait]
impl BackgroundTarget for ChromiumBackground {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    async fn apply_background(&self, url: &str) -> Result<(), DocumentError> {
        script::perform(
            &self.page,
            preload::APPLY_BACKGROUND,
            &[json!(self.id), json!(url)],
            "ApplyBackground",
        )
        .await
    }
}

pub struct ChromiumLoader {
    page: Page,
    id: String,
}

#[async_trait]
impl LoaderSurface for ChromiumLoader {
    async fn mark_hidden(&self) -> Result<(), DocumentError> {
        script::perform(&self.page, preload::HIDE_LOADER, &[json!(self.id)], "HideLoader").await
    }

    async fn is_attached(&self) -> bool {
        script::call(&self.page, preload::LOADER_ATTACHED, &[json!(self.id)], "LoaderAttached")
            .await
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    async fn detach(&self) -> Result<(), DocumentError> {
        script::perform(&self.page, preload::DETACH_LOADER, &[json!(self.id)], "DetachLoader").await
    }
}

/// Warms images through a detached `Image` in the page, so the browser cache
/// is primed before the background is swapped in.
#[derive(Clone)]
pub struct ChromiumFetcher {
    page: Page,
}

impl ChromiumFetcher {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl ImageFetcher for ChromiumFetcher {
    async fn fetch(&self, url: &str) -> LoadOutcome {
        match script::call(&self.page, preload::FETCH_IMAGE, &[json!(url)], "FetchImage").await {
            Ok(v) if v.as_bool() == Some(true) => LoadOutcome::Loaded,
            Ok(_) => LoadOutcome::Failed,
            Err(e) => {
                tracing::warn!(url, error = %e, "image fetch failed");
                LoadOutcome::Failed
            }
        }
    }
}

/// The page's `#bgMusic` element.
#[derive(Clone)]
pub struct ChromiumAudio {
    page: Page,
}

impl ChromiumAudio {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub async fn play(&self) -> Result<(), DocumentError> {
        script::perform(&self.page, crate::shared::js::page::PLAY_AUDIO, &[], "PlayAudio").await
    }

    pub async fn pause(&self) -> Result<(), DocumentError> {
        script::perform(&self.page, crate::shared::js::page::PAUSE_AUDIO, &[], "PauseAudio").await
    }
}

/// The page's `#particles` container.
#[derive(Clone)]
pub struct ChromiumParticles {
    page: Page,
}

impl ChromiumParticles {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Appends one `div.particle` per inline style.
    pub async fn append_styles(&self, styles: &[String]) -> Result<(), DocumentError> {
        script::perform(
            &self.page,
            crate::shared::js::page::APPEND_PARTICLES,
            &[json!(styles)],
            "AppendParticles",
        )
        .await
    }
}
