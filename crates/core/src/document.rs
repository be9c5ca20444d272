//! Seams between the gate and whatever hosts the document.
//!
//! A static markup parser, a live browser page and the test doubles all
//! implement these traits; the gate only ever sees trait objects.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{DocumentError, LoadOutcome, ResourceKind, TrackedResource};

/// Load state of an inline image at the moment it is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageReadiness {
    pub complete: bool,
    pub natural_height: u32,
}

impl ImageReadiness {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn decoded(natural_height: u32) -> Self {
        Self {
            complete: true,
            natural_height,
        }
    }

    /// Already finished loading with usable geometry, nothing to wait for.
    pub fn is_decoded(&self) -> bool {
        self.complete && self.natural_height != 0
    }
}

#[async_trait]
pub trait InlineImage: Send + Sync {
    fn source(&self) -> &str;

    async fn readiness(&self) -> ImageReadiness;

    /// Resolves on the image's load or error event.
    async fn settled(&self) -> LoadOutcome;
}

#[async_trait]
pub trait BackgroundTarget: Send + Sync {
    /// Value of the element's `data-bg` attribute, captured at snapshot time.
    fn source(&self) -> Option<&str>;

    async fn apply_background(&self, url: &str) -> Result<(), DocumentError>;
}

#[async_trait]
pub trait LoaderSurface: Send + Sync {
    /// Marks the loader inactive so its exit transition can run.
    async fn mark_hidden(&self) -> Result<(), DocumentError>;

    async fn is_attached(&self) -> bool;

    async fn detach(&self) -> Result<(), DocumentError>;
}

/// Out-of-band image fetch used to warm background images.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> LoadOutcome;
}

/// Everything the gate tracks, enumerated once.
#[derive(Clone, Default)]
pub struct PageSnapshot {
    pub images: Vec<Arc<dyn InlineImage>>,
    pub backgrounds: Vec<Arc<dyn BackgroundTarget>>,
    pub loader: Option<Arc<dyn LoaderSurface>>,
}

impl PageSnapshot {
    pub fn expected(&self) -> usize {
        self.images.len() + self.backgrounds.len()
    }

    /// Inline images first, then backgrounds; settlement indices follow this order.
    pub fn tracked_resources(&self) -> Vec<TrackedResource> {
        let images = self.images.iter().map(|image| {
            TrackedResource::new(ResourceKind::InlineImage, Some(image.source().to_string()))
        });
        let backgrounds = self.backgrounds.iter().map(|target| {
            TrackedResource::new(
                ResourceKind::BackgroundImage,
                target.source().map(str::to_string),
            )
        });
        images.chain(backgrounds).collect()
    }
}

impl std::fmt::Debug for PageSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSnapshot")
            .field("images", &self.images.len())
            .field("backgrounds", &self.backgrounds.len())
            .field("loader", &self.loader.is_some())
            .finish()
    }
}

#[async_trait]
pub trait Document: Send + Sync {
    async fn snapshot(&self) -> Result<PageSnapshot, DocumentError>;
}
