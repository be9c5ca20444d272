//! Live-browser host for the preload gate, driven over the Chrome DevTools
//! protocol.

pub mod chromium;
pub mod shared;

pub use chromium::{
    BrowserSession, ChromiumAudio, ChromiumBackground, ChromiumDocument, ChromiumFetcher,
    ChromiumImage, ChromiumLoader, ChromiumParticles, WaitStrategy,
};
pub use shared::{BrowserConfig, to_document_error};
