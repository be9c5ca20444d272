//! Shared test doubles for the curtain document traits.

mod document;
mod elements;
mod fetcher;
mod timer;

pub use document::{FailingDocument, StubDocument};
pub use elements::{LoaderEvent, RecordingBackground, RecordingLoader, ScriptedImage};
pub use fetcher::ScriptedFetcher;
pub use timer::RecordingTimer;
