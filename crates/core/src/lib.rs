pub mod document;
pub mod error;
pub mod report;
pub mod timer;

pub use document::{
    BackgroundTarget, Document, ImageFetcher, ImageReadiness, InlineImage, LoaderSurface,
    PageSnapshot,
};
pub use error::{DocumentError, ErrorCategory};
pub use report::{GateProgress, GateReport, LoaderOutcome};
pub use timer::{DelayStep, Timer, TokioTimer};

use serde::{Deserialize, Serialize};

/// Kinds of visual resources the gate waits for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An `<img>` element
    InlineImage,
    /// An element carrying a deferred `data-bg` background image
    BackgroundImage,
}

/// Terminal load state of a tracked resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// Background element without a source, nothing to load
    Empty,
}

/// One visual asset under observation for the lifetime of a gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedResource {
    pub kind: ResourceKind,
    pub source: Option<String>,
    pub outcome: Option<LoadOutcome>,
}

impl TrackedResource {
    pub fn new(kind: ResourceKind, source: Option<String>) -> Self {
        Self {
            kind,
            source,
            outcome: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }
}
