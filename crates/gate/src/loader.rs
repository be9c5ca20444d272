use curtain_core::{LoaderOutcome, LoaderSurface};
use std::sync::Arc;

/// Sole owner of the loader surface. Both steps are idempotent and neither
/// propagates errors: a loader that refuses to go away must not block the page.
pub struct LoaderController {
    surface: Option<Arc<dyn LoaderSurface>>,
    hidden: bool,
    outcome: Option<LoaderOutcome>,
}

impl LoaderController {
    pub fn new(surface: Option<Arc<dyn LoaderSurface>>) -> Self {
        Self {
            surface,
            hidden: false,
            outcome: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns `true` only on the call that actually hid the surface.
    pub async fn hide(&mut self) -> bool {
        if self.hidden {
            tracing::debug!("loader already hidden, skipping");
            return false;
        }
        self.hidden = true;

        let Some(surface) = &self.surface else {
            return false;
        };
        if !surface.is_attached().await {
            tracing::debug!("loader no longer attached, nothing to hide");
            return false;
        }
        match surface.mark_hidden().await {
            Ok(()) => {
                tracing::info!("loader hidden");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to hide loader");
                false
            }
        }
    }

    /// Removes the surface if it is still attached. Later calls return the
    /// first call's outcome without touching the surface again.
    pub async fn detach(&mut self) -> LoaderOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        let outcome = match &self.surface {
            None => LoaderOutcome::Absent,
            Some(surface) if !surface.is_attached().await => LoaderOutcome::AlreadyDetached,
            Some(surface) => match surface.detach().await {
                Ok(()) => {
                    tracing::info!("loader removed from document");
                    LoaderOutcome::Detached
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to remove loader");
                    LoaderOutcome::DetachFailed
                }
            },
        };
        self.outcome = Some(outcome);
        self.surface = None;
        outcome
    }
}
