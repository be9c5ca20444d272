use async_trait::async_trait;
use curtain_core::{Document, DocumentError, GateReport, ImageFetcher, Timer};
use curtain_gate::{AssetPreloadGate, TransitionConfig};
use std::sync::Arc;

/// Whatever has to wait for the gate: timelines, button wiring, music.
#[async_trait]
pub trait PageInitializer: Send + Sync {
    async fn initialize(&self);
}

#[derive(Debug)]
pub enum StartupOutcome {
    /// The gate completed normally before initialization
    Preloaded(GateReport),
    /// The gate could not run; initialization ran anyway
    Fallback(DocumentError),
}

impl StartupOutcome {
    pub fn report(&self) -> Option<&GateReport> {
        match self {
            StartupOutcome::Preloaded(report) => Some(report),
            StartupOutcome::Fallback(_) => None,
        }
    }
}

/// Document-ready entry point: preload, then initialize the page exactly once.
pub struct Startup {
    fetcher: Arc<dyn ImageFetcher>,
    timer: Arc<dyn Timer>,
    config: TransitionConfig,
}

impl Startup {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, timer: Arc<dyn Timer>, config: TransitionConfig) -> Self {
        Self {
            fetcher,
            timer,
            config,
        }
    }

    pub async fn run(
        &self,
        document: &dyn Document,
        initializer: &dyn PageInitializer,
    ) -> StartupOutcome {
        tracing::info!("document ready, waiting for images");
        let outcome = match self.preload(document).await {
            Ok(report) => {
                tracing::info!(
                    loaded = report.loaded,
                    failed = report.failed,
                    "all images settled, initializing page"
                );
                StartupOutcome::Preloaded(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "image preloading failed, initializing page anyway");
                StartupOutcome::Fallback(e)
            }
        };

        initializer.initialize().await;
        tracing::info!("page initialized");
        outcome
    }

    async fn preload(&self, document: &dyn Document) -> Result<GateReport, DocumentError> {
        let gate = AssetPreloadGate::from_document(
            document,
            Arc::clone(&self.fetcher),
            Arc::clone(&self.timer),
            self.config,
        )
        .await?;
        gate.begin().completed().await
    }
}
