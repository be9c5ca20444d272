use curtain_core::{
    BackgroundTarget, DelayStep, Document, DocumentError, GateProgress, GateReport, ImageFetcher,
    LoadOutcome, PageSnapshot, Timer,
};
use futures::future::{BoxFuture, join_all};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

use crate::config::TransitionConfig;
use crate::loader::LoaderController;
use crate::state::{GateState, Transition};

/// One terminal load event, tagged with the resource's snapshot index.
struct Settlement {
    index: usize,
    outcome: LoadOutcome,
    background_applied: bool,
}

/// Waits for every image and deferred background in a snapshot to load or
/// fail, then hides the loader and releases the page exactly once.
pub struct AssetPreloadGate {
    snapshot: PageSnapshot,
    fetcher: Arc<dyn ImageFetcher>,
    timer: Arc<dyn Timer>,
    config: TransitionConfig,
    progress: watch::Sender<GateProgress>,
}

impl AssetPreloadGate {
    pub fn new(
        snapshot: PageSnapshot,
        fetcher: Arc<dyn ImageFetcher>,
        timer: Arc<dyn Timer>,
        config: TransitionConfig,
    ) -> Self {
        let (progress, _) = watch::channel(GateProgress {
            settled: 0,
            expected: snapshot.expected(),
            resolved: false,
        });
        Self {
            snapshot,
            fetcher,
            timer,
            config,
            progress,
        }
    }

    /// Takes the snapshot now. Elements added to the document afterwards are
    /// not tracked by this gate.
    pub async fn from_document(
        document: &dyn Document,
        fetcher: Arc<dyn ImageFetcher>,
        timer: Arc<dyn Timer>,
        config: TransitionConfig,
    ) -> Result<Self, DocumentError> {
        let snapshot = document.snapshot().await?;
        tracing::debug!(?snapshot, "document enumerated");
        Ok(Self::new(snapshot, fetcher, timer, config))
    }

    pub fn expected(&self) -> usize {
        self.snapshot.expected()
    }

    pub fn progress(&self) -> watch::Receiver<GateProgress> {
        self.progress.subscribe()
    }

    /// Drives the gate on a spawned task and hands back its completion signal.
    pub fn begin(self) -> GateHandle {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let report = self.run().await;
            if tx.send(report).is_err() {
                tracing::debug!("gate completed with nobody waiting");
            }
        });
        GateHandle { receiver: rx }
    }

    /// Drives the gate on the current task. There is no timeout: a resource
    /// that never fires load or error keeps this pending.
    pub async fn run(self) -> GateReport {
        let started = Instant::now();
        let AssetPreloadGate {
            snapshot,
            fetcher,
            timer,
            config,
            progress,
        } = self;

        let mut state = GateState::new(snapshot.tracked_resources());
        let mut loader = LoaderController::new(snapshot.loader.clone());
        let mut pending: FuturesUnordered<BoxFuture<'static, Settlement>> = FuturesUnordered::new();
        let mut backgrounds_applied = 0;

        tracing::info!(expected = state.expected(), "starting to load images");
        let mut ready = state.evaluate() == Transition::Ready;

        let readiness = join_all(snapshot.images.iter().map(|image| image.readiness())).await;
        for (index, (image, readiness)) in snapshot.images.iter().zip(readiness).enumerate() {
            if readiness.is_decoded() {
                ready |= state.record(index, LoadOutcome::Loaded) == Transition::Ready;
                continue;
            }
            let image = Arc::clone(image);
            pending.push(Box::pin(async move {
                Settlement {
                    index,
                    outcome: image.settled().await,
                    background_applied: false,
                }
            }));
        }

        let offset = snapshot.images.len();
        for (i, target) in snapshot.backgrounds.iter().enumerate() {
            let index = offset + i;
            // Only a missing or empty attribute skips the fetch; whitespace is
            // fetched like any other value and fails there.
            let Some(url) = target.source().filter(|s| !s.is_empty()).map(str::to_string) else {
                ready |= state.record(index, LoadOutcome::Empty) == Transition::Ready;
                continue;
            };
            let target = Arc::clone(target);
            let fetcher = Arc::clone(&fetcher);
            pending.push(Box::pin(warm_background(index, url, target, fetcher)));
        }
        progress.send_replace(state.progress());

        while !ready {
            let Some(settlement) = pending.next().await else {
                tracing::error!(
                    settled = state.settled(),
                    expected = state.expected(),
                    "no settlements left to wait for, completing anyway"
                );
                break;
            };
            if settlement.background_applied {
                backgrounds_applied += 1;
            }
            ready = state.record(settlement.index, settlement.outcome) == Transition::Ready;
            tracing::info!("images loaded: {}/{}", state.settled(), state.expected());
            progress.send_replace(state.progress());
        }

        tracing::info!("all images settled, hiding loader");
        timer
            .delay(DelayStep::PostSettlement, config.post_settlement)
            .await;
        loader.hide().await;
        timer.delay(DelayStep::PostHide, config.post_hide).await;
        let loader_outcome = loader.detach().await;

        if !state.resolve() {
            tracing::warn!("gate already resolved");
        }
        progress.send_replace(state.progress());

        GateReport {
            expected: state.expected(),
            settled: state.settled(),
            loaded: state.count(LoadOutcome::Loaded),
            failed: state.count(LoadOutcome::Failed),
            empty: state.count(LoadOutcome::Empty),
            backgrounds_applied,
            loader: loader_outcome,
            elapsed: started.elapsed(),
        }
    }
}

async fn warm_background(
    index: usize,
    url: String,
    target: Arc<dyn BackgroundTarget>,
    fetcher: Arc<dyn ImageFetcher>,
) -> Settlement {
    let failed = Settlement {
        index,
        outcome: LoadOutcome::Failed,
        background_applied: false,
    };

    if fetcher.fetch(&url).await != LoadOutcome::Loaded {
        tracing::debug!(%url, "background image failed to load");
        return failed;
    }
    match target.apply_background(&url).await {
        Ok(()) => Settlement {
            index,
            outcome: LoadOutcome::Loaded,
            background_applied: true,
        },
        Err(e) => {
            tracing::warn!(%url, error = %e, "could not apply background image");
            failed
        }
    }
}

/// Single-shot completion signal of a spawned gate.
#[derive(Debug)]
pub struct GateHandle {
    receiver: oneshot::Receiver<GateReport>,
}

impl GateHandle {
    /// Fails only if the gate task died before finishing (panic or runtime shutdown).
    pub async fn completed(self) -> Result<GateReport, DocumentError> {
        self.receiver
            .await
            .map_err(|_| DocumentError::abandoned("gate task ended before completing"))
    }
}
