//! Element doubles: images that settle on command, backgrounds and a loader
//! that record what was done to them.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use curtain_core::{
    BackgroundTarget, DocumentError, ImageReadiness, InlineImage, LoadOutcome, LoaderSurface,
};
use tokio::sync::watch;

/// An inline image whose load/error event is fired by the test, either
/// explicitly through [`ScriptedImage::fire`] or after a virtual-time delay.
#[derive(Debug)]
pub struct ScriptedImage {
    source: String,
    readiness: ImageReadiness,
    scheduled: Option<(Duration, LoadOutcome)>,
    outcome: watch::Sender<Option<LoadOutcome>>,
    waits: AtomicUsize,
    probe_latency: Duration,
}

impl ScriptedImage {
    fn build(
        source: &str,
        readiness: ImageReadiness,
        scheduled: Option<(Duration, LoadOutcome)>,
    ) -> Self {
        let (outcome, _) = watch::channel(None);
        Self {
            source: source.to_string(),
            readiness,
            scheduled,
            outcome,
            waits: AtomicUsize::new(0),
            probe_latency: Duration::ZERO,
        }
    }

    /// Makes every readiness check take `latency` of tokio time, like a
    /// round trip to a remote page.
    pub fn with_probe_latency(mut self, latency: Duration) -> Self {
        self.probe_latency = latency;
        self
    }

    /// Already decoded before the gate looks at it.
    pub fn complete(source: &str) -> Self {
        Self::build(source, ImageReadiness::decoded(480), None)
    }

    /// Complete but broken: no geometry, so the gate has to wait for its event.
    pub fn broken(source: &str) -> Self {
        Self::build(source, ImageReadiness::decoded(0), None)
    }

    /// Still loading; settles when [`ScriptedImage::fire`] is called.
    pub fn pending(source: &str) -> Self {
        Self::build(source, ImageReadiness::pending(), None)
    }

    /// Still loading; settles with `outcome` once `delay` of tokio time has passed.
    pub fn settles_after(source: &str, delay: Duration, outcome: LoadOutcome) -> Self {
        Self::build(source, ImageReadiness::pending(), Some((delay, outcome)))
    }

    pub fn fire(&self, outcome: LoadOutcome) {
        self.outcome.send_replace(Some(outcome));
    }

    /// How many times something subscribed to this image's load/error event.
    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InlineImage for ScriptedImage {
    fn source(&self) -> &str {
        &self.source
    }

    async fn readiness(&self) -> ImageReadiness {
        if !self.probe_latency.is_zero() {
            tokio::time::sleep(self.probe_latency).await;
        }
        self.readiness
    }

    async fn settled(&self) -> LoadOutcome {
        self.waits.fetch_add(1, Ordering::SeqCst);
        if let Some((delay, outcome)) = self.scheduled {
            tokio::time::sleep(delay).await;
            return outcome;
        }
        let mut rx = self.outcome.subscribe();
        match rx.wait_for(Option::is_some).await {
            Ok(outcome) => {
                let outcome = *outcome;
                outcome.unwrap_or(LoadOutcome::Failed)
            }
            Err(_) => LoadOutcome::Failed,
        }
    }
}

/// A `data-bg` element that remembers which backgrounds were applied.
#[derive(Debug)]
pub struct RecordingBackground {
    source: Option<String>,
    applied: Mutex<Vec<String>>,
    fail_apply: bool,
}

impl RecordingBackground {
    pub fn new(source: Option<&str>) -> Self {
        Self {
            source: source.map(str::to_string),
            applied: Mutex::new(Vec::new()),
            fail_apply: false,
        }
    }

    pub fn with_source(source: &str) -> Self {
        Self::new(Some(source))
    }

    pub fn without_source() -> Self {
        Self::new(None)
    }

    /// Style writes fail, as they would on an element removed mid-load.
    pub fn failing_apply(source: &str) -> Self {
        Self {
            fail_apply: true,
            ..Self::new(Some(source))
        }
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().unwrap().clone()
    }

    pub fn rendered_background(&self) -> Option<String> {
        self.applied().last().map(|url| format!("url({})", url))
    }
}

#[async_trait]
impl BackgroundTarget for RecordingBackground {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    async fn apply_background(&self, url: &str) -> Result<(), DocumentError> {
        if self.fail_apply {
            return Err(DocumentError::detached("[data-bg]"));
        }
        self.applied.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderEvent {
    Hidden,
    Detached,
}

/// A loader surface that records hide/detach calls.
#[derive(Debug)]
pub struct RecordingLoader {
    attached: AtomicBool,
    fail_detach: bool,
    events: Mutex<Vec<LoaderEvent>>,
}

impl RecordingLoader {
    pub fn attached() -> Self {
        Self {
            attached: AtomicBool::new(true),
            fail_detach: false,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_detach() -> Self {
        Self {
            fail_detach: true,
            ..Self::attached()
        }
    }

    /// Simulates some other script removing the loader first.
    pub fn remove_externally(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    pub fn is_present(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<LoaderEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoaderSurface for RecordingLoader {
    async fn mark_hidden(&self) -> Result<(), DocumentError> {
        self.events.lock().unwrap().push(LoaderEvent::Hidden);
        Ok(())
    }

    async fn is_attached(&self) -> bool {
        self.is_present()
    }

    async fn detach(&self) -> Result<(), DocumentError> {
        if self.fail_detach {
            return Err(DocumentError::browser_error("remove() threw"));
        }
        if !self.attached.swap(false, Ordering::SeqCst) {
            return Err(DocumentError::detached("#loader"));
        }
        self.events.lock().unwrap().push(LoaderEvent::Detached);
        Ok(())
    }
}
