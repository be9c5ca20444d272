use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use curtain_core::{
    BackgroundTarget, ErrorCategory, InlineImage, LoadOutcome, LoaderSurface, PageSnapshot,
};
use curtain_gate::TransitionConfig;
use curtain_page::{PageInitializer, Startup, StartupOutcome};
use curtain_test_support::{
    FailingDocument, RecordingBackground, RecordingLoader, RecordingTimer, ScriptedFetcher,
    ScriptedImage, StubDocument,
};

/// Counts initializations and remembers whether the loader was already gone.
struct CountingInitializer {
    runs: AtomicUsize,
    loader: Option<Arc<RecordingLoader>>,
    loader_present_at_init: AtomicUsize,
}

impl CountingInitializer {
    fn new(loader: Option<Arc<RecordingLoader>>) -> Self {
        Self {
            runs: AtomicUsize::new(0),
            loader,
            loader_present_at_init: AtomicUsize::new(0),
        }
    }

    fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageInitializer for CountingInitializer {
    async fn initialize(&self) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.loader.as_ref().is_some_and(|l| l.is_present()) {
            self.loader_present_at_init.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn startup() -> Startup {
    Startup::new(
        Arc::new(
            ScriptedFetcher::new().respond("https://cdn.test/hero.jpg", LoadOutcome::Loaded),
        ),
        Arc::new(RecordingTimer::new()),
        TransitionConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn initializes_once_after_the_gate() {
    let loader = Arc::new(RecordingLoader::attached());
    let snapshot = PageSnapshot {
        images: vec![Arc::new(ScriptedImage::complete("/img/a.jpg")) as Arc<dyn InlineImage>],
        backgrounds: vec![
            Arc::new(RecordingBackground::with_source("https://cdn.test/hero.jpg"))
                as Arc<dyn BackgroundTarget>,
        ],
        loader: Some(loader.clone() as Arc<dyn LoaderSurface>),
    };
    let document = StubDocument::new(snapshot);
    let initializer = CountingInitializer::new(Some(loader.clone()));

    let outcome = startup().run(&document, &initializer).await;

    let report = outcome.report().expect("gate should have completed");
    assert_eq!(report.settled, 2);
    assert_eq!(initializer.runs(), 1);
    assert_eq!(initializer.loader_present_at_init.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn enumeration_failure_falls_back_to_initializing_once() {
    let initializer = CountingInitializer::new(None);

    let outcome = startup().run(&FailingDocument, &initializer).await;

    match outcome {
        StartupOutcome::Fallback(e) => assert_eq!(e.category, ErrorCategory::Enumeration),
        StartupOutcome::Preloaded(report) => panic!("unexpected report {:?}", report),
    }
    assert_eq!(initializer.runs(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_page_still_initializes() {
    let document = StubDocument::new(PageSnapshot::default());
    let initializer = CountingInitializer::new(None);

    let outcome = startup().run(&document, &initializer).await;

    assert_eq!(outcome.report().map(|r| r.expected), Some(0));
    assert_eq!(initializer.runs(), 1);
}
