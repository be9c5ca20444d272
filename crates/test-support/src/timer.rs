use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use curtain_core::{DelayStep, Timer};

/// Sleeps on tokio time like the production timer and records every step,
/// so paused-clock tests can assert both order and elapsed time.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    steps: Mutex<Vec<(DelayStep, Duration)>>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> Vec<DelayStep> {
        self.steps.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }

    pub fn total(&self) -> Duration {
        self.steps.lock().unwrap().iter().map(|(_, d)| *d).sum()
    }
}

#[async_trait]
impl Timer for RecordingTimer {
    async fn delay(&self, step: DelayStep, duration: Duration) {
        self.steps.lock().unwrap().push((step, duration));
        tokio::time::sleep(duration).await;
    }
}
