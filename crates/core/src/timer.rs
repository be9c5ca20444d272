use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named fixed-duration pauses, so tests can tell them apart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DelayStep {
    /// Between the last settlement and hiding the loader
    PostSettlement,
    /// Between hiding the loader and detaching it
    PostHide,
    /// Before a download button returns to its idle label
    ButtonReset,
}

#[async_trait]
pub trait Timer: Send + Sync {
    async fn delay(&self, step: DelayStep, duration: Duration);
}

/// Timer backed by `tokio::time`, which honours a paused test clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn delay(&self, step: DelayStep, duration: Duration) {
        tracing::trace!(?step, ?duration, "delay");
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_advances_virtual_clock() {
        let start = tokio::time::Instant::now();
        TokioTimer
            .delay(DelayStep::PostSettlement, Duration::from_millis(500))
            .await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
