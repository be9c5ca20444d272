use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use curtain_core::{ImageFetcher, LoadOutcome};

/// An image fetcher with canned per-URL outcomes. Unknown URLs fail, the way
/// a 404 would.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, (LoadOutcome, Duration)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, outcome: LoadOutcome) -> Self {
        self.responses
            .insert(url.to_string(), (outcome, Duration::ZERO));
        self
    }

    /// Answers after `delay` of tokio time.
    pub fn respond_after(mut self, url: &str, delay: Duration, outcome: LoadOutcome) -> Self {
        self.responses.insert(url.to_string(), (outcome, delay));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> LoadOutcome {
        self.calls.lock().unwrap().push(url.to_string());
        let Some(&(outcome, delay)) = self.responses.get(url) else {
            return LoadOutcome::Failed;
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}
