use chromiumoxide::page::Page;
use curtain_core::DocumentError;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use super::script;
use crate::shared::errors::is_context_lost;
use crate::shared::{BrowserConfig, js};

const CONTEXT_RETRY: Duration = Duration::from_millis(250);

pub struct WaitStrategy {
    config: BrowserConfig,
}

impl WaitStrategy {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Polls until the document has been parsed, the point at which the
    /// preload gate is allowed to enumerate. Gives up after `dom_ready`, also
    /// when the page keeps navigating away.
    pub async fn wait_for_dom_ready(&self, page: &Page) -> Result<(), DocumentError> {
        let start = Instant::now();
        let mut last_state = String::from("unknown");

        loop {
            let state = match script::call(page, js::page::CHECK_READY, &[], "CheckReady").await {
                Ok(state) => state,
                Err(e) if is_context_lost(&e) => {
                    // Navigation in flight, retry once the new context exists
                    check_deadline(start.elapsed(), self.config.dom_ready, "navigating")?;
                    sleep(CONTEXT_RETRY).await;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let ready_state = state.get("readyState").and_then(|v| v.as_str()).unwrap_or("unknown");
            if ready_state != last_state {
                tracing::debug!(ready_state, "document state");
                last_state = ready_state.to_string();
            }
            if state.get("ready").and_then(|v| v.as_bool()).unwrap_or(false) {
                return Ok(());
            }

            check_deadline(start.elapsed(), self.config.dom_ready, &last_state)?;
            sleep(self.config.check_interval).await;
        }
    }
}

fn check_deadline(elapsed: Duration, limit: Duration, state: &str) -> Result<(), DocumentError> {
    if elapsed <= limit {
        return Ok(());
    }
    Err(DocumentError::timeout_error("Timeout waiting for DOM ready").with_context(json!({
        "ready_state": state,
        "timeout_ms": limit.as_millis() as u64,
    })))
}
