use async_trait::async_trait;
use curtain_core::DocumentError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::startup::PageInitializer;

/// One named piece of page initialization (a timeline, a button binding).
#[async_trait]
pub trait InitStep: Send + Sync {
    async fn run(&self) -> Result<(), DocumentError>;
}

pub type StepFuture = Pin<Box<dyn Future<Output = Result<(), DocumentError>> + Send>>;

/// Adapts an async closure into an [`InitStep`].
pub struct FnStep<F>(pub F);

#[async_trait]
impl<F> InitStep for FnStep<F>
where
    F: Fn() -> StepFuture + Send + Sync,
{
    async fn run(&self) -> Result<(), DocumentError> {
        (self.0)().await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Done(String),
    Failed(String, DocumentError),
}

/// Ordered init steps. A failing step is logged and the rest still run, so
/// one broken timeline does not leave the page inert.
#[derive(Default)]
pub struct InitSequence {
    steps: Vec<(String, Box<dyn InitStep>)>,
    results: Mutex<Vec<StepResult>>,
}

impl InitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, name: impl Into<String>, step: impl InitStep + 'static) -> Self {
        self.steps.push((name.into(), Box::new(step)));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn results(&self) -> Vec<StepResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PageInitializer for InitSequence {
    async fn initialize(&self) {
        for (name, step) in &self.steps {
            let result = match step.run().await {
                Ok(()) => {
                    tracing::debug!(step = %name, "initialized");
                    StepResult::Done(name.clone())
                }
                Err(e) => {
                    tracing::warn!(step = %name, error = %e, "init step failed");
                    StepResult::Failed(name.clone(), e)
                }
            };
            self.results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(result);
        }
    }
}
