use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happened to the loader surface during the completion path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoaderOutcome {
    /// No loader surface in the document
    Absent,
    Detached,
    /// Someone else removed it before the gate got there
    AlreadyDetached,
    DetachFailed,
}

/// Live counters published while the gate runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GateProgress {
    pub settled: usize,
    pub expected: usize,
    pub resolved: bool,
}

/// Summary delivered with the completion signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateReport {
    pub expected: usize,
    pub settled: usize,
    pub loaded: usize,
    pub failed: usize,
    pub empty: usize,
    pub backgrounds_applied: usize,
    pub loader: LoaderOutcome,
    pub elapsed: Duration,
}
