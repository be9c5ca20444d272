use curtain_core::{GateProgress, LoadOutcome, TrackedResource};

/// Result of recording one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// More settlements outstanding
    Pending,
    /// This settlement completed the set; the completion path may start
    Ready,
    /// Unknown index, resource already settled, or completion already started
    Ignored,
}

/// Settlement bookkeeping for one gate instance.
#[derive(Debug)]
pub struct GateState {
    resources: Vec<TrackedResource>,
    settled: usize,
    completing: bool,
    resolved: bool,
}

impl GateState {
    pub fn new(resources: Vec<TrackedResource>) -> Self {
        Self {
            resources,
            settled: 0,
            completing: false,
            resolved: false,
        }
    }

    pub fn expected(&self) -> usize {
        self.resources.len()
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    pub fn progress(&self) -> GateProgress {
        GateProgress {
            settled: self.settled,
            expected: self.expected(),
            resolved: self.resolved,
        }
    }

    pub fn record(&mut self, index: usize, outcome: LoadOutcome) -> Transition {
        let Some(resource) = self.resources.get_mut(index) else {
            tracing::warn!(index, "settlement for unknown resource");
            return Transition::Ignored;
        };
        if resource.is_settled() {
            tracing::warn!(index, source = ?resource.source, "resource settled twice, ignoring");
            return Transition::Ignored;
        }

        resource.outcome = Some(outcome);
        let kind = resource.kind;
        self.settled += 1;
        tracing::debug!(
            index,
            ?kind,
            ?outcome,
            settled = self.settled,
            expected = self.expected(),
            "resource settled"
        );
        self.evaluate()
    }

    /// Checks whether every resource has settled. With nothing to track this
    /// is `Ready` straight away, so an empty document takes the same path.
    pub fn evaluate(&mut self) -> Transition {
        if self.completing {
            return Transition::Ignored;
        }
        if self.settled < self.expected() {
            return Transition::Pending;
        }
        self.completing = true;
        Transition::Ready
    }

    /// Flags the completion signal as fired. Returns `false` if it already was.
    pub fn resolve(&mut self) -> bool {
        if self.resolved {
            return false;
        }
        self.resolved = true;
        true
    }

    pub fn count(&self, outcome: LoadOutcome) -> usize {
        self.resources
            .iter()
            .filter(|r| r.outcome == Some(outcome))
            .count()
    }
}
