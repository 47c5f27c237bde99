//! Per-job dispatch state machine.

/// Whether a job worker is waiting or running its job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
    #[default]
    Idle,
    Dispatching,
}

/// State machine for one job worker.
#[derive(Debug, Clone)]
pub struct DispatchStateMachine {
    state: DispatchState,
    runs: usize,
    failures: usize,
}

impl Default for DispatchStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: DispatchState::Idle,
            runs: 0,
            failures: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn transition(&mut self, new_state: DispatchState) {
        tracing::debug!(from = ?self.state, to = ?new_state, "Dispatch state transition");
        self.state = new_state;
    }

    /// Record a finished run.
    pub fn record_run(&mut self, success: bool) {
        self.runs = self.runs.saturating_add(1);
        if !success {
            self.failures = self.failures.saturating_add(1);
        }
    }

    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            runs: self.runs,
            failures: self.failures,
        }
    }
}

/// Run counts of one job worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub runs: usize,
    pub failures: usize,
}
