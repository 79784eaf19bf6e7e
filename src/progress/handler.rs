//! Progress handler trait and events

use crate::evaluate::BuildOutcome;
use crate::heuristics::DetectorId;
use std::path::PathBuf;
use std::time::Duration;

/// Milestones of a detection and evaluation run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    DetectionStarted { target: PathBuf },

    DetectorMatched {
        detector: DetectorId,
        candidates: usize,
    },

    DetectionComplete {
        files: usize,
        candidates: usize,
        elapsed: Duration,
    },

    /// A script is about to be handed to the executor
    CandidateStarted {
        index: usize,
        label: String,
        workdir: PathBuf,
    },

    CandidateFinished {
        index: usize,
        label: String,
        outcome: BuildOutcome,
        new_artifacts: usize,
    },

    EvaluationComplete { candidates: usize, succeeded: usize },
}

pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// Ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
