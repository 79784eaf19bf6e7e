//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::DetectionStarted { target } => {
                info!(target_dir = %target.display(), "Starting build detection");
            }
            ProgressEvent::DetectorMatched {
                detector,
                candidates,
            } => {
                debug!(detector = %detector, candidates, "Detector matched");
            }
            ProgressEvent::DetectionComplete {
                files,
                candidates,
                elapsed,
            } => {
                info!(
                    files,
                    candidates,
                    elapsed_ms = elapsed.as_millis(),
                    "Detection complete"
                );
            }
            ProgressEvent::CandidateStarted {
                index,
                label,
                workdir,
            } => {
                info!(
                    index,
                    label = %label,
                    workdir = %workdir.display(),
                    "Building candidate"
                );
            }
            ProgressEvent::CandidateFinished {
                index,
                label,
                outcome,
                new_artifacts,
            } => {
                if outcome.is_success() {
                    info!(index, label = %label, new_artifacts, "Candidate built");
                } else {
                    warn!(
                        index,
                        label = %label,
                        outcome = %outcome,
                        new_artifacts,
                        "Candidate build failed"
                    );
                }
            }
            ProgressEvent::EvaluationComplete {
                candidates,
                succeeded,
            } => {
                info!(candidates, succeeded, "Evaluation complete");
            }
        }
    }
}
