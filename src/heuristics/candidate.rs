use super::{BuildStep, DetectorId};
use serde::{Deserialize, Serialize};

/// One strategy for building a target: an ordered list of steps plus the
/// label that identifies it in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCandidate {
    detector: DetectorId,
    label: String,
    steps: Vec<BuildStep>,
}

impl BuildCandidate {
    /// Creates a candidate labelled `<detector name>-<variant>`
    pub fn new(detector: DetectorId, variant: &str, steps: Vec<BuildStep>) -> Self {
        Self {
            detector,
            label: format!("{}-{}", detector.name(), variant),
            steps,
        }
    }

    pub fn detector(&self) -> DetectorId {
        self.detector
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Steps rendered as bash, in order
    pub fn commands(&self) -> Vec<String> {
        self.steps.iter().map(BuildStep::render).collect()
    }
}
