use super::BuildOutcome;
use crate::artifacts::ArtifactSet;
use crate::heuristics::BuildCandidate;
use crate::script::MaterializedScript;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What one candidate's build left behind in its working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    pub index: usize,
    pub label: String,
    pub script: String,
    /// Detector and steps the script was rendered from
    pub candidate: BuildCandidate,
    pub outcome: BuildOutcome,
    /// Every artifact present in the working directory after the build
    pub artifacts: ArtifactSet,
    /// Artifacts absent from the untouched target tree
    pub new_artifacts: ArtifactSet,
    /// Entries of the working directory that could not be scanned; the
    /// artifact sets above cover the rest
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scan_errors: Vec<String>,
}

impl CandidateReport {
    pub fn new(script: &MaterializedScript, outcome: BuildOutcome) -> Self {
        Self {
            index: script.index,
            label: script.label().to_string(),
            script: script.script.clone(),
            candidate: script.candidate.clone(),
            outcome,
            artifacts: ArtifactSet::new(),
            new_artifacts: ArtifactSet::new(),
            scan_errors: Vec::new(),
        }
    }

    pub fn produced_artifacts(&self) -> bool {
        !self.new_artifacts.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub generated_at: DateTime<Utc>,
    pub baseline: ArtifactSet,
    /// Keyed by candidate working directory
    pub candidates: BTreeMap<PathBuf, CandidateReport>,
}

impl EvaluationReport {
    pub fn new(baseline: ArtifactSet) -> Self {
        Self {
            generated_at: Utc::now(),
            baseline,
            candidates: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, workdir: PathBuf, report: CandidateReport) {
        self.candidates.insert(workdir, report);
    }

    pub fn get(&self, workdir: &Path) -> Option<&CandidateReport> {
        self.candidates.get(workdir)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.candidates
            .values()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    /// Candidates in materialization order
    pub fn in_order(&self) -> Vec<(&PathBuf, &CandidateReport)> {
        let mut reports: Vec<_> = self.candidates.iter().collect();
        reports.sort_by_key(|(_, r)| r.index);
        reports
    }
}
