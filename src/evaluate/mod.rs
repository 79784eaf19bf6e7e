//! Running materialized scripts and attributing artifacts to them
//!
//! The evaluator owns the well-known script path: for each candidate it writes
//! the script there, hands control to a [`BuildExecutor`], then scans the
//! candidate's working directory and diffs it against a baseline taken from
//! the untouched target.

mod executor;
mod report;

pub use executor::{BuildExecutor, BuildOutcome, CompileExecutor};
pub use report::{CandidateReport, EvaluationReport};

use crate::artifacts::ArtifactSet;
use crate::error::{AutobuildError, Result};
use crate::fs::list_files_lossy;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::script::MaterializedScript;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub struct BuildEvaluator<E: BuildExecutor> {
    executor: E,
    script_path: PathBuf,
    progress: Arc<dyn ProgressHandler>,
}

impl<E: BuildExecutor> BuildEvaluator<E> {
    pub fn new(executor: E, script_path: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            script_path: script_path.into(),
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Evaluates scripts one after another. A failed build or an unreadable
    /// working directory is recorded and the loop moves on; only failing to
    /// write the script aborts.
    pub fn evaluate(
        &self,
        scripts: &[MaterializedScript],
        baseline: &ArtifactSet,
    ) -> Result<EvaluationReport> {
        let mut report = EvaluationReport::new(baseline.clone());

        for script in scripts {
            self.progress.on_progress(&ProgressEvent::CandidateStarted {
                index: script.index,
                label: script.label().to_string(),
                workdir: script.workdir.clone(),
            });

            self.write_script(&script.script)?;
            let outcome = self.executor.execute(&self.script_path, script);
            if !outcome.is_success() {
                warn!(label = script.label(), outcome = %outcome, "Build candidate failed");
            }

            let mut entry = CandidateReport::new(script, outcome);
            let (artifacts, scan_errors) = Self::scan_workdir(&script.workdir);
            for err in &scan_errors {
                warn!(label = script.label(), error = %err, "Skipped unreadable build output");
            }
            entry.new_artifacts = artifacts.new_since(baseline);
            entry.artifacts = artifacts;
            entry.scan_errors = scan_errors;
            info!(
                label = script.label(),
                outcome = %entry.outcome,
                new_artifacts = entry.new_artifacts.len(),
                "Evaluated build candidate"
            );

            self.progress.on_progress(&ProgressEvent::CandidateFinished {
                index: script.index,
                label: script.label().to_string(),
                outcome: entry.outcome.clone(),
                new_artifacts: entry.new_artifacts.len(),
            });

            report.insert(script.workdir.clone(), entry);
        }

        self.progress.on_progress(&ProgressEvent::EvaluationComplete {
            candidates: report.len(),
            succeeded: report.succeeded(),
        });

        Ok(report)
    }

    fn write_script(&self, script: &str) -> Result<()> {
        let to_err = |source| AutobuildError::ScriptWrite {
            path: self.script_path.clone(),
            source,
        };

        fs::write(&self.script_path, script).map_err(to_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.script_path, fs::Permissions::from_mode(0o755))
                .map_err(to_err)?;
        }

        Ok(())
    }

    /// Artifacts left in `workdir`, plus a message for every entry that
    /// could not be walked. A working directory the script never created
    /// holds no artifacts.
    fn scan_workdir(workdir: &Path) -> (ArtifactSet, Vec<String>) {
        if !workdir.is_dir() {
            return (ArtifactSet::new(), Vec::new());
        }
        match list_files_lossy(workdir) {
            Ok((files, skipped)) => (
                ArtifactSet::from_files(&files),
                skipped.iter().map(ToString::to_string).collect(),
            ),
            Err(e) => (ArtifactSet::new(), vec![e.to_string()]),
        }
    }
}
