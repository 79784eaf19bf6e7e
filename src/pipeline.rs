//! End-to-end driver: detect, materialize, evaluate
//!
//! ```no_run
//! use autobuild::{Autobuilder, AutobuildConfig, CompileExecutor};
//!
//! let config = AutobuildConfig::default();
//! let builder = Autobuilder::from_config(&config);
//! let report = builder
//!     .run(
//!         "/src/project".as_ref(),
//!         &config.build_base,
//!         CompileExecutor::new(config.compile_command.clone()),
//!         &config.script_path,
//!     )
//!     .expect("evaluation failed");
//! println!("{} of {} candidates built", report.succeeded(), report.len());
//! ```

use crate::artifacts::ArtifactSet;
use crate::config::AutobuildConfig;
use crate::error::Result;
use crate::evaluate::{BuildEvaluator, BuildExecutor, EvaluationReport};
use crate::fs::{list_files, FileSet};
use crate::heuristics::{
    BuildCandidate, DetectorRegistry, DetectorSettings, HeuristicLogger,
};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::script::{MaterializedScript, ScriptMaterializer};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub struct Autobuilder {
    registry: DetectorRegistry,
    progress: Arc<dyn ProgressHandler>,
}

impl Autobuilder {
    pub fn new(registry: DetectorRegistry) -> Self {
        Self {
            registry,
            progress: Arc::new(NoOpHandler),
        }
    }

    /// Default detectors tuned by `config`, with the heuristic log if configured
    pub fn from_config(config: &AutobuildConfig) -> Self {
        let registry = DetectorRegistry::with_defaults(config.detector_settings())
            .with_logger(HeuristicLogger::new(config.heuristic_log.clone()));
        Self::new(registry)
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// Ordered build candidates for `target`
    pub fn detect(&self, target: &Path) -> Result<Vec<BuildCandidate>> {
        let started = Instant::now();
        self.progress.on_progress(&ProgressEvent::DetectionStarted {
            target: target.to_path_buf(),
        });

        let files = list_files(target)?;
        let candidates = self.registry.detect_files(&files)?;
        self.report_matches(&files, &candidates, started);

        Ok(candidates)
    }

    fn report_matches(&self, files: &FileSet, candidates: &[BuildCandidate], started: Instant) {
        let mut i = 0;
        while i < candidates.len() {
            let detector = candidates[i].detector();
            let run = candidates[i..]
                .iter()
                .take_while(|c| c.detector() == detector)
                .count();
            self.progress.on_progress(&ProgressEvent::DetectorMatched {
                detector,
                candidates: run,
            });
            i += run;
        }

        self.progress.on_progress(&ProgressEvent::DetectionComplete {
            files: files.len(),
            candidates: candidates.len(),
            elapsed: started.elapsed(),
        });
    }

    /// Detects and materializes one script per candidate. Working
    /// directories must lie outside `target`.
    pub fn suggest(&self, target: &Path, base_dir: &Path) -> Result<Vec<MaterializedScript>> {
        let candidates = self.detect(target)?;
        let materializer = ScriptMaterializer::new(target, base_dir);
        materializer.ensure_outside_target()?;
        Ok(materializer.materialize(&candidates))
    }

    /// Suggests, then evaluates every script against a baseline taken from
    /// the untouched target
    pub fn run<E: BuildExecutor>(
        &self,
        target: &Path,
        base_dir: &Path,
        executor: E,
        script_path: &Path,
    ) -> Result<EvaluationReport> {
        let scripts = self.suggest(target, base_dir)?;
        let baseline = ArtifactSet::scan(target)?;

        BuildEvaluator::new(executor, script_path)
            .with_progress(self.progress.clone())
            .evaluate(&scripts, &baseline)
    }
}

impl Default for Autobuilder {
    fn default() -> Self {
        Self::new(DetectorRegistry::with_defaults(DetectorSettings::default()))
    }
}
