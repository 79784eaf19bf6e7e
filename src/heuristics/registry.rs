use super::detector::*;
use super::{BuildCandidate, HeuristicLogger};
use crate::error::Result;
use crate::fs::{list_files, FileSet, FileSystem, RealFileSystem};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered collection of detectors run against a target tree
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
    fs: Arc<dyn FileSystem>,
    logger: HeuristicLogger,
}

impl DetectorRegistry {
    /// An empty registry reading descriptors from disk
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem::new()))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            detectors: Vec::new(),
            fs,
            logger: HeuristicLogger::disabled(),
        }
    }

    /// All built-in detectors in their fixed registration order
    pub fn with_defaults(settings: DetectorSettings) -> Self {
        let mut registry = Self::new();
        registry.register_defaults(settings);
        registry
    }

    pub fn register_defaults(&mut self, settings: DetectorSettings) {
        self.register(AutogenConfMakeDetector);
        self.register(PureCFileDetector::new(settings.clone()));
        self.register(PureCFindDetector::new(settings.clone()));
        self.register(MakeDetector);
        self.register(MakePthreadDetector);
        self.register(MakeSubstitutionsDetector);
        self.register(AutogenDetector);
        self.register(AutoreconfDetector);
        self.register(CMakeDetector::new(settings));
        self.register(MakeWithTestsDetector);
    }

    /// Appends a detector after every detector registered so far
    pub fn register(&mut self, detector: impl Detector + 'static) {
        self.detectors.push(Box::new(detector));
    }

    pub fn with_logger(mut self, logger: HeuristicLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn detectors(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Enumerates `target` once and runs every detector over the listing
    pub fn detect(&self, target: &Path) -> Result<Vec<BuildCandidate>> {
        let files = list_files(target)?;
        self.detect_files(&files)
    }

    /// Runs every detector in registration order. Matched detectors append
    /// all of their candidates before the next detector runs; unmatched ones
    /// contribute nothing.
    pub fn detect_files(&self, files: &FileSet) -> Result<Vec<BuildCandidate>> {
        let mut candidates = Vec::new();

        for detector in &self.detectors {
            let matches = detector.match_files(files, self.fs.as_ref())?;
            if !matches.is_matched() {
                debug!(detector = detector.name(), "Detector did not match");
                self.logger
                    .log_detector(files.root(), detector.id(), &matches, &[]);
                continue;
            }

            let produced = detector.candidates(&matches);
            info!(
                detector = detector.name(),
                candidates = produced.len(),
                options = matches.options().len(),
                "Detector matched"
            );
            self.logger
                .log_detector(files.root(), detector.id(), &matches, &produced);
            candidates.extend(produced);
        }

        info!(
            root = %files.root().display(),
            files = files.len(),
            candidates = candidates.len(),
            "Build heuristics complete"
        );

        Ok(candidates)
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_defaults(DetectorSettings::default())
    }
}
