//! Direct compiler invocation for trees of plain C files

use super::{Detector, DetectorSettings, MatchSet, Signature};
use crate::heuristics::{BuildCandidate, BuildStep, DetectorId};
use std::path::Path;

const C_SOURCES: Signature = Signature::Extension("c");

/// Path fragments that mark a C file as test or sample code
const EXCLUDED_FRAGMENTS: &[&str] = &["test", "example"];

/// Compiles each matched non-test C file, then archives the objects
pub struct PureCFileDetector {
    settings: DetectorSettings,
}

impl PureCFileDetector {
    pub fn new(settings: DetectorSettings) -> Self {
        Self { settings }
    }
}

impl Detector for PureCFileDetector {
    fn id(&self) -> DetectorId {
        DetectorId::PureCFiles
    }

    fn signatures(&self) -> &[Signature] {
        &[C_SOURCES]
    }

    fn accepts(&self, rel: &Path) -> bool {
        let path = rel.to_string_lossy();
        !EXCLUDED_FRAGMENTS.iter().any(|f| path.contains(f))
    }

    fn candidates(&self, matches: &MatchSet) -> Vec<BuildCandidate> {
        let steps = vec![
            BuildStep::CompileEach {
                files: matches.paths(&C_SOURCES).to_vec(),
            },
            BuildStep::RemoveTestObjects,
            archive(&self.settings),
        ];
        vec![BuildCandidate::new(self.id(), "default", steps)]
    }
}

/// Compiles every C file `find` discovers, gathers objects at the root and
/// archives them
pub struct PureCFindDetector {
    settings: DetectorSettings,
}

impl PureCFindDetector {
    pub fn new(settings: DetectorSettings) -> Self {
        Self { settings }
    }
}

impl Detector for PureCFindDetector {
    fn id(&self) -> DetectorId {
        DetectorId::PureCFilesFind
    }

    fn signatures(&self) -> &[Signature] {
        &[C_SOURCES]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        let steps = vec![
            BuildStep::CompileFind {
                include_dirs: vec!["./src".to_string()],
            },
            BuildStep::CollectObjects,
            BuildStep::RemoveTestObjects,
            archive(&self.settings),
        ];
        vec![BuildCandidate::new(self.id(), "default", steps)]
    }
}

fn archive(settings: &DetectorSettings) -> BuildStep {
    BuildStep::Archive {
        archiver: settings.archiver.clone(),
        library: settings.library_name.clone(),
    }
}
