//! Build-system detectors
//!
//! A detector recognizes one build-system family from a [`FileSet`] and turns
//! what it found into [`BuildCandidate`]s. Matching produces an immutable
//! [`MatchSet`] that is handed back to the same detector for candidate
//! generation, so detectors themselves carry no per-run state.

use super::{BuildCandidate, DetectorId};
use crate::error::Result;
use crate::fs::{FileSet, FileSystem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod autotools;
pub mod cmake;
pub mod make;
pub mod pure_c;

pub use autotools::{AutogenConfMakeDetector, AutogenDetector, AutoreconfDetector};
pub use cmake::CMakeDetector;
pub use make::{MakeDetector, MakePthreadDetector, MakeSubstitutionsDetector, MakeWithTestsDetector};
pub use pure_c::{PureCFileDetector, PureCFindDetector};

/// What a detector looks for in a file listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Signature {
    /// A file with this exact name anywhere in the tree
    FileName(&'static str),
    /// A file with this exact name directly in the target root
    RootFile(&'static str),
    /// Any file with this extension (without the dot)
    Extension(&'static str),
}

impl Signature {
    pub fn matches(&self, rel: &Path) -> bool {
        match self {
            Self::FileName(name) => rel.file_name() == Some(OsStr::new(name)),
            Self::RootFile(name) => rel == Path::new(name),
            Self::Extension(ext) => rel.extension() == Some(OsStr::new(ext)),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileName(name) => write!(f, "**/{}", name),
            Self::RootFile(name) => write!(f, "./{}", name),
            Self::Extension(ext) => write!(f, "*.{}", ext),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureMatches {
    pub signature: Signature,
    pub paths: Vec<PathBuf>,
}

/// Result of running a detector's match step over a file set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSet {
    entries: Vec<SignatureMatches>,
    options: BTreeSet<String>,
}

impl MatchSet {
    /// An empty match list for each signature, in order
    pub fn for_signatures(signatures: &[Signature]) -> Self {
        Self {
            entries: signatures
                .iter()
                .map(|&signature| SignatureMatches {
                    signature,
                    paths: Vec::new(),
                })
                .collect(),
            options: BTreeSet::new(),
        }
    }

    pub fn record(&mut self, signature: &Signature, path: PathBuf) {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.signature == signature) {
            entry.paths.push(path);
        }
    }

    pub fn add_option(&mut self, option: impl Into<String>) {
        self.options.insert(option.into());
    }

    /// True only when every tracked signature matched at least one path
    pub fn is_matched(&self) -> bool {
        self.entries.iter().all(|e| !e.paths.is_empty())
    }

    pub fn paths(&self, signature: &Signature) -> &[PathBuf] {
        self.entries
            .iter()
            .find(|e| &e.signature == signature)
            .map(|e| e.paths.as_slice())
            .unwrap_or(&[])
    }

    pub fn entries(&self) -> &[SignatureMatches] {
        &self.entries
    }

    /// Harvested descriptor options, sorted
    pub fn options(&self) -> &BTreeSet<String> {
        &self.options
    }
}

/// Values detectors render into the commands they generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorSettings {
    /// Archive tool used to bundle object files
    pub archiver: String,
    /// Static library produced by the direct-compilation detectors
    pub library_name: String,
    /// Out-of-source build directory used by CMake candidates
    pub cmake_build_dir: String,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            archiver: "llvm-ar".to_string(),
            library_name: "libfuzz.a".to_string(),
            cmake_build_dir: "fuzz-build".to_string(),
        }
    }
}

pub trait Detector: Send + Sync {
    fn id(&self) -> DetectorId;

    /// Stable name used as the prefix of candidate labels
    fn name(&self) -> &'static str {
        self.id().name()
    }

    /// Tracked signatures; every one must match for the detector to apply
    fn signatures(&self) -> &[Signature];

    /// Exclusion filter applied before a path is recorded
    fn accepts(&self, _rel: &Path) -> bool {
        true
    }

    /// Scans the file set. Detectors that read descriptor content override
    /// this and propagate read failures.
    fn match_files(&self, files: &FileSet, _fs: &dyn FileSystem) -> Result<MatchSet> {
        Ok(match_signatures(self.signatures(), files, |rel| {
            self.accepts(rel)
        }))
    }

    /// Candidates in yield order. Only called for a matched [`MatchSet`].
    fn candidates(&self, matches: &MatchSet) -> Vec<BuildCandidate>;
}

/// Records every accepted path of `files` under each signature it matches
pub fn match_signatures<F>(signatures: &[Signature], files: &FileSet, accepts: F) -> MatchSet
where
    F: Fn(&Path) -> bool,
{
    let mut matches = MatchSet::for_signatures(signatures);
    for rel in files.iter() {
        if !accepts(rel) {
            continue;
        }
        for signature in signatures {
            if signature.matches(rel) {
                matches.record(signature, rel.clone());
            }
        }
    }
    matches
}
