//! Binary artifact classification
//!
//! An [`ArtifactSet`] groups the object files and libraries found under a
//! directory by kind. Paths are relative to the scanned directory, which is
//! what makes a baseline taken from the untouched target comparable with a
//! scan of a candidate's working copy.

use crate::error::Result;
use crate::fs::{list_files, FileSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactKind {
    #[serde(rename = "object-files")]
    ObjectFile,
    #[serde(rename = "static-libs")]
    StaticLibrary,
    #[serde(rename = "dynamic-libs")]
    DynamicLibrary,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::ObjectFile,
        ArtifactKind::StaticLibrary,
        ArtifactKind::DynamicLibrary,
    ];

    /// Classifies a path by its suffix
    pub fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "o" => Some(Self::ObjectFile),
            "a" => Some(Self::StaticLibrary),
            "so" => Some(Self::DynamicLibrary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectFile => "object-files",
            Self::StaticLibrary => "static-libs",
            Self::DynamicLibrary => "dynamic-libs",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactSet {
    by_kind: BTreeMap<ArtifactKind, BTreeSet<PathBuf>>,
}

impl Default for ArtifactSet {
    fn default() -> Self {
        Self {
            by_kind: ArtifactKind::ALL
                .iter()
                .map(|&kind| (kind, BTreeSet::new()))
                .collect(),
        }
    }
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies every file of a listing, keeping its root-relative path
    pub fn from_files(files: &FileSet) -> Self {
        let mut set = Self::new();
        for rel in files.iter() {
            set.insert(rel.clone());
        }
        set
    }

    /// Scans `dir` recursively
    pub fn scan(dir: &Path) -> Result<Self> {
        Ok(Self::from_files(&list_files(dir)?))
    }

    /// Adds `path` under its kind; returns false for non-artifacts
    pub fn insert(&mut self, path: PathBuf) -> bool {
        match ArtifactKind::of(&path) {
            Some(kind) => {
                self.by_kind.entry(kind).or_default().insert(path);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, kind: ArtifactKind) -> impl Iterator<Item = &PathBuf> {
        self.by_kind.get(&kind).into_iter().flatten()
    }

    pub fn contains(&self, kind: ArtifactKind, path: &Path) -> bool {
        self.by_kind
            .get(&kind)
            .map(|paths| paths.contains(path))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per kind, the paths present here but absent from `baseline`
    pub fn new_since(&self, baseline: &ArtifactSet) -> ArtifactSet {
        let mut fresh = ArtifactSet::new();
        for (kind, paths) in &self.by_kind {
            for path in paths {
                if !baseline.contains(*kind, path) {
                    fresh.by_kind.entry(*kind).or_default().insert(path.clone());
                }
            }
        }
        fresh
    }
}
