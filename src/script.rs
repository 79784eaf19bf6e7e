//! Candidate → bash script materialization
//!
//! Each candidate gets its own copy of the target tree so strategies never see
//! each other's leftovers. The copy lives at `<base_dir><index>`.

use crate::error::{AutobuildError, Result};
use crate::heuristics::BuildCandidate;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A candidate rendered into a self-contained script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedScript {
    pub index: usize,
    pub script: String,
    pub workdir: PathBuf,
    pub candidate: BuildCandidate,
}

impl MaterializedScript {
    pub fn label(&self) -> &str {
        self.candidate.label()
    }
}

pub struct ScriptMaterializer {
    target_dir: PathBuf,
    base_dir: PathBuf,
}

impl ScriptMaterializer {
    /// `base_dir` is a path prefix, not a directory: index `i` is appended
    /// verbatim. A relative prefix is resolved against the current directory.
    pub fn new(target_dir: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            base_dir: absolutize(base_dir.into()),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn workdir(&self, index: usize) -> PathBuf {
        let mut prefix = self.base_dir.clone().into_os_string();
        prefix.push(index.to_string());
        PathBuf::from(prefix)
    }

    /// Fails when the working directories would land inside the target.
    /// Each script copies the whole target, so it would also copy every
    /// earlier candidate's working directory and its build outputs.
    pub fn ensure_outside_target(&self) -> Result<()> {
        let target = resolve(&self.target_dir);
        let prefix = resolve(&self.base_dir);
        if prefix.starts_with(&target) {
            return Err(AutobuildError::WorkdirInsideTarget { prefix, target });
        }
        Ok(())
    }

    pub fn materialize(&self, candidates: &[BuildCandidate]) -> Vec<MaterializedScript> {
        candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                let workdir = self.workdir(index);
                let script = self.render(&workdir, candidate);
                debug!(
                    index,
                    label = candidate.label(),
                    workdir = %workdir.display(),
                    "Materialized build script"
                );
                MaterializedScript {
                    index,
                    script,
                    workdir,
                    candidate: candidate.clone(),
                }
            })
            .collect()
    }

    fn render(&self, workdir: &Path, candidate: &BuildCandidate) -> String {
        let mut script = String::from("#!/bin/bash\n");
        let _ = writeln!(script, "rm -rf {}", workdir.display());
        let _ = writeln!(
            script,
            "cp -rf {} {}",
            self.target_dir.display(),
            workdir.display()
        );
        let _ = writeln!(script, "cd {}", workdir.display());
        for step in candidate.steps() {
            let _ = writeln!(script, "{}", step);
        }
        script
    }
}

/// Canonical form of `path` as far as it exists on disk, with the remaining
/// components appended unchanged
fn resolve(path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        if let Ok(canonical) = fs::canonicalize(ancestor) {
            return match path.strip_prefix(ancestor) {
                Ok(rest) if !rest.as_os_str().is_empty() => canonical.join(rest),
                _ => canonical,
            };
        }
    }
    path.to_path_buf()
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
