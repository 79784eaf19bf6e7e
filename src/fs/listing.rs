//! Flat file enumeration of a target tree

use crate::error::{AutobuildError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directories never descended into when enumerating a target tree
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Every file under a target root, as root-relative paths in walk order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl FileSet {
    /// Builds a file set from paths that are already relative to `root`
    pub fn new(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    /// Builds a file set from an arbitrary enumeration of `root`.
    ///
    /// Enumerators disagree on how they represent the target itself: some emit
    /// absolute paths, others emit paths whose first segment is the target
    /// directory's own name (`proj/src/a.c` for root `/work/proj`). Both are
    /// normalized to root-relative form by [`FileSet::relativize`].
    pub fn from_listing<I, P>(root: impl Into<PathBuf>, listing: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let root = root.into();
        let files = listing
            .into_iter()
            .map(|p| Self::relativize(&root, p.as_ref()))
            .collect();
        Self { root, files }
    }

    /// Maps one enumerated path onto its root-relative form.
    ///
    /// Absolute paths under `root` lose the root prefix. Relative paths lose
    /// their first segment when it names the root directory. Anything else is
    /// already root-relative.
    pub fn relativize(root: &Path, path: &Path) -> PathBuf {
        if let Ok(rel) = path.strip_prefix(root) {
            return rel.to_path_buf();
        }
        if path.is_absolute() {
            return path.to_path_buf();
        }

        let mut components = path.components();
        let first = components.next();
        let root_name = root.file_name();
        match (first, root_name) {
            (Some(Component::Normal(segment)), Some(name)) if segment == name => {
                let rest = components.as_path();
                if rest.as_os_str().is_empty() {
                    path.to_path_buf()
                } else {
                    rest.to_path_buf()
                }
            }
            _ => path.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Absolute location of a root-relative path
    pub fn absolute(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }
}

/// Enumerates every regular file under `root`.
///
/// Paths are root-relative and sorted by file name at each directory level so
/// repeated runs over the same tree agree on order.
pub fn list_files(root: &Path) -> Result<FileSet> {
    walk(root, |source| {
        Err(AutobuildError::Walk {
            root: root.to_path_buf(),
            source,
        })
    })
}

/// Like [`list_files`], but entries that cannot be read are skipped instead
/// of aborting the walk. The skipped entries' errors come back with the
/// listing of everything that could be read.
pub fn list_files_lossy(root: &Path) -> Result<(FileSet, Vec<walkdir::Error>)> {
    let mut skipped = Vec::new();
    let files = walk(root, |err| {
        skipped.push(err);
        Ok(())
    })?;
    Ok((files, skipped))
}

fn walk<F>(root: &Path, mut on_error: F) -> Result<FileSet>
where
    F: FnMut(walkdir::Error) -> Result<()>,
{
    if !root.exists() {
        return Err(AutobuildError::TargetNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(AutobuildError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .map(|n| SKIPPED_DIRS.contains(&n))
                        .unwrap_or(false))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                on_error(err)?;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        files.push(rel);
    }

    debug!(root = %root.display(), files = files.len(), "Enumerated target tree");

    Ok(FileSet::new(root, files))
}
