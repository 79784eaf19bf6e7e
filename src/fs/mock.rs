use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
enum MockEntry {
    File(String),
    Unreadable,
}

/// In-memory file tree rooted at a fixed path
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        self.files
            .write()
            .unwrap()
            .insert(path, MockEntry::File(content.to_string()));
    }

    /// Registers a file that exists but fails every read
    pub fn add_unreadable(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.files
            .write()
            .unwrap()
            .insert(path, MockEntry::Unreadable);
    }

    /// Root-relative paths of every registered file, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let files = self.files.read().unwrap();
        let mut paths: Vec<PathBuf> = files
            .keys()
            .filter_map(|p| p.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .collect();
        paths.sort();
        paths
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();
        match files.get(&path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Unreadable) => Err(anyhow!("Permission denied: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}
