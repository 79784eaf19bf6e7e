//! FileSystem trait definition

use anyhow::Result;
use std::path::Path;

/// Abstraction over the descriptor reads detectors perform, for testability
pub trait FileSystem: Send + Sync {
    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;
}
