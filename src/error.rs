//! Error types for detection, materialization and evaluation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutobuildError {
    #[error("Target path does not exist: {0}")]
    TargetNotFound(PathBuf),

    #[error("Target path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A descriptor matched by name could not be read while harvesting metadata
    #[error("Failed to read build descriptor {path}: {source}")]
    Descriptor {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to enumerate files under {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Working directories under the target would be copied into each other
    #[error(
        "Working directory prefix {prefix} is inside the target {target}; choose a base outside it"
    )]
    WorkdirInsideTarget { prefix: PathBuf, target: PathBuf },

    #[error("Failed to write build script to {path}: {source}")]
    ScriptWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, AutobuildError>;
