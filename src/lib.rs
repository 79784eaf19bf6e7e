//! autobuild - heuristic build-strategy discovery for source checkouts
//!
//! Given an arbitrary C/C++ source tree with no known build entry point,
//! autobuild recognizes the build systems it uses and proposes an ordered list
//! of build strategies, each one a short sequence of shell commands. The
//! strategies can then be tried one by one in isolated copies of the tree to
//! learn which of them actually produce object files and libraries.
//!
//! # Core Concepts
//!
//! - **Detectors**: one heuristic per build-system family (Make, Autotools,
//!   CMake, loose C files) that matches file names and yields candidates
//! - **Build candidates**: ordered [`BuildStep`]s labelled by the detector
//!   and strategy that produced them
//! - **Materialization**: rendering a candidate into a bash script that works
//!   in its own copy of the tree
//! - **Evaluation**: running every script and attributing new artifacts to it
//!
//! # Example Usage
//!
//! ```no_run
//! use autobuild::{DetectorRegistry, DetectorSettings, ScriptMaterializer};
//! use std::path::Path;
//!
//! # fn main() -> autobuild::Result<()> {
//! let registry = DetectorRegistry::with_defaults(DetectorSettings::default());
//! let candidates = registry.detect(Path::new("/src/libpng"))?;
//!
//! let scripts = ScriptMaterializer::new("/src/libpng", "/tmp/test-fuzz-build-")
//!     .materialize(&candidates);
//! for script in &scripts {
//!     println!("{} -> {}", script.label(), script.workdir.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`fs`]: tree enumeration and descriptor reading
//! - [`heuristics`]: detectors, candidates and the registry
//! - [`script`]: candidate to script materialization
//! - [`evaluate`]: script execution and artifact attribution
//! - [`pipeline`]: the [`Autobuilder`] driver tying them together

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod fs;
pub mod heuristics;
pub mod pipeline;
pub mod progress;
pub mod script;
pub mod util;

pub use artifacts::{ArtifactKind, ArtifactSet};
pub use config::{AutobuildConfig, ConfigError};
pub use error::{AutobuildError, Result};
pub use evaluate::{
    BuildEvaluator, BuildExecutor, BuildOutcome, CandidateReport, CompileExecutor,
    EvaluationReport,
};
pub use fs::{list_files, list_files_lossy, FileSet, FileSystem, MockFileSystem, RealFileSystem};
pub use heuristics::{
    BuildCandidate, BuildStep, Detector, DetectorId, DetectorRegistry, DetectorSettings,
    MatchSet, RecipePatch, Signature,
};
pub use pipeline::Autobuilder;
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use script::{MaterializedScript, ScriptMaterializer};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
