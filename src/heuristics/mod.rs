//! Build heuristics: detectors, the candidates they yield and the registry
//! that runs them.
//!
//! # Example
//!
//! ```no_run
//! use autobuild::heuristics::{DetectorRegistry, DetectorSettings};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = DetectorRegistry::with_defaults(DetectorSettings::default());
//! for candidate in registry.detect(Path::new("/src/project"))? {
//!     println!("{}: {:?}", candidate.label(), candidate.commands());
//! }
//! # Ok(())
//! # }
//! ```

#[macro_use]
pub mod id_enum_macro;

pub mod candidate;
pub mod detector;
pub mod detector_id;
pub mod logger;
pub mod registry;
pub mod step;

pub use candidate::BuildCandidate;
pub use detector::{Detector, DetectorSettings, MatchSet, Signature, SignatureMatches};
pub use detector_id::DetectorId;
pub use logger::HeuristicLogger;
pub use registry::DetectorRegistry;
pub use step::{BuildStep, CMakeDefine, RecipePatch};
