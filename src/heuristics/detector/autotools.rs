//! Autotools flows: regenerate, configure, make

use super::{Detector, MatchSet, Signature};
use crate::heuristics::{BuildCandidate, BuildStep, DetectorId};

const CONFIGURE_AC: Signature = Signature::FileName("configure.ac");
const MAKEFILE_AM: Signature = Signature::FileName("Makefile.am");
const ROOT_MAKEFILE: Signature = Signature::RootFile("Makefile");

fn configure_and_make() -> [BuildStep; 2] {
    [
        BuildStep::shell("./configure"),
        BuildStep::make(Vec::<String>::new()),
    ]
}

/// Trusts an already generated configure script: `./configure && make`
pub struct AutogenConfMakeDetector;

impl Detector for AutogenConfMakeDetector {
    fn id(&self) -> DetectorId {
        DetectorId::AutogenConfMake
    }

    fn signatures(&self) -> &[Signature] {
        &[CONFIGURE_AC, ROOT_MAKEFILE]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        vec![BuildCandidate::new(
            self.id(),
            "default",
            configure_and_make().to_vec(),
        )]
    }
}

/// Regenerates configure and config.h.in with `autoconf` and `autoheader`
pub struct AutogenDetector;

impl Detector for AutogenDetector {
    fn id(&self) -> DetectorId {
        DetectorId::Autogen
    }

    fn signatures(&self) -> &[Signature] {
        &[CONFIGURE_AC, ROOT_MAKEFILE]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        let mut steps = vec![BuildStep::shell("autoconf"), BuildStep::shell("autoheader")];
        steps.extend(configure_and_make());
        vec![BuildCandidate::new(self.id(), "default", steps)]
    }
}

/// Full bootstrap for automake projects via `autoreconf -fi`
pub struct AutoreconfDetector;

impl Detector for AutoreconfDetector {
    fn id(&self) -> DetectorId {
        DetectorId::AutoreconfAutomake
    }

    fn signatures(&self) -> &[Signature] {
        &[CONFIGURE_AC, MAKEFILE_AM]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        let mut steps = vec![BuildStep::shell("autoreconf -fi")];
        steps.extend(configure_and_make());
        vec![BuildCandidate::new(self.id(), "default", steps)]
    }
}
