//! Detectors for trees with a top-level Makefile

use super::{Detector, MatchSet, Signature};
use crate::heuristics::{BuildCandidate, BuildStep, DetectorId, RecipePatch};

const ROOT_MAKEFILE: Signature = Signature::RootFile("Makefile");

/// Runs `make` with no arguments
pub struct MakeDetector;

impl Detector for MakeDetector {
    fn id(&self) -> DetectorId {
        DetectorId::Make
    }

    fn signatures(&self) -> &[Signature] {
        &[ROOT_MAKEFILE]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        vec![BuildCandidate::new(
            self.id(),
            "default",
            vec![BuildStep::make(Vec::<String>::new())],
        )]
    }
}

/// Links with pthreads for projects whose Makefile forgets to
pub struct MakePthreadDetector;

impl Detector for MakePthreadDetector {
    fn id(&self) -> DetectorId {
        DetectorId::MakePthread
    }

    fn signatures(&self) -> &[Signature] {
        &[ROOT_MAKEFILE]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        vec![BuildCandidate::new(
            self.id(),
            "default",
            vec![
                BuildStep::AppendFlag {
                    var: "CXXFLAGS".to_string(),
                    flag: "-lpthread".to_string(),
                },
                BuildStep::make(Vec::<String>::new()),
            ],
        )]
    }
}

/// Patches the Makefile so warnings stay warnings and the environment's
/// compilers are used, then builds verbosely
pub struct MakeSubstitutionsDetector;

impl MakeSubstitutionsDetector {
    pub fn patches() -> Vec<RecipePatch> {
        vec![
            RecipePatch::DowngradeWerror,
            RecipePatch::comment_out("CC", false),
            RecipePatch::comment_out("CXX", false),
            RecipePatch::comment_out("CC", true),
            RecipePatch::comment_out("CXX", true),
        ]
    }
}

impl Detector for MakeSubstitutionsDetector {
    fn id(&self) -> DetectorId {
        DetectorId::MakeSubstitutions
    }

    fn signatures(&self) -> &[Signature] {
        &[ROOT_MAKEFILE]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        let mut steps: Vec<BuildStep> = Self::patches()
            .into_iter()
            .map(|patch| BuildStep::patch("./Makefile", patch))
            .collect();
        steps.push(BuildStep::make_tolerant(["V=1"]));

        vec![BuildCandidate::new(self.id(), "default", steps)]
    }
}

/// Builds, and separately builds then runs the `test` target, which tends to
/// compile extra code paths
pub struct MakeWithTestsDetector;

impl Detector for MakeWithTestsDetector {
    fn id(&self) -> DetectorId {
        DetectorId::MakeWithTests
    }

    fn signatures(&self) -> &[Signature] {
        &[ROOT_MAKEFILE]
    }

    fn candidates(&self, _matches: &MatchSet) -> Vec<BuildCandidate> {
        let build = vec![BuildStep::make(Vec::<String>::new())];
        let mut with_tests = build.clone();
        with_tests.push(BuildStep::make(["test"]));

        vec![
            BuildCandidate::new(self.id(), "build", build),
            BuildCandidate::new(self.id(), "test", with_tests),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileSet, MockFileSystem};
    use std::path::PathBuf;

    fn matched(detector: &dyn Detector, paths: &[&str]) -> MatchSet {
        let files = FileSet::new("/repo", paths.iter().map(PathBuf::from).collect());
        detector.match_files(&files, &MockFileSystem::new()).unwrap()
    }

    #[test]
    fn test_nested_makefile_does_not_match() {
        assert!(!matched(&MakeDetector, &["lib/Makefile"]).is_matched());
        assert!(matched(&MakeDetector, &["lib/Makefile", "Makefile"]).is_matched());
    }

    #[test]
    fn test_plain_make() {
        let matches = matched(&MakeDetector, &["Makefile"]);
        let candidates = MakeDetector.candidates(&matches);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].commands(), vec!["make"]);
    }

    #[test]
    fn test_pthread_exports_flag_first() {
        let matches = matched(&MakePthreadDetector, &["Makefile"]);
        let candidates = MakePthreadDetector.candidates(&matches);
        assert_eq!(
            candidates[0].commands(),
            vec!["export CXXFLAGS=\"${CXXFLAGS} -lpthread\"", "make"]
        );
    }

    #[test]
    fn test_substitutions_patch_then_build_tolerantly() {
        let matches = matched(&MakeSubstitutionsDetector, &["Makefile"]);
        let commands = MakeSubstitutionsDetector.candidates(&matches)[0].commands();
        assert_eq!(
            commands,
            vec![
                "sed -i 's/-Werror/-Wno-error/g' ./Makefile",
                "sed -i 's/CC=/#CC=/g' ./Makefile",
                "sed -i 's/CXX=/#CXX=/g' ./Makefile",
                "sed -i 's/CC =/#CC=/g' ./Makefile",
                "sed -i 's/CXX =/#CXX=/g' ./Makefile",
                "make V=1 || true",
            ]
        );
    }

    #[test]
    fn test_substitution_patches_on_recipe_text() {
        let recipe = "CC = gcc\nCFLAGS = -Werror\n";
        let patched = MakeSubstitutionsDetector::patches()
            .iter()
            .fold(recipe.to_string(), |text, p| p.apply(&text));
        assert_eq!(patched, "#CC= gcc\nCFLAGS = -Wno-error\n");
    }

    #[test]
    fn test_make_with_tests_yields_two_candidates() {
        let matches = matched(&MakeWithTestsDetector, &["Makefile"]);
        let candidates = MakeWithTestsDetector.candidates(&matches);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label(), "make-tests-build");
        assert_eq!(candidates[0].commands(), vec!["make"]);
        assert_eq!(candidates[1].label(), "make-tests-test");
        assert_eq!(candidates[1].commands(), vec!["make", "make test"]);
    }
}
