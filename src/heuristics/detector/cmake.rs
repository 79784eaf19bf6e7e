//! CMake detector
//!
//! Besides the usual out-of-source build, this detector reads every
//! `CMakeLists.txt` it matches and collects the names declared with
//! `option(...)`. Well-known shared/static toggles among them are flipped
//! towards static, non-shared output in dedicated candidates.

use super::{match_signatures, Detector, DetectorSettings, MatchSet, Signature};
use crate::error::{AutobuildError, Result};
use crate::fs::{FileSet, FileSystem};
use crate::heuristics::{BuildCandidate, BuildStep, CMakeDefine, DetectorId, RecipePatch};
use regex::Regex;
use std::path::Path;
use tracing::debug;

const TOP_LEVEL_LISTS: &str = "CMakeLists.txt";
const CMAKE_LISTS: Signature = Signature::FileName(TOP_LEVEL_LISTS);

/// Value that favors static, non-shared output for a known toggle
fn static_toggle_value(option: &str) -> Option<&'static str> {
    match option {
        "BUILD_SHARED_LIBS" | "BUILD_SHARED" => Some("OFF"),
        "BUILD_STATIC" | "ENABLE_STATIC" => Some("ON"),
        _ => None,
    }
}

fn is_test_toggle(option: &str) -> bool {
    option.contains("BUILD_TESTS")
}

pub struct CMakeDetector {
    settings: DetectorSettings,
    option_re: Regex,
}

impl CMakeDetector {
    pub fn new(settings: DetectorSettings) -> Self {
        Self {
            settings,
            option_re: Regex::new(r#"option\(\s*([^\s)"]+)"#).expect("valid regex"),
        }
    }

    /// Option names declared in one descriptor, in order of appearance.
    /// Commented-out lines are ignored.
    pub fn harvest_options(&self, content: &str) -> Vec<String> {
        content
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .filter_map(|line| self.option_re.captures(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    fn toolchain_defines() -> Vec<CMakeDefine> {
        vec![
            CMakeDefine::new("CMAKE_VERBOSE_MAKEFILE", "ON"),
            CMakeDefine::new("CMAKE_C_COMPILER", "$CC"),
            CMakeDefine::new("CMAKE_CXX_COMPILER", "$CXX"),
            CMakeDefine::new("CMAKE_C_FLAGS", "\"$CFLAGS\""),
            CMakeDefine::new("CMAKE_CXX_FLAGS", "\"$CXXFLAGS\""),
        ]
    }

    /// Out-of-source configure and build
    fn build_steps(&self, defines: Vec<CMakeDefine>, allow_failure: bool) -> Vec<BuildStep> {
        let make = if allow_failure {
            BuildStep::make_tolerant(["V=1"])
        } else {
            BuildStep::make(["V=1"])
        };
        vec![
            BuildStep::CreateDir {
                path: self.settings.cmake_build_dir.clone(),
            },
            BuildStep::ChangeDir {
                path: self.settings.cmake_build_dir.clone(),
            },
            BuildStep::CMakeConfigure {
                source_dir: "../".to_string(),
                defines,
            },
            make,
        ]
    }

    fn option_defines(matches: &MatchSet, with_tests: bool) -> Vec<CMakeDefine> {
        matches
            .options()
            .iter()
            .filter_map(|option| {
                if let Some(value) = static_toggle_value(option) {
                    Some(CMakeDefine::new(option.as_str(), value))
                } else if with_tests && is_test_toggle(option) {
                    Some(CMakeDefine::new(option.as_str(), "ON"))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Detector for CMakeDetector {
    fn id(&self) -> DetectorId {
        DetectorId::CMake
    }

    fn signatures(&self) -> &[Signature] {
        &[CMAKE_LISTS]
    }

    fn match_files(&self, files: &FileSet, fs: &dyn FileSystem) -> Result<MatchSet> {
        let mut matches = match_signatures(self.signatures(), files, |_| true);

        let descriptors = matches.paths(&CMAKE_LISTS).to_vec();
        for rel in descriptors {
            let path = files.absolute(&rel);
            let content = fs
                .read_to_string(&path)
                .map_err(|e| AutobuildError::Descriptor {
                    path: path.clone(),
                    source: e.into(),
                })?;
            for option in self.harvest_options(&content) {
                debug!(descriptor = %rel.display(), option = %option, "Found CMake option");
                matches.add_option(option);
            }
        }

        Ok(matches)
    }

    fn candidates(&self, matches: &MatchSet) -> Vec<BuildCandidate> {
        let mut candidates = vec![
            BuildCandidate::new(
                self.id(),
                "plain",
                self.build_steps(vec![CMakeDefine::new("CMAKE_VERBOSE_MAKEFILE", "ON")], true),
            ),
            BuildCandidate::new(
                self.id(),
                "toolchain",
                self.build_steps(Self::toolchain_defines(), true),
            ),
        ];

        // The SHARED->STATIC rewrite targets the top-level descriptor only
        if matches
            .paths(&CMAKE_LISTS)
            .iter()
            .any(|p| p.as_path() == Path::new(TOP_LEVEL_LISTS))
        {
            let mut static_steps = vec![BuildStep::patch(
                format!("./{}", TOP_LEVEL_LISTS),
                RecipePatch::SharedToStatic,
            )];
            static_steps.extend(self.build_steps(Self::toolchain_defines(), true));
            candidates.push(BuildCandidate::new(self.id(), "static", static_steps));
        }

        let toggles = Self::option_defines(matches, false);
        if !toggles.is_empty() {
            let mut defines = Self::toolchain_defines();
            defines.extend(toggles);
            candidates.push(BuildCandidate::new(
                self.id(),
                "options",
                self.build_steps(defines, false),
            ));
        }

        if matches.options().iter().any(|o| is_test_toggle(o)) {
            let mut defines = Self::toolchain_defines();
            defines.extend(Self::option_defines(matches, true));
            candidates.push(BuildCandidate::new(
                self.id(),
                "options-tests",
                self.build_steps(defines, false),
            ));
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::path::PathBuf;

    fn detector() -> CMakeDetector {
        CMakeDetector::new(DetectorSettings::default())
    }

    fn scan(fs: &MockFileSystem) -> Result<MatchSet> {
        let files = FileSet::new(fs.root(), fs.paths());
        detector().match_files(&files, fs)
    }

    #[test]
    fn test_harvest_options() {
        let content = r#"
cmake_minimum_required(VERSION 3.10)
option(BUILD_SHARED_LIBS "Build shared" ON)
option( ENABLE_STATIC "Static" OFF)
# option(COMMENTED_OUT "nope" ON)
cmake_dependent_option(FOO_BUILD_TESTS "tests" ON "BAR" OFF)
add_library(foo foo.c)
"#;
        assert_eq!(
            detector().harvest_options(content),
            vec!["BUILD_SHARED_LIBS", "ENABLE_STATIC", "FOO_BUILD_TESTS"]
        );
    }

    #[test]
    fn test_match_collects_options_from_every_descriptor() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("CMakeLists.txt", "option(BUILD_STATIC \"static\" OFF)\n");
        fs.add_file("lib/CMakeLists.txt", "option(BUILD_SHARED_LIBS \"desc\" ON)\n");

        let matches = scan(&fs).unwrap();
        assert!(matches.is_matched());
        assert_eq!(matches.paths(&CMAKE_LISTS).len(), 2);
        let options: Vec<&str> = matches.options().iter().map(String::as_str).collect();
        assert_eq!(options, vec!["BUILD_SHARED_LIBS", "BUILD_STATIC"]);
    }

    #[test]
    fn test_unreadable_descriptor_is_an_error() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("CMakeLists.txt", "project(demo)\n");
        fs.add_unreadable("sub/CMakeLists.txt");

        match scan(&fs) {
            Err(AutobuildError::Descriptor { path, .. }) => {
                assert_eq!(path, PathBuf::from("/repo/sub/CMakeLists.txt"));
            }
            other => panic!("Expected Descriptor error, got {:?}", other),
        }
    }

    #[test]
    fn test_base_candidates_without_options() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("CMakeLists.txt", "project(demo C)\n");
        let matches = scan(&fs).unwrap();

        let candidates = detector().candidates(&matches);
        let labels: Vec<&str> = candidates.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["cmake-plain", "cmake-toolchain", "cmake-static"]);

        assert_eq!(
            candidates[0].commands(),
            vec![
                "mkdir fuzz-build",
                "cd fuzz-build",
                "cmake -DCMAKE_VERBOSE_MAKEFILE=ON ../",
                "make V=1 || true",
            ]
        );
        assert_eq!(
            candidates[1].commands()[2],
            "cmake -DCMAKE_VERBOSE_MAKEFILE=ON -DCMAKE_C_COMPILER=$CC -DCMAKE_CXX_COMPILER=$CXX \
             -DCMAKE_C_FLAGS=\"$CFLAGS\" -DCMAKE_CXX_FLAGS=\"$CXXFLAGS\" ../"
        );
        assert_eq!(
            candidates[2].commands()[0],
            "sed -i 's/SHARED/STATIC/g' ./CMakeLists.txt"
        );
    }

    #[test]
    fn test_shared_libs_option_is_turned_off() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("CMakeLists.txt", "option(BUILD_SHARED_LIBS \"desc\" ON)\n");
        let matches = scan(&fs).unwrap();
        assert!(matches.options().contains("BUILD_SHARED_LIBS"));

        let candidates = detector().candidates(&matches);
        assert_eq!(candidates.len(), 4);
        let options = &candidates[3];
        assert_eq!(options.label(), "cmake-options");
        let configure = options.commands()[2].clone();
        assert!(configure.contains("-DBUILD_SHARED_LIBS=OFF"));
        assert_eq!(options.commands()[3], "make V=1");
    }

    #[test]
    fn test_test_options_get_their_own_candidate() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file(
            "CMakeLists.txt",
            "option(ENABLE_STATIC \"s\" OFF)\noption(FOO_BUILD_TESTS \"t\" OFF)\noption(WITH_DOCS \"d\" ON)\n",
        );
        let matches = scan(&fs).unwrap();
        let candidates = detector().candidates(&matches);

        let labels: Vec<&str> = candidates.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "cmake-plain",
                "cmake-toolchain",
                "cmake-static",
                "cmake-options",
                "cmake-options-tests",
            ]
        );

        let options = candidates[3].commands()[2].clone();
        assert!(options.contains("-DENABLE_STATIC=ON"));
        assert!(!options.contains("FOO_BUILD_TESTS"));
        assert!(!options.contains("WITH_DOCS"));

        let tests = candidates[4].commands()[2].clone();
        assert!(tests.contains("-DENABLE_STATIC=ON"));
        assert!(tests.contains("-DFOO_BUILD_TESTS=ON"));
    }

    #[test]
    fn test_only_test_option_skips_static_options_candidate() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("CMakeLists.txt", "option(BUILD_TESTS \"t\" OFF)\n");
        let matches = scan(&fs).unwrap();
        let candidates = detector().candidates(&matches);

        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[3].label(), "cmake-options-tests");
        assert!(candidates[3].commands()[2].contains("-DBUILD_TESTS=ON"));
    }

    #[test]
    fn test_nested_descriptor_only_skips_static_rewrite() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("lib/CMakeLists.txt", "option(BUILD_SHARED_LIBS \"desc\" ON)\n");
        let matches = scan(&fs).unwrap();
        assert!(matches.is_matched());

        let candidates = detector().candidates(&matches);
        let labels: Vec<&str> = candidates.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["cmake-plain", "cmake-toolchain", "cmake-options"]);
        assert!(candidates
            .iter()
            .all(|c| c.commands().iter().all(|cmd| !cmd.starts_with("sed"))));
    }

    #[test]
    fn test_candidates_are_repeatable() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("CMakeLists.txt", "option(BUILD_STATIC \"s\" OFF)\n");
        let matches = scan(&fs).unwrap();
        let detector = detector();

        assert_eq!(detector.candidates(&matches), detector.candidates(&matches));
    }
}
