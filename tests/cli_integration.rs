//! CLI integration tests
//!
//! Runs the compiled `autobuild` binary against the fixture trees and checks
//! output formats and exit codes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_autobuild"));
    cmd.env_remove("AUTOBUILD_SCRIPT_PATH")
        .env_remove("AUTOBUILD_COMPILE_COMMAND")
        .env_remove("AUTOBUILD_BUILD_BASE")
        .env_remove("AUTOBUILD_LIBRARY_NAME")
        .env_remove("AUTOBUILD_HEURISTIC_LOG")
        .env("AUTOBUILD_LOG_LEVEL", "error");
    cmd
}

fn autobuild(args: &[&str]) -> Output {
    command()
        .args(args)
        .output()
        .expect("Failed to execute autobuild")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_cli_help() {
    let output = autobuild(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("autobuild"));
    assert!(text.contains("detect"));
    assert!(text.contains("scripts"));
    assert!(text.contains("evaluate"));
}

#[test]
fn test_cli_version() {
    let output = autobuild(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_detect_json() {
    let target = fixture("cmake-options");
    let output = autobuild(&["detect", target.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let labels: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
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
}

#[test]
fn test_detect_human() {
    let target = fixture("make-only");
    let output = autobuild(&["detect", target.to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("5 build candidates"));
    assert!(text.contains("[2] make-substitutions-default"));
}

#[test]
fn test_detect_yaml() {
    let target = fixture("loose-c");
    let output = autobuild(&["detect", target.to_str().unwrap(), "-f", "yaml"]);
    assert!(output.status.success());

    let parsed: serde_yaml::Value = serde_yaml::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed[0]["label"].as_str(), Some("pure-c-default"));
    assert_eq!(parsed[0]["steps"][0]["kind"].as_str(), Some("compile_each"));
}

#[test]
fn test_detect_missing_path_fails() {
    let output = autobuild(&["detect", "/nonexistent/autobuild/target"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_scripts_to_output_dir() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("scripts");
    let base = temp.path().join("wd-");
    let target = fixture("make-only");

    let output = autobuild(&[
        "scripts",
        target.to_str().unwrap(),
        "--base-dir",
        base.to_str().unwrap(),
        "--output-dir",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    for i in 0..5 {
        let script = fs::read_to_string(out.join(format!("build-{}.sh", i))).unwrap();
        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains(&format!("cd {}{}\n", base.display(), i)));
    }
    assert!(!out.join("build-5.sh").exists());
}

#[test]
fn test_scripts_printed_to_stdout() {
    let target = fixture("autotools");
    let output = autobuild(&["scripts", target.to_str().unwrap(), "--base-dir", "/tmp/ab-"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("# [2] autoreconf-default -> /tmp/ab-2"));
    assert!(text.contains("autoreconf -fi\n./configure\nmake\n"));
}

#[cfg(unix)]
#[test]
fn test_evaluate_writes_report() {
    let temp = TempDir::new().unwrap();
    let script_path = temp.path().join("build.sh");
    let report_path = temp.path().join("report.json");
    let base = temp.path().join("wd-");
    let target = fixture("make-only");

    let output = autobuild(&[
        "evaluate",
        target.to_str().unwrap(),
        "--base-dir",
        base.to_str().unwrap(),
        "--script-path",
        script_path.to_str().unwrap(),
        "--compile-command",
        "true",
        "--format",
        "json",
        "-o",
        report_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    let candidates = report["candidates"].as_object().unwrap();
    assert_eq!(candidates.len(), 5);
    for entry in candidates.values() {
        assert_eq!(entry["outcome"]["status"], "succeeded");
        assert_eq!(entry["candidate"]["label"], entry["label"]);
        assert!(entry["candidate"]["steps"].is_array());
    }
    assert!(report["generated_at"].is_string());
    assert!(script_path.exists());
}

#[test]
fn test_default_workdirs_inside_target_are_refused() {
    let target = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    fs::write(target.path().join("Makefile"), "all:\n\ttouch built.o\n").unwrap();
    let script_path = elsewhere.path().join("build.sh");

    // PATH and --base-dir both default, so the prefix resolves under the cwd
    let output = command()
        .args([
            "evaluate",
            "--script-path",
            script_path.to_str().unwrap(),
            "--compile-command",
            "true",
        ])
        .current_dir(target.path())
        .output()
        .expect("Failed to execute autobuild");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("inside the target"));
    let entries: Vec<_> = fs::read_dir(target.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert!(!script_path.exists());
}

#[test]
fn test_invalid_library_name_rejected() {
    let target = fixture("make-only");
    let output = Command::new(env!("CARGO_BIN_EXE_autobuild"))
        .args(["detect", target.to_str().unwrap()])
        .env("AUTOBUILD_LIBRARY_NAME", "libfuzz.so")
        .output()
        .expect("Failed to execute autobuild");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}
