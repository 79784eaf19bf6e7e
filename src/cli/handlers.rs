//! Subcommand handlers; each returns the process exit code

use super::commands::{DetectArgs, EvaluateArgs, ScriptsArgs};
use super::output::OutputFormatter;
use crate::config::AutobuildConfig;
use crate::evaluate::CompileExecutor;
use crate::pipeline::Autobuilder;
use crate::progress::LoggingHandler;
use crate::script::MaterializedScript;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

fn resolve_target(target: &Option<PathBuf>) -> Result<PathBuf> {
    let target = match target {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    fs::canonicalize(&target)
        .with_context(|| format!("Source tree not found: {}", target.display()))
}

fn load_config() -> Result<AutobuildConfig> {
    let config = AutobuildConfig::default();
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);
    Ok(config)
}

fn builder(config: &AutobuildConfig, quiet: bool) -> Autobuilder {
    let builder = Autobuilder::from_config(config);
    if quiet {
        builder
    } else {
        builder.with_progress(Arc::new(LoggingHandler))
    }
}

fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

pub fn handle_detect(args: &DetectArgs, quiet: bool) -> i32 {
    exit_code(run_detect(args, quiet))
}

fn run_detect(args: &DetectArgs, quiet: bool) -> Result<()> {
    let config = load_config()?;
    let target = resolve_target(&args.target)?;

    let candidates = builder(&config, quiet)
        .detect(&target)
        .with_context(|| format!("Detection failed for {}", target.display()))?;

    let formatted = OutputFormatter::new(args.format.into()).format_candidates(&candidates)?;
    emit(&formatted, None)
}

pub fn handle_scripts(args: &ScriptsArgs, quiet: bool) -> i32 {
    exit_code(run_scripts(args, quiet))
}

fn run_scripts(args: &ScriptsArgs, quiet: bool) -> Result<()> {
    let config = load_config()?;
    let target = resolve_target(&args.target)?;
    let base_dir = args.base_dir.clone().unwrap_or_else(|| config.build_base.clone());

    let scripts = builder(&config, quiet)
        .suggest(&target, &base_dir)
        .with_context(|| format!("Failed to prepare build scripts for {}", target.display()))?;

    match &args.output_dir {
        Some(dir) => write_scripts(&scripts, dir),
        None => {
            let formatted = OutputFormatter::new(args.format.into()).format_scripts(&scripts)?;
            emit(&formatted, None)
        }
    }
}

/// Writes `build-<i>.sh` per script, executable on unix
pub fn write_scripts(scripts: &[MaterializedScript], dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    for script in scripts {
        let path = dir.join(format!("build-{}.sh", script.index));
        fs::write(&path, &script.script)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .with_context(|| format!("Failed to mark {} executable", path.display()))?;
        }

        info!(path = %path.display(), label = script.label(), "Wrote build script");
    }
    Ok(())
}

pub fn handle_evaluate(args: &EvaluateArgs, quiet: bool) -> i32 {
    exit_code(run_evaluate(args, quiet))
}

fn run_evaluate(args: &EvaluateArgs, quiet: bool) -> Result<()> {
    let mut config = load_config()?;
    if let Some(path) = &args.script_path {
        config.script_path = path.clone();
    }
    if let Some(command) = &args.compile_command {
        config.compile_command = command.clone();
    }
    if let Some(base) = &args.base_dir {
        config.build_base = base.clone();
    }
    config.validate().context("Invalid configuration")?;

    let target = resolve_target(&args.target)?;
    let report = builder(&config, quiet)
        .run(
            &target,
            &config.build_base,
            CompileExecutor::new(config.compile_command.clone()),
            &config.script_path,
        )
        .with_context(|| format!("Evaluation failed for {}", target.display()))?;

    let formatted = OutputFormatter::new(args.format.into()).format_report(&report)?;
    emit(&formatted, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::{BuildCandidate, DetectorId};
    use tempfile::TempDir;

    #[test]
    fn test_write_scripts_names_by_index() {
        let temp = TempDir::new().unwrap();
        let candidates = vec![
            BuildCandidate::new(DetectorId::Make, "a", vec![]),
            BuildCandidate::new(DetectorId::Make, "b", vec![]),
        ];
        let scripts = crate::script::ScriptMaterializer::new("/src/p", "/tmp/wd-")
            .materialize(&candidates);

        let out = temp.path().join("scripts");
        write_scripts(&scripts, &out).unwrap();

        let first = fs::read_to_string(out.join("build-0.sh")).unwrap();
        assert!(first.starts_with("#!/bin/bash\n"));
        assert!(out.join("build-1.sh").exists());
    }

    #[test]
    fn test_resolve_missing_target() {
        let temp = TempDir::new().unwrap();
        assert!(resolve_target(&Some(temp.path().join("missing"))).is_err());
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(Ok(())), 0);
        assert_eq!(exit_code(Err(anyhow::anyhow!("boom"))), 1);
    }
}
