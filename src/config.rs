//! Configuration management for autobuild
//!
//! Settings are loaded from environment variables with defaults that match the
//! layout of a fuzzing build container: the compile entry point lives on
//! `PATH` and picks its script up from `/src/build.sh`.
//!
//! # Environment Variables
//!
//! - `AUTOBUILD_SCRIPT_PATH`: where each build script is written - default: "/src/build.sh"
//! - `AUTOBUILD_COMPILE_COMMAND`: command that runs the script - default: "compile"
//! - `AUTOBUILD_BUILD_BASE`: working directory prefix - default: "test-fuzz-build-"
//! - `AUTOBUILD_ARCHIVER`: archive tool for loose object files - default: "llvm-ar"
//! - `AUTOBUILD_LIBRARY_NAME`: static library produced from loose objects - default: "libfuzz.a"
//! - `AUTOBUILD_HEURISTIC_LOG`: optional JSONL file recording every detector decision
//! - `AUTOBUILD_LOG_LEVEL`: logging level - default: "info"
//! - `AUTOBUILD_LOG_JSON`: emit logs as JSON lines - default: false
//!
//! # Example
//!
//! ```no_run
//! use autobuild::AutobuildConfig;
//!
//! let config = AutobuildConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::heuristics::DetectorSettings;
use crate::util::logging::{parse_level, LoggingConfig};
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_SCRIPT_PATH: &str = "/src/build.sh";
const DEFAULT_COMPILE_COMMAND: &str = "compile";
const DEFAULT_BUILD_BASE: &str = "test-fuzz-build-";
const DEFAULT_ARCHIVER: &str = "llvm-ar";
const DEFAULT_LIBRARY_NAME: &str = "libfuzz.a";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

#[derive(Debug, Clone)]
pub struct AutobuildConfig {
    pub script_path: PathBuf,
    pub compile_command: String,
    /// Prefix of per-candidate working directories; the index is appended
    pub build_base: PathBuf,
    pub archiver: String,
    pub library_name: String,
    pub heuristic_log: Option<PathBuf>,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for AutobuildConfig {
    /// Loads `AUTOBUILD_*` variables, falling back to defaults
    fn default() -> Self {
        let var = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

        Self {
            script_path: PathBuf::from(var("AUTOBUILD_SCRIPT_PATH", DEFAULT_SCRIPT_PATH)),
            compile_command: var("AUTOBUILD_COMPILE_COMMAND", DEFAULT_COMPILE_COMMAND),
            build_base: PathBuf::from(var("AUTOBUILD_BUILD_BASE", DEFAULT_BUILD_BASE)),
            archiver: var("AUTOBUILD_ARCHIVER", DEFAULT_ARCHIVER),
            library_name: var("AUTOBUILD_LIBRARY_NAME", DEFAULT_LIBRARY_NAME),
            heuristic_log: env::var("AUTOBUILD_HEURISTIC_LOG").ok().map(PathBuf::from),
            log_level: var("AUTOBUILD_LOG_LEVEL", DEFAULT_LOG_LEVEL).to_lowercase(),
            log_json: env::var("AUTOBUILD_LOG_JSON")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false),
        }
    }
}

impl AutobuildConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.script_path.as_os_str().is_empty() {
            return Err(ConfigError::Empty {
                field: "script_path",
            });
        }
        if self.compile_command.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "compile_command",
            });
        }
        if self.build_base.as_os_str().is_empty() {
            return Err(ConfigError::Empty {
                field: "build_base",
            });
        }
        if self.archiver.trim().is_empty() {
            return Err(ConfigError::Empty { field: "archiver" });
        }

        if !self.library_name.ends_with(".a") || self.library_name.len() <= 2 {
            return Err(ConfigError::ValidationFailed(format!(
                "Library name must be a static archive ending in .a, got: {}",
                self.library_name
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Subscriber settings for this configuration's level and format
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: parse_level(&self.log_level),
            use_json: self.log_json,
            ..LoggingConfig::default()
        }
    }

    /// Tunables the detectors render into their commands
    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings {
            archiver: self.archiver.clone(),
            library_name: self.library_name.clone(),
            ..DetectorSettings::default()
        }
    }
}

impl fmt::Display for AutobuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Autobuild Configuration:")?;
        writeln!(f, "  Script Path: {}", self.script_path.display())?;
        writeln!(f, "  Compile Command: {}", self.compile_command)?;
        writeln!(f, "  Build Base: {}", self.build_base.display())?;
        writeln!(f, "  Archiver: {}", self.archiver)?;
        writeln!(f, "  Library: {}", self.library_name)?;
        if let Some(ref log) = self.heuristic_log {
            writeln!(f, "  Heuristic Log: {}", log.display())?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  JSON Logs: {}", self.log_json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets or clears an environment variable, restoring it on drop
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    const KEYS: &[&str] = &[
        "AUTOBUILD_SCRIPT_PATH",
        "AUTOBUILD_COMPILE_COMMAND",
        "AUTOBUILD_BUILD_BASE",
        "AUTOBUILD_ARCHIVER",
        "AUTOBUILD_LIBRARY_NAME",
        "AUTOBUILD_HEURISTIC_LOG",
        "AUTOBUILD_LOG_LEVEL",
        "AUTOBUILD_LOG_JSON",
    ];

    fn clean_env() -> Vec<EnvGuard> {
        KEYS.iter().map(|k| EnvGuard::unset(k)).collect()
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clean_env();
        let config = AutobuildConfig::default();

        assert_eq!(config.script_path, PathBuf::from(DEFAULT_SCRIPT_PATH));
        assert_eq!(config.compile_command, DEFAULT_COMPILE_COMMAND);
        assert_eq!(config.build_base, PathBuf::from(DEFAULT_BUILD_BASE));
        assert_eq!(config.archiver, DEFAULT_ARCHIVER);
        assert_eq!(config.library_name, DEFAULT_LIBRARY_NAME);
        assert!(config.heuristic_log.is_none());
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        let _clean = clean_env();
        let _guards = vec![
            EnvGuard::set("AUTOBUILD_SCRIPT_PATH", "/work/build.sh"),
            EnvGuard::set("AUTOBUILD_ARCHIVER", "ar"),
            EnvGuard::set("AUTOBUILD_LIBRARY_NAME", "libtarget.a"),
            EnvGuard::set("AUTOBUILD_LOG_LEVEL", "DEBUG"),
        ];

        let config = AutobuildConfig::default();
        assert_eq!(config.script_path, PathBuf::from("/work/build.sh"));
        assert_eq!(config.log_level, "debug");

        let settings = config.detector_settings();
        assert_eq!(settings.archiver, "ar");
        assert_eq!(settings.library_name, "libtarget.a");
        assert_eq!(settings.cmake_build_dir, "fuzz-build");
    }

    #[test]
    #[serial]
    fn test_logging_config_follows_environment() {
        let _clean = clean_env();
        let _guards = vec![
            EnvGuard::set("AUTOBUILD_LOG_LEVEL", "warn"),
            EnvGuard::set("AUTOBUILD_LOG_JSON", "true"),
        ];

        let logging = AutobuildConfig::default().logging_config();
        assert_eq!(logging.level, tracing::Level::WARN);
        assert!(logging.use_json);
    }

    #[test]
    #[serial]
    fn test_library_name_must_be_archive() {
        let _clean = clean_env();
        let _guard = EnvGuard::set("AUTOBUILD_LIBRARY_NAME", "libfuzz.so");

        let config = AutobuildConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    #[serial]
    fn test_invalid_log_level() {
        let _clean = clean_env();
        let _guard = EnvGuard::set("AUTOBUILD_LOG_LEVEL", "loud");
        assert!(AutobuildConfig::default().validate().is_err());
    }

    #[test]
    #[serial]
    fn test_empty_compile_command_rejected() {
        let _clean = clean_env();
        let mut config = AutobuildConfig::default();
        config.compile_command = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Empty {
                field: "compile_command"
            })
        ));
    }

    #[test]
    #[serial]
    fn test_display_lists_settings() {
        let _clean = clean_env();
        let config = AutobuildConfig::default();
        let display = config.to_string();
        assert!(display.contains("Script Path: /src/build.sh"));
        assert!(display.contains("Library: libfuzz.a"));
        assert!(!display.contains("Heuristic Log"));
    }
}
