//! Structured logging setup for autobuild
//!
//! Initializes a `tracing` subscriber once per process. Console output is the
//! default; JSON output suits log collection when autobuild runs inside a
//! build farm.
//!
//! # Example
//!
//! ```no_run
//! use autobuild::util::logging;
//! use tracing::info;
//!
//! logging::init_from_env();
//! info!(target_dir = "/src/project", "Starting detection");
//! ```

use std::env;
use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for autobuild's own events
    pub level: Level,

    pub use_json: bool,

    /// Include the module target (e.g., autobuild::heuristics)
    pub include_target: bool,

    /// Include file and line number
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with full metadata, for log collectors
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            ..Default::default()
        }
    }
}

/// Parses a level name case-insensitively, falling back to INFO
///
/// ```
/// use autobuild::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("bogus"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber. Only the first call has any effect.
///
/// `config.level` applies to the `autobuild` target. Other crates log at WARN
/// unless `RUST_LOG` says otherwise.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let directive: Directive = format!("autobuild={}", config.level)
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        let mut filter = EnvFilter::from_default_env().add_directive(directive);

        if env::var("RUST_LOG").is_err() {
            filter = filter.add_directive(LevelFilter::WARN.into());
        }

        // Logs go to stderr so stdout stays clean for reports and scripts
        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Reads `AUTOBUILD_LOG_LEVEL` and `AUTOBUILD_LOG_JSON` through
/// [`AutobuildConfig`](crate::config::AutobuildConfig); `RUST_LOG` still
/// filters everything else.
pub fn init_from_env() {
    init_logging(crate::config::AutobuildConfig::default().logging_config());
}

pub fn with_level(level_str: &str) {
    init_logging(LoggingConfig::with_level(parse_level(level_str)));
}
