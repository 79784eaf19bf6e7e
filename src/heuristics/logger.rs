// Heuristic decision log: one JSON line per detector per detection run
use super::{BuildCandidate, DetectorId, MatchSet};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Serialize)]
struct HeuristicEntry<'a> {
    target: &'a Path,
    detector: DetectorId,
    matched: bool,
    matches: &'a MatchSet,
    candidates: Vec<&'a str>,
    timestamp: DateTime<Utc>,
}

pub struct HeuristicLogger {
    writer: Option<Mutex<BufWriter<File>>>,
}

impl HeuristicLogger {
    pub fn new(log_file: Option<PathBuf>) -> Self {
        let writer = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(Mutex::new(BufWriter::new(file))),
                Err(e) => {
                    warn!("Failed to open heuristic log file {:?}: {}", path, e);
                    None
                }
            }
        });

        Self { writer }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn log_detector(
        &self,
        target: &Path,
        detector: DetectorId,
        matches: &MatchSet,
        candidates: &[BuildCandidate],
    ) {
        let Some(writer) = &self.writer else {
            return;
        };

        let entry = HeuristicEntry {
            target,
            detector,
            matched: matches.is_matched(),
            matches,
            candidates: candidates.iter().map(BuildCandidate::label).collect(),
            timestamp: Utc::now(),
        };

        if let Ok(mut writer) = writer.lock() {
            match serde_json::to_string(&entry) {
                Ok(json) => {
                    if let Err(e) = writeln!(writer, "{}", json) {
                        warn!("Failed to write heuristic log entry: {}", e);
                    }
                    if let Err(e) = writer.flush() {
                        warn!("Failed to flush heuristic log: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Failed to serialize heuristic entry for {}: {}", detector, e);
                }
            }
        }

        debug!("Heuristic log: detector={} candidates={}", detector, candidates.len());
    }
}

impl Default for HeuristicLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
