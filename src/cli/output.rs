//! Output formatting for candidates, scripts and evaluation reports
//!
//! JSON and YAML are serialized straight from the domain types. The human
//! format is meant for a terminal.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::artifacts::{ArtifactKind, ArtifactSet};
use crate::evaluate::EvaluationReport;
use crate::heuristics::BuildCandidate;
use crate::script::MaterializedScript;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\
                    \u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\
                    \u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\
                    \u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_candidates(&self, candidates: &[BuildCandidate]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&candidates, "build candidates"),
            OutputFormat::Yaml => to_yaml(&candidates, "build candidates"),
            OutputFormat::Human => Ok(self.candidates_human(candidates)),
        }
    }

    pub fn format_scripts(&self, scripts: &[MaterializedScript]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&scripts, "build scripts"),
            OutputFormat::Yaml => to_yaml(&scripts, "build scripts"),
            OutputFormat::Human => Ok(self.scripts_human(scripts)),
        }
    }

    pub fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report, "evaluation report"),
            OutputFormat::Yaml => to_yaml(report, "evaluation report"),
            OutputFormat::Human => Ok(self.report_human(report)),
        }
    }

    fn candidates_human(&self, candidates: &[BuildCandidate]) -> String {
        let mut output = String::new();
        if candidates.is_empty() {
            output.push_str("\u{26A0} No build system recognized\n");
            return output;
        }

        output.push_str(&format!("\u{2713} {} build candidates\n", candidates.len()));
        output.push_str(RULE);
        output.push_str("\n\n");

        for (i, candidate) in candidates.iter().enumerate() {
            output.push_str(&format!("[{}] {}\n", i, candidate.label()));
            let commands = candidate.commands();
            for (j, command) in commands.iter().enumerate() {
                let connector = if j + 1 == commands.len() {
                    "\u{2514}"
                } else {
                    "\u{251C}"
                };
                // Multi-line steps keep their continuation lines aligned
                let command = command.replace('\n', "\n   ");
                output.push_str(&format!("{}\u{2500} {}\n", connector, command));
            }
            output.push('\n');
        }

        output
    }

    fn scripts_human(&self, scripts: &[MaterializedScript]) -> String {
        let mut output = String::new();
        for script in scripts {
            output.push_str(&format!(
                "# [{}] {} -> {}\n",
                script.index,
                script.label(),
                script.workdir.display()
            ));
            output.push_str(&script.script);
            output.push('\n');
        }
        output
    }

    fn report_human(&self, report: &EvaluationReport) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Build Evaluation ({} of {} succeeded)\n",
            report.succeeded(),
            report.len()
        ));
        output.push_str(RULE);
        output.push_str("\n\n");

        for (workdir, entry) in report.in_order() {
            let mark = if entry.outcome.is_success() {
                "\u{2713}"
            } else {
                "\u{2717}"
            };
            output.push_str(&format!("{} [{}] {}\n", mark, entry.index, entry.label));
            output.push_str(&format!("\u{251C}\u{2500} Workdir: {}\n", workdir.display()));
            output.push_str(&format!("\u{251C}\u{2500} Outcome: {}\n", entry.outcome));
            output.push_str(&format!(
                "\u{2514}\u{2500} New artifacts: {}\n",
                summarize(&entry.new_artifacts)
            ));
            for kind in ArtifactKind::ALL {
                for path in entry.new_artifacts.get(kind) {
                    output.push_str(&format!("     {} {}\n", kind, path.display()));
                }
            }
            for err in &entry.scan_errors {
                output.push_str(&format!("   \u{26A0} Unreadable: {}\n", err));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "Generated at {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output
    }
}

fn summarize(set: &ArtifactSet) -> String {
    if set.is_empty() {
        return "(none)".to_string();
    }
    ArtifactKind::ALL
        .iter()
        .map(|&kind| format!("{} {}", set.get(kind).count(), kind))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}
