//! Output formatting and reporting.
//!
//! Two modes, mirroring the scan results without altering their semantics:
//! - Human-readable terminal output with colors
//! - JSON output for machine consumption

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

use crate::analysis::AnalysisResult;

/// Render one result for the terminal.
pub fn format_terminal(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let verdict = if result.error.is_some() {
        "ERROR".yellow().bold()
    } else if result.is_malicious {
        "MALICIOUS".red().bold()
    } else {
        "CLEAN".green().bold()
    };
    out.push_str(&format!("{} {}\n", verdict, result.file_name.bold()));

    if let Some(error) = &result.error {
        out.push_str(&format!("  {} {}\n", "error:".yellow(), error));
        return out;
    }

    if !result.decoded_successfully {
        out.push_str(&format!(
            "  {}\n",
            "scanned raw payload (decode failed)".yellow()
        ));
    }

    for finding in &result.findings {
        out.push_str(&format!(
            "  [{}] {}\n",
            finding.category.cyan(),
            finding.pattern
        ));
    }

    out.push_str(&format!("  {}\n", result.summary.dimmed()));
    out.push_str(&format!("  sha256: {}\n", result.sha256.dimmed()));
    out
}

/// Render all results as a JSON array.
pub fn format_json(results: &[AnalysisResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("failed to serialize results")
}

/// Write rendered output to a file, or stdout when no path is given.
pub fn write_output(rendered: &str, output_path: Option<&str>) -> Result<()> {
    match output_path {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write {path}"))?;
            eprintln!("Results written to {path}");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
