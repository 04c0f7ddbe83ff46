//! The decode → match → classify → summarize pipeline.
//!
//! One call per file, no shared mutable state: the signature library is an
//! immutable reference and everything else lives for the duration of the
//! call, so callers are free to run files in parallel.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::classifier;
use crate::decoder::{self, DecodeOutcome};
use crate::error::{Result, SiftError};
use crate::matcher::{self, Finding};
use crate::signatures::SignatureLibrary;
use crate::summary::{self, Summarizer};

/// Surfaced when the pipeline fails for any reason other than bad input.
/// Internal details go to the log, not to the caller.
const GENERIC_FAILURE: &str = "An unexpected error occurred while analyzing the file.";

/// Final analysis output for one file.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub file_name: String,
    pub findings: Vec<Finding>,
    pub is_malicious: bool,
    pub summary: String,
    /// Set only for hard input failures; the caller should treat the file
    /// as indeterminate rather than clean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub decoded_successfully: bool,
    /// Digest of the input exactly as submitted to the entry point: the
    /// payload string for `analyze_content`, the raw bytes for
    /// `analyze_bytes`. It identifies the upload, not the decoded view.
    pub sha256: String,
    pub analysis_timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    fn failed(file_name: &str, content: &str, message: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            findings: Vec::new(),
            is_malicious: false,
            summary: message.clone(),
            error: Some(message),
            decoded_successfully: false,
            sha256: sha256_hex(content.as_bytes()),
            analysis_timestamp: Utc::now(),
        }
    }
}

/// Analyze an uploaded payload string (`[<header>,]<base64>`).
///
/// Never returns an error: hard input failures (`MissingInput`,
/// `EmptyContent`) are reported through the result's `error` field with
/// their exact messages, and any other failure is contained and surfaced as
/// one generic message.
pub fn analyze_content(
    file_name: &str,
    content: &str,
    library: &SignatureLibrary,
    summarizer: &dyn Summarizer,
) -> AnalysisResult {
    match run_pipeline(file_name, content, library, summarizer) {
        Ok(result) => result,
        Err(e) if e.is_input_error() => {
            debug!(file_name, "analysis rejected: {e}");
            AnalysisResult::failed(file_name, content, e.to_string())
        }
        Err(e) => {
            error!(file_name, "unexpected analysis failure: {e}");
            AnalysisResult::failed(file_name, content, GENERIC_FAILURE.to_string())
        }
    }
}

/// Analyze bytes that are already decoded (e.g. a file read from disk),
/// skipping the base64 layer but running the identical scan pipeline.
pub fn analyze_bytes(
    file_name: &str,
    bytes: &[u8],
    library: &SignatureLibrary,
    summarizer: &dyn Summarizer,
) -> AnalysisResult {
    if bytes.is_empty() {
        return AnalysisResult::failed(file_name, "", SiftError::EmptyContent.to_string());
    }
    finish(
        file_name,
        DecodeOutcome::from_bytes(bytes),
        sha256_hex(bytes),
        library,
        summarizer,
    )
}

fn run_pipeline(
    file_name: &str,
    content: &str,
    library: &SignatureLibrary,
    summarizer: &dyn Summarizer,
) -> Result<AnalysisResult> {
    if file_name.trim().is_empty() {
        return Err(SiftError::missing_input("file name"));
    }

    let outcome = decoder::decode_payload(content)?;
    Ok(finish(
        file_name,
        outcome,
        sha256_hex(content.as_bytes()),
        library,
        summarizer,
    ))
}

fn finish(
    file_name: &str,
    outcome: DecodeOutcome,
    sha256: String,
    library: &SignatureLibrary,
    summarizer: &dyn Summarizer,
) -> AnalysisResult {
    let findings = matcher::scan(&outcome.text, library);
    let is_malicious = classifier::is_malicious(&findings);
    debug!(
        file_name,
        findings = findings.len(),
        decoded = outcome.decoded_successfully,
        "scan complete"
    );

    let summary = summary::summarize(
        &findings,
        outcome.decoded_successfully,
        outcome.decode_error.as_deref(),
        summarizer,
    );

    AnalysisResult {
        file_name: file_name.to_string(),
        findings,
        is_malicious,
        summary,
        error: None,
        decoded_successfully: outcome.decoded_successfully,
        sha256,
        analysis_timestamp: Utc::now(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
