//! Verdict derivation from findings.

use crate::matcher::Finding;

/// A file is malicious exactly when the scan produced at least one finding.
/// No severity weighting; categories are surfaced as-is for the consumer.
pub fn is_malicious(findings: &[Finding]) -> bool {
    !findings.is_empty()
}
