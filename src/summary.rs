//! Summary generation and the deterministic override guard.
//!
//! The user-facing summary combines deterministic evidence with text from an
//! external summarizer. The summarizer is probabilistic and has been observed
//! to over-flag routine cryptographic primitives, so its output passes
//! through a deterministic guard: when the findings are nothing but standard
//! cipher/encoding names, the evidence carries no malicious-context phrasing,
//! and the returned text names no concrete threat, the external text is
//! discarded and a fixed safe message is returned instead. That keeps the
//! final output deterministic and testable independent of the external
//! service.

use anyhow::Result;
use tracing::{debug, warn};

use crate::matcher::Finding;

/// External natural-language summarizer collaborator.
///
/// Injected so the override guard can be unit-tested against canned outputs.
/// One request/response per analysis; a failure is terminal for that summary
/// (no retries) and is resolved with a synthesized fallback.
pub trait Summarizer {
    fn summarize(&self, evidence: &str) -> Result<String>;
}

/// Deterministic local summarizer used by the CLI.
///
/// Keeps the injected-capability seam without a network dependency: it echoes
/// the evidence into prose, so the override guard downstream still decides
/// whether crypto-only matches get reported as threats.
pub struct TemplateSummarizer;

impl Summarizer for TemplateSummarizer {
    fn summarize(&self, evidence: &str) -> Result<String> {
        Ok(format!(
            "The scan matched known signatures in this file:\n{evidence}\
             Review the matched categories before trusting this content."
        ))
    }
}

/// Terms that mark an external summary as naming a concrete threat. If none
/// of these appear, the summary is a candidate for the safe-message override.
const THREAT_VOCABULARY: &[&str] = &[
    "remote access",
    "remote-access",
    "trojan",
    "backdoor",
    "reverse shell",
    "bind shell",
    "mimikatz",
    "meterpreter",
    "credential dump",
    "credential-dump",
    "credential theft",
    "password dump",
    "lsass",
    "infostealer",
    "destructive",
    "wiper",
    "persistence",
    "scheduled task",
    "exploit",
    "shellcode",
    "ransomware",
    "keylog",
    "keystroke",
    "command and control",
    "command-and-control",
    "c2 server",
    "beacon",
    "exfiltrat",
    "botnet",
    "rootkit",
    "malware",
    "malicious",
];

/// Standard cipher and encoding names that routinely appear in benign
/// software. A finding set limited to these is low-confidence by itself.
const BENIGN_CRYPTO_TOKENS: &[&str] = &[
    "aes", "des", "3des", "rsa", "rc4", "blowfish", "twofish", "chacha20", "sha-1", "sha1",
    "sha-256", "sha256", "sha-512", "sha512", "md5", "hmac", "base64", "base32", "hex", "rot13",
    "xor", "tls", "ssl", "pgp", "gpg",
];

/// Phrases in the evidence that tie otherwise-benign tokens to malicious
/// intent. Their presence disables the safe-message override.
const MALICIOUS_CONTEXT_PHRASES: &[&str] = &[
    "obfuscate",
    "obfuscation of known malware",
    "hide command",
    "command and control",
    "command-and-control",
    "conceal",
    "exfiltrat",
    "known malware",
    "evade detection",
    "payload delivery",
];

const NO_FINDINGS_DECODED: &str =
    "No known malicious patterns were found in the decoded content.";

const SAFE_MESSAGE: &str = "No significant threats detected. The matched signatures are \
     standard cryptography or encoding terms that commonly appear in benign software.";

const DECODE_LIMIT_CAVEAT: &str = " Note: the content could not be fully decoded, \
     which limited the analysis.";

/// Produce the final user-facing summary for one analysis.
///
/// With no findings the summarizer is never invoked and a fixed message is
/// returned. With findings, the deterministic evidence block goes to the
/// summarizer and the returned text passes through the override guard. A
/// summarizer failure is caught here and replaced with a synthesized
/// fallback, never propagated.
pub fn summarize(
    findings: &[Finding],
    decoded_successfully: bool,
    decode_error: Option<&str>,
    summarizer: &dyn Summarizer,
) -> String {
    if findings.is_empty() {
        return if decoded_successfully {
            NO_FINDINGS_DECODED.to_string()
        } else {
            let reason = decode_error.unwrap_or("unknown decode failure");
            format!(
                "No known malicious patterns were found in the raw content. The content \
                 could not be decoded ({reason}), so analysis was limited to the \
                 undecoded text."
            )
        };
    }

    let evidence = format_evidence(findings, decoded_successfully, decode_error);

    match summarizer.summarize(&evidence) {
        Ok(text) => apply_override_guard(text, findings, &evidence, decoded_successfully),
        Err(e) => {
            warn!("summarizer call failed, synthesizing fallback summary: {e:#}");
            format!(
                "Automated summary unavailable ({e}). The scan recorded {} finding(s); \
                 review the matched signatures directly.",
                findings.len()
            )
        }
    }
}

/// Format findings into the deterministic evidence block handed to the
/// summarizer: one `- category: pattern` line per finding, followed by a tag
/// line stating whether the scan ran on decoded or raw-fallback content.
pub fn format_evidence(
    findings: &[Finding],
    decoded_successfully: bool,
    decode_error: Option<&str>,
) -> String {
    let mut block = String::new();
    for finding in findings {
        block.push_str(&format!("- {}: {}\n", finding.category, finding.pattern));
    }
    if decoded_successfully {
        block.push_str("Content scanned: decoded form.\n");
    } else {
        let reason = decode_error.unwrap_or("unknown decode failure");
        block.push_str(&format!(
            "Content scanned: raw undecoded form (decode failed: {reason}).\n"
        ));
    }
    block
}

/// The three-condition conjunction that suppresses false-positive noise:
/// no threat vocabulary in the external text, AND only benign crypto/encoding
/// tokens in the findings, AND no malicious-context phrase in the evidence.
/// All three must hold for the external text to be discarded.
fn apply_override_guard(
    external: String,
    findings: &[Finding],
    evidence: &str,
    decoded_successfully: bool,
) -> String {
    let external_lower = external.to_lowercase();
    let names_concrete_threat = THREAT_VOCABULARY
        .iter()
        .any(|term| external_lower.contains(term));

    let only_benign_tokens = findings
        .iter()
        .all(|f| is_benign_crypto_token(&f.pattern));

    let evidence_lower = evidence.to_lowercase();
    let has_malicious_context = MALICIOUS_CONTEXT_PHRASES
        .iter()
        .any(|phrase| evidence_lower.contains(phrase));

    if !names_concrete_threat && only_benign_tokens && !has_malicious_context {
        debug!(
            findings = findings.len(),
            "override guard replaced external summary with fixed safe message"
        );
        let mut message = SAFE_MESSAGE.to_string();
        if !decoded_successfully {
            message.push_str(DECODE_LIMIT_CAVEAT);
        }
        return message;
    }

    external
}

fn is_benign_crypto_token(pattern: &str) -> bool {
    let token = pattern.trim().to_lowercase();
    BENIGN_CRYPTO_TOKENS.contains(&token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;

    fn finding(category: &str, pattern: &str) -> Finding {
        Finding {
            pattern: pattern.to_string(),
            category: category.to_string(),
        }
    }

    /// Canned summarizer that records the evidence it was handed.
    struct Recording {
        seen: RefCell<Vec<String>>,
        reply: String,
    }

    impl Recording {
        fn new(reply: &str) -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
                reply: reply.to_string(),
            }
        }
    }

    impl Summarizer for Recording {
        fn summarize(&self, evidence: &str) -> Result<String> {
            self.seen.borrow_mut().push(evidence.to_string());
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    impl Summarizer for Failing {
        fn summarize(&self, _evidence: &str) -> Result<String> {
            Err(anyhow!("service unavailable"))
        }
    }

    #[test]
    fn test_no_findings_decoded_skips_summarizer() {
        let stub = Recording::new("should never be used");
        let summary = summarize(&[], true, None, &stub);
        assert_eq!(summary, NO_FINDINGS_DECODED);
        assert!(stub.seen.borrow().is_empty());
    }

    #[test]
    fn test_no_findings_raw_fallback_names_decode_error() {
        let stub = Recording::new("should never be used");
        let summary = summarize(&[], false, Some("invalid padding"), &stub);
        assert!(summary.contains("raw content"));
        assert!(summary.contains("invalid padding"));
        assert!(summary.contains("limited"));
        assert!(stub.seen.borrow().is_empty());
    }

    #[test]
    fn test_evidence_block_one_line_per_finding() {
        let findings = vec![
            finding("remote_access", "mimikatz"),
            finding("remote_access", "reverse shell"),
        ];
        let block = format_evidence(&findings, true, None);
        let finding_lines: Vec<&str> = block.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(finding_lines.len(), 2);
        assert_eq!(finding_lines[0], "- remote_access: mimikatz");
        assert_eq!(finding_lines[1], "- remote_access: reverse shell");
        assert!(block.contains("decoded form"));
    }

    #[test]
    fn test_evidence_block_tags_raw_fallback() {
        let findings = vec![finding("cryptography", "AES")];
        let block = format_evidence(&findings, false, Some("bad symbol at offset 4"));
        assert!(block.contains("raw undecoded form"));
        assert!(block.contains("bad symbol at offset 4"));
    }

    #[test]
    fn test_summarizer_receives_evidence() {
        let stub = Recording::new("This file contains the mimikatz credential theft tool.");
        let findings = vec![finding("remote_access", "mimikatz")];
        let summary = summarize(&findings, true, None, &stub);
        assert_eq!(stub.seen.borrow().len(), 1);
        assert!(stub.seen.borrow()[0].contains("- remote_access: mimikatz"));
        assert!(summary.contains("mimikatz"));
    }

    #[test]
    fn test_override_replaces_crypto_only_summary() {
        // External text with no threat vocabulary, findings limited to
        // benign tokens, no malicious context: all three conditions hold.
        let stub = Recording::new("This file references the AES and DES ciphers.");
        let findings = vec![
            finding("cryptography", "AES"),
            finding("cryptography", "DES"),
        ];
        let summary = summarize(&findings, true, None, &stub);
        assert!(summary.starts_with("No significant threats detected"));
    }

    #[test]
    fn test_override_appends_caveat_when_decode_failed() {
        let stub = Recording::new("Uses AES.");
        let findings = vec![finding("cryptography", "AES")];
        let summary = summarize(&findings, false, Some("truncated input"), &stub);
        assert!(summary.starts_with("No significant threats detected"));
        assert!(summary.contains("could not be fully decoded"));
    }

    #[test]
    fn test_threat_vocabulary_blocks_override() {
        let stub = Recording::new("The AES usage here hides ransomware staging.");
        let findings = vec![finding("cryptography", "AES")];
        let summary = summarize(&findings, true, None, &stub);
        assert!(summary.contains("ransomware"));
    }

    #[test]
    fn test_non_benign_finding_blocks_override() {
        let stub = Recording::new("Nothing interesting here.");
        let findings = vec![
            finding("cryptography", "AES"),
            finding("remote_access", "mimikatz"),
        ];
        let summary = summarize(&findings, true, None, &stub);
        assert_eq!(summary, "Nothing interesting here.");
    }

    #[test]
    fn test_malicious_context_in_evidence_blocks_override() {
        // Same benign tokens, but a category that describes C2 hiding.
        let stub = Recording::new("This file references standard ciphers.");
        let findings = vec![finding("hide command and control traffic", "AES")];
        let summary = summarize(&findings, true, None, &stub);
        assert_eq!(summary, "This file references standard ciphers.");
    }

    #[test]
    fn test_summarizer_failure_yields_fallback() {
        let findings = vec![
            finding("remote_access", "mimikatz"),
            finding("remote_access", "reverse shell"),
        ];
        let summary = summarize(&findings, true, None, &Failing);
        assert!(summary.contains("service unavailable"));
        assert!(summary.contains("2 finding(s)"));
    }

    #[test]
    fn test_template_summarizer_composes_with_guard() {
        // The template echoes the evidence, so crypto-only findings are
        // overridden while named tools survive.
        let crypto = vec![finding("cryptography", "AES")];
        let summary = summarize(&crypto, true, None, &TemplateSummarizer);
        assert!(summary.starts_with("No significant threats detected"));

        let tooling = vec![finding("remote_access", "mimikatz")];
        let summary = summarize(&tooling, true, None, &TemplateSummarizer);
        assert!(summary.contains("mimikatz"));
    }
}
