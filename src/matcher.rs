//! Literal signature matching over decoded (or raw-fallback) content.
//!
//! Every pattern is matched as an exact case-insensitive substring. Patterns
//! are regex-escaped before compilation because real malware strings are full
//! of characters that mean something to a pattern engine (`.`, `*`, `(`,
//! `C:\Windows\...`) and must never be interpreted.

use regex::RegexBuilder;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::signatures::SignatureLibrary;

/// One confirmed literal match of a signature pattern.
///
/// Produced at most once per `(category, pattern)` pair per scan, no matter
/// how many times the pattern occurs in the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub pattern: String,
    pub category: String,
}

/// Above this content size the substring fallback for patterns whose regex
/// construction fails is suppressed, trading completeness for bounded
/// latency on very large payloads.
pub const LARGE_CONTENT_BYTES: usize = 50 * 1024 * 1024;

/// Scan content against the library and return findings in library order.
///
/// Categories are visited in declaration order and patterns within each
/// category in declaration order, so identical `(content, library)` inputs
/// always yield identical findings in identical order. The scan never exits
/// early: summary generation downstream needs the complete, stable set.
pub fn scan(content: &str, library: &SignatureLibrary) -> Vec<Finding> {
    let is_large_content = content.len() > LARGE_CONTENT_BYTES;
    let mut recorded: FxHashSet<(&str, &str)> = FxHashSet::default();
    let mut findings = Vec::new();
    // Lowercased haystack for the substring fallback, built at most once.
    let mut lowered: Option<String> = None;

    for category in library.categories() {
        for pattern in &category.patterns {
            let key = (category.category.as_str(), pattern.as_str());
            if recorded.contains(&key) {
                continue;
            }

            let matched = match RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => re.is_match(content),
                Err(e) if is_large_content => {
                    // No fallback above the size guard; skip this pattern
                    // for this file.
                    warn!(
                        category = key.0,
                        pattern = key.1,
                        "match construction failed on large content, pattern skipped: {e}"
                    );
                    continue;
                }
                Err(e) => {
                    debug!(
                        category = key.0,
                        pattern = key.1,
                        "match construction failed, using substring fallback: {e}"
                    );
                    let haystack = lowered.get_or_insert_with(|| content.to_lowercase());
                    haystack.contains(&pattern.to_lowercase())
                }
            };

            if matched {
                recorded.insert(key);
                findings.push(Finding {
                    pattern: pattern.clone(),
                    category: category.category.clone(),
                });
            }
        }
    }

    findings
}
