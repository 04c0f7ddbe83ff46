//! Signature library: ordered categories of literal malicious-content
//! patterns.
//!
//! The library is plain data supplied from outside the scan core (a YAML
//! file or the compiled-in default). Patterns are literal substrings, never
//! a pattern language, and are matched case-insensitively. Category order
//! and pattern order in the source file are the canonical scan order, which
//! makes finding order deterministic and testable.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, SiftError};

/// Signature library shipped with the binary.
const DEFAULT_RULES: &str = include_str!("../rules/default.yaml");

/// One category of signatures (e.g. "credential_theft") with its patterns
/// in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureCategory {
    pub category: String,
    pub patterns: Vec<String>,
}

/// Ordered mapping from category to literal patterns.
///
/// Immutable at scan time; shared by reference across files with no locking.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SignatureLibrary {
    categories: Vec<SignatureCategory>,
}

impl SignatureLibrary {
    pub fn new(categories: Vec<SignatureCategory>) -> Self {
        Self { categories }
    }

    /// Parse a library from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| SiftError::rule_loading(format!("invalid YAML: {e}")))
    }

    /// Load a library from a YAML file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SiftError::path_not_found(path));
        }
        let text = fs::read_to_string(path)?;
        serde_yaml::from_str(&text)
            .map_err(|e| SiftError::rule_loading(format!("{}: {e}", path.display())))
    }

    /// The compiled-in default library (rules/default.yaml).
    pub fn builtin() -> Self {
        // The default rules file is validated by test, so a parse failure
        // here is a build defect, not a runtime condition.
        Self::from_yaml_str(DEFAULT_RULES)
            .context("built-in signature library is malformed")
            .unwrap()
    }

    pub fn categories(&self) -> &[SignatureCategory] {
        &self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.categories.iter().map(|c| c.patterns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.patterns.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_library_parses() {
        let lib = SignatureLibrary::builtin();
        assert!(!lib.is_empty());
        assert!(lib.category_count() >= 5);
    }

    #[test]
    fn test_yaml_order_is_preserved() {
        let yaml = r#"
- category: first
  patterns:
    - alpha
    - beta
- category: second
  patterns:
    - gamma
"#;
        let lib = SignatureLibrary::from_yaml_str(yaml).unwrap();
        assert_eq!(lib.category_count(), 2);
        assert_eq!(lib.categories()[0].category, "first");
        assert_eq!(lib.categories()[0].patterns, vec!["alpha", "beta"]);
        assert_eq!(lib.categories()[1].category, "second");
    }

    #[test]
    fn test_invalid_yaml_is_rule_loading_error() {
        let err = SignatureLibrary::from_yaml_str("{ not: [valid").unwrap_err();
        assert!(matches!(err, SiftError::RuleLoading { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = SignatureLibrary::from_file(Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(matches!(err, SiftError::PathNotFound { .. }));
    }
}
