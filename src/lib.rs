//! SIFT - Content scanning and verdict engine for uploaded payloads.
//!
//! Given raw uploaded content (possibly base64/data-URI wrapped), sift
//! decodes it, scans the byte stream against a categorized library of
//! literal malicious-pattern signatures, and produces a deterministic,
//! policy-filtered verdict with a human-readable explanation.
//!
//! # Example
//!
//! ```no_run
//! use sift::{analyze_content, SignatureLibrary, TemplateSummarizer};
//!
//! let library = SignatureLibrary::builtin();
//! let result = analyze_content(
//!     "upload.bin",
//!     "data:application/octet-stream;base64,bWltaWthdHo=",
//!     &library,
//!     &TemplateSummarizer,
//! );
//!
//! if result.is_malicious {
//!     for finding in &result.findings {
//!         println!("[{}] {}", finding.category, finding.pattern);
//!     }
//! }
//! println!("{}", result.summary);
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod decoder;
pub mod error;
pub mod matcher;
pub mod output;
pub mod signatures;
pub mod summary;

// Re-export commonly used types at crate root
pub use analysis::{analyze_bytes, analyze_content, AnalysisResult};
pub use decoder::{decode_payload, DecodeOutcome};
pub use error::{Result, SiftError};
pub use matcher::{scan, Finding, LARGE_CONTENT_BYTES};
pub use signatures::{SignatureCategory, SignatureLibrary};
pub use summary::{format_evidence, summarize, Summarizer, TemplateSummarizer};
