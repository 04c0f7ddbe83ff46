use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sift::cli::{Args, Command, OutputFormat};
use sift::output;
use sift::{analyze_bytes, analyze_content, AnalysisResult, SignatureLibrary, TemplateSummarizer};

fn main() -> Result<()> {
    let args = Args::parse();

    // Use RUST_LOG env var if set, otherwise use the verbose flag
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("sift=debug")
    } else {
        EnvFilter::new("sift=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", args.verbose);

    // Status info never goes to stdout
    eprintln!("sift v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Scan {
            ref paths,
            ref rules,
            raw,
            error_if_malicious,
        } => {
            let library = load_library(rules.as_deref())?;
            eprintln!(
                "Loaded {} signature patterns in {} categories",
                library.pattern_count(),
                library.category_count()
            );

            let results = scan_paths(paths, &library, raw);
            render(&results, &args.format, args.output.as_deref())?;

            let malicious = results.iter().filter(|r| r.is_malicious).count();
            let errored = results.iter().filter(|r| r.error.is_some()).count();
            eprintln!(
                "\nScanned {} file(s): {} malicious, {} error(s)",
                results.len(),
                malicious,
                errored
            );

            if error_if_malicious && malicious > 0 {
                anyhow::bail!("{malicious} file(s) matched malicious signatures");
            }
        }
        Command::Rules { ref rules } => {
            let library = load_library(rules.as_deref())?;
            for category in library.categories() {
                println!("{}:", category.category);
                for pattern in &category.patterns {
                    println!("  - {pattern}");
                }
            }
        }
    }

    Ok(())
}

fn load_library(rules: Option<&str>) -> Result<SignatureLibrary> {
    match rules {
        Some(path) => SignatureLibrary::from_file(Path::new(path))
            .with_context(|| format!("failed to load signature library from {path}")),
        None => Ok(SignatureLibrary::builtin()),
    }
}

/// Scan files one at a time in submission order. Each analysis is
/// independent; a per-file problem becomes that file's result, never a
/// reason to stop the batch.
fn scan_paths(paths: &[String], library: &SignatureLibrary, raw: bool) -> Vec<AnalysisResult> {
    let summarizer = TemplateSummarizer;
    let mut results = Vec::with_capacity(paths.len());

    for path in paths {
        debug!(path = path.as_str(), raw, "scanning file");
        let result = if raw {
            match fs::read(path) {
                Ok(bytes) => analyze_bytes(path, &bytes, library, &summarizer),
                Err(e) => read_failure(path, &e),
            }
        } else {
            match fs::read_to_string(path) {
                // Payload files commonly end with a trailing newline that is
                // not part of the base64 text.
                Ok(content) => analyze_content(path, content.trim_end(), library, &summarizer),
                Err(e) => read_failure(path, &e),
            }
        };
        results.push(result);
    }

    results
}

fn read_failure(path: &str, e: &std::io::Error) -> AnalysisResult {
    let message = format!("cannot read file: {e}");
    AnalysisResult {
        file_name: path.to_string(),
        findings: Vec::new(),
        is_malicious: false,
        summary: message.clone(),
        error: Some(message),
        decoded_successfully: false,
        sha256: String::new(),
        analysis_timestamp: chrono::Utc::now(),
    }
}

fn render(results: &[AnalysisResult], format: &OutputFormat, output_path: Option<&str>) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => output::format_json(results)?,
        OutputFormat::Terminal => results
            .iter()
            .map(output::format_terminal)
            .collect::<Vec<_>>()
            .join("\n"),
    };
    output::write_output(&rendered, output_path)
}
