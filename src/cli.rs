use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Content scanning and verdict engine for uploaded payloads")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (json, terminal)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Write output to file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan one or more payload files
    Scan {
        /// Payload files to scan, in submission order
        #[arg(required = true)]
        paths: Vec<String>,

        /// Signature library YAML file (defaults to the built-in library)
        #[arg(long)]
        rules: Option<String>,

        /// Treat inputs as already-decoded bytes instead of base64 payloads
        #[arg(long)]
        raw: bool,

        /// Exit with an error if any scanned file is malicious
        #[arg(long)]
        error_if_malicious: bool,
    },

    /// Print the signature library that would be used for scanning
    Rules {
        /// Signature library YAML file (defaults to the built-in library)
        #[arg(long)]
        rules: Option<String>,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output for machine consumption
    Json,
    /// Human-readable terminal output
    Terminal,
}
