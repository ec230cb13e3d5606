//! CLI argument parsing using clap 4.x derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI-powered text analysis from your terminal
///
/// Analyzes typed text or a document (TXT, PDF, DOC, DOCX up to 5 MB)
/// through an OpenAI-compatible endpoint and prints the core message,
/// keywords, insights and an optional tone rewrite.
#[derive(Parser, Debug)]
#[command(name = "textlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Direct text to analyze (alternative to 'analyze' subcommand)
    #[arg(num_args = 1..)]
    pub text: Vec<String>,

    /// Tone to rewrite the text in (see 'textlens tones')
    #[arg(short, long)]
    pub tone: Option<String>,

    /// Analyze the contents of a file instead of typed text
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze text or a document
    Analyze {
        /// The text to analyze
        text: Vec<String>,

        /// Analyze the contents of a file instead of typed text
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Tone to rewrite the text in
        #[arg(short, long)]
        tone: Option<String>,
    },

    /// List the available tones
    Tones,

    /// Show recent log entries
    Logs {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 50)]
        count: usize,
    },
}
