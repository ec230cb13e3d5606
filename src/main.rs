//! `textlens` - AI-powered text analysis from your terminal
//!
//! This binary is a thin presentation layer over `textlens-core`: it
//! feeds typed text or a file into the intake state, triggers one
//! analysis, and renders whatever state the session ends up in.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use textlens_core::analyzer::Analyzer;
use textlens_core::config::{get_data_dir, Config};
use textlens_core::engine::EngineClient;
use textlens_core::intake::UploadedFile;
use textlens_core::output::OutputFormatter;
use textlens_core::session::AnalysisStatus;
use textlens_core::{Tone, TextLensError};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    textlens_core::logger::init(get_data_dir());

    let formatter = OutputFormatter::new();

    match &cli.command {
        Some(Commands::Analyze { text, file, tone }) => {
            run_analysis(text, file.as_deref(), tone.as_deref(), &formatter).await
        }

        Some(Commands::Tones) => {
            formatter.print_tones();
            Ok(())
        }

        Some(Commands::Logs { count }) => {
            for line in textlens_core::logger::get_recent_logs(*count) {
                println!("{}", line);
            }
            Ok(())
        }

        None => run_analysis(&cli.text, cli.file.as_deref(), cli.tone.as_deref(), &formatter).await,
    }
}

async fn run_analysis(
    text: &[String],
    file: Option<&Path>,
    tone: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let tone = match tone {
        Some(name) => match Tone::from_str(name) {
            Ok(t) => Some(t),
            Err(_) => {
                let names: Vec<&str> = Tone::all().iter().map(|t| t.name()).collect();
                bail!("unknown tone '{}'. Available tones: {}", name, names.join(", "));
            }
        },
        None => None,
    };

    let config = Config::load().context("Failed to load configuration")?;
    let engine = EngineClient::new(config.engine.clone())?;
    let mut analyzer =
        Analyzer::new(Arc::new(engine)).with_request_timeout(config.request_timeout());

    if let Some(path) = file {
        let upload = UploadedFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match analyzer.submit_file(upload) {
            Ok(()) => {
                if let Some(info) = analyzer.uploaded_file_info() {
                    formatter.print_file_info(&info.name, info.size_bytes);
                }
            }
            Err(err) => {
                formatter.print_error(&err.user_message());
                std::process::exit(1);
            }
        }
    } else {
        analyzer.set_typed_text(text.join(" "));
    }

    match analyzer.analyze(tone).await {
        Ok(_) => {}
        Err(err @ TextLensError::EmptyContent) => {
            formatter.print_error(&err.user_message());
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    }

    match analyzer.status() {
        AnalysisStatus::Succeeded => {
            if let Some(report) = analyzer.report() {
                formatter.print_report(&report, tone);
            }
            Ok(())
        }
        AnalysisStatus::Failed => {
            formatter.print_error(
                analyzer
                    .error_message()
                    .as_deref()
                    .unwrap_or("analysis failed"),
            );
            std::process::exit(1);
        }
        // analyze() always completes the request before returning
        status => bail!("unexpected session status after analysis: {:?}", status),
    }
}
