//! Output formatting module
//!
//! Renders analysis reports, upload details and errors with colored
//! output. Pure consumer of the orchestrator's snapshots; owns no
//! lifecycle logic.

use crate::engine::AnalysisReport;
use crate::tone::Tone;
use console::Style;

/// Output formatter for CLI results
pub struct OutputFormatter {
    blue: Style,
    green: Style,
    yellow: Style,
    red: Style,
    bold: Style,
    dim: Style,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self {
            blue: Style::new().blue(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a full analysis report
    pub fn print_report(&self, report: &AnalysisReport, tone: Option<Tone>) {
        println!();

        if !report.moral.is_empty() {
            println!("{}", self.bold.apply_to("Core Message"));
            println!("  {}", report.moral);
            println!();
        }

        if !report.keywords.is_empty() {
            println!("{}", self.bold.apply_to("Keywords"));
            println!("  {}", self.blue.apply_to(report.keywords.join(", ")));
            println!();
        }

        if let Some(rewrite) = &report.tone_transformed {
            let heading = match tone {
                Some(t) => format!("Rewritten ({})", t),
                None => "Rewritten".to_string(),
            };
            println!("{}", self.bold.apply_to(heading));
            println!("  {}", rewrite);
            println!();
        }

        if !report.insights.is_empty() {
            println!("{}", self.bold.apply_to("Insights"));
            for insight in &report.insights {
                println!("  {} {}", self.green.apply_to("•"), insight);
            }
            println!();
        }

        if report.is_empty() {
            println!(
                "{}",
                self.yellow.apply_to("The engine returned an empty report.")
            );
        }
    }

    /// Print the accepted upload's metadata
    pub fn print_file_info(&self, name: &str, size_bytes: u64) {
        println!(
            "{} {} {}",
            self.dim.apply_to("Analyzing"),
            self.bold.apply_to(name),
            self.dim
                .apply_to(format!("({:.2} MB)", size_bytes as f64 / 1024.0 / 1024.0))
        );
    }

    /// Print a user-facing error message
    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", self.red.apply_to("Error:"), message);
    }

    /// Print the selectable tone list
    pub fn print_tones(&self) {
        println!("{}", self.bold.apply_to("Available tones:"));
        for tone in Tone::all() {
            println!("  {}", self.blue.apply_to(tone.name()));
        }
    }
}
