mod terminal;
mod json;
mod sarif;

pub use terminal::TerminalReporter;
pub use json::JsonReporter;
pub use sarif::SarifReporter;

use crate::analysis::DependencyReport;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Sarif,
}

impl ReportFormat {
    /// Parse the config file spelling; unknown names fall back to terminal
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => ReportFormat::Json,
            "sarif" => ReportFormat::Sarif,
            _ => ReportFormat::Terminal,
        }
    }
}

/// Reporter for outputting dependency analysis results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    pub fn report(&self, report: &DependencyReport) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => {
                let reporter = TerminalReporter::new();
                reporter.report(report)
            }
            ReportFormat::Json => {
                let reporter = JsonReporter::new(self.output_path.clone());
                reporter.report(report)
            }
            ReportFormat::Sarif => {
                let reporter = SarifReporter::new(self.output_path.clone());
                reporter.report(report)
            }
        }
    }
}

/// Write rendered output to a file, or stdout when no path is given
fn emit(rendered: &str, output_path: Option<&Path>, label: &str) -> Result<()> {
    if let Some(path) = output_path {
        std::fs::write(path, rendered).into_diagnostic()?;
        println!("{} written to: {}", label, path.display());
    } else {
        println!("{}", rendered);
    }
    Ok(())
}
