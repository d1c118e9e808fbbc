use super::emit;
use crate::analysis::{DependencyReport, DependencySummary, ExposureResult, ReportStats, Severity, UsageResult};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, report: &DependencyReport) -> Result<()> {
        let json = self.render(report)?;
        emit(&json, self.output_path.as_deref(), "Report")
    }

    pub fn render(&self, report: &DependencyReport) -> Result<String> {
        serde_json::to_string_pretty(&JsonReport::from_report(report)).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    total_findings: usize,
    findings: Vec<JsonFinding<'a>>,
    usage: &'a UsageResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    exposure: Option<&'a ExposureResult>,
    dependencies: &'a [DependencySummary],
    stats: &'a ReportStats,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    code: &'static str,
    kind: &'static str,
    severity: &'static str,
    dependency: &'a str,
    message: &'a str,
    artifacts: Vec<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
    infos: usize,
    used_direct: usize,
    required: usize,
    unused_direct: usize,
    used_undeclared: usize,
}

impl<'a> JsonReport<'a> {
    fn from_report(report: &'a DependencyReport) -> Self {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;

        let findings: Vec<JsonFinding> = report
            .findings
            .iter()
            .map(|finding| {
                match finding.severity {
                    Severity::Error => errors += 1,
                    Severity::Warning => warnings += 1,
                    Severity::Info => infos += 1,
                }

                JsonFinding {
                    code: finding.kind.code(),
                    kind: finding.kind.display_name(),
                    severity: finding.severity.as_str(),
                    dependency: finding.dependency.as_str(),
                    message: &finding.message,
                    artifacts: finding.artifacts.iter().map(|a| a.as_str()).collect(),
                }
            })
            .collect();

        let usage = &report.usage;
        Self {
            version: "1.0",
            total_findings: findings.len(),
            findings,
            usage,
            exposure: report.exposure.as_ref(),
            dependencies: &report.dependencies,
            stats: &report.stats,
            summary: JsonSummary {
                errors,
                warnings,
                infos,
                used_direct: usage.used_direct_dependencies.len(),
                required: usage.required_dependencies.len(),
                unused_direct: usage.unused_direct_dependencies.len(),
                used_undeclared: usage.used_undeclared_dependencies.len(),
            },
        }
    }
}
