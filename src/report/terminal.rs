use crate::analysis::{DependencyReport, DependencyStatus, DependencySummary, Finding, FindingKind, Severity};
use crate::config::DependencyScope;
use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;

/// Terminal reporter with colored output
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, report: &DependencyReport) -> Result<()> {
        if !report.dependencies.is_empty() {
            self.print_dependencies(&report.dependencies);
        }

        if report.findings.is_empty() {
            println!("{}", "No dependency issues found!".green().bold());
            return Ok(());
        }

        // Group by kind
        let mut by_kind: BTreeMap<FindingKind, Vec<&Finding>> = BTreeMap::new();
        for finding in &report.findings {
            by_kind.entry(finding.kind).or_default().push(finding);
        }

        println!();
        println!(
            "{}",
            format!("Found {} dependency issues:", report.findings.len())
                .yellow()
                .bold()
        );
        println!();

        for (kind, findings) in &by_kind {
            println!("{}", capitalize(kind.display_name()).cyan().bold());
            for finding in findings {
                self.print_finding(finding);
            }
            println!();
        }

        self.print_summary(report);

        Ok(())
    }

    fn print_dependencies(&self, dependencies: &[DependencySummary]) {
        println!("{}", "Dependencies:".bold());
        for summary in dependencies {
            let status = match summary.status {
                DependencyStatus::Used => "used".green(),
                DependencyStatus::Required => "required".blue(),
                DependencyStatus::Unused => "unused".yellow(),
                DependencyStatus::Unreached => "unreached".dimmed(),
            };
            let scope = match summary.scope {
                DependencyScope::Api => "api",
                DependencyScope::Implementation => "implementation",
                DependencyScope::Transitive => "transitive",
            };
            println!(
                "  {:<10} {:<15} {} {}",
                status,
                scope.dimmed(),
                summary.id,
                format!("({}/{} classes reached)", summary.reached_classes, summary.classes).dimmed()
            );
        }
        println!();
    }

    fn print_finding(&self, finding: &Finding) {
        let severity_str = match finding.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };

        println!(
            "  {} [{}] {}",
            severity_str,
            finding.kind.code().dimmed(),
            finding.message
        );

        for artifact in &finding.artifacts {
            println!("    {} {}", "→".dimmed(), artifact.as_str().dimmed());
        }
    }

    fn print_summary(&self, report: &DependencyReport) {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;

        for finding in &report.findings {
            match finding.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => infos += 1,
            }
        }

        println!("{}", "─".repeat(60).dimmed());

        let mut severity_parts = Vec::new();
        if errors > 0 {
            severity_parts.push(format!("{} errors", errors).red().to_string());
        }
        if warnings > 0 {
            severity_parts.push(format!("{} warnings", warnings).yellow().to_string());
        }
        if infos > 0 {
            severity_parts.push(format!("{} info", infos).blue().to_string());
        }
        println!("Summary: {}", severity_parts.join(", "));

        let usage = &report.usage;
        println!(
            "{}",
            format!(
                "{} used directly, {} required, {} unused ({} of {} classes reachable)",
                usage.used_direct_dependencies.len(),
                usage.required_dependencies.len(),
                usage.unused_direct_dependencies.len(),
                report.stats.reachable_classes,
                report.stats.project_classes + report.stats.external_classes
            )
            .dimmed()
        );
        println!();
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
