mod dependency_report;
mod exposure;
mod usage;

pub use dependency_report::{DependencyReport, DependencyStatus, DependencySummary, ReportStats};
pub use exposure::{ExposureAnalyzer, ExposureResult};
pub use usage::{DependencyUsageAnalyzer, UsageInput, UsageResult};

use crate::dependency::DependencyId;
use crate::graph::ArtifactId;
use serde::Serialize;

/// A problem with one declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The dependency the finding is about
    pub dependency: DependencyId,

    /// The kind of finding
    pub kind: FindingKind,

    /// Severity level
    pub severity: Severity,

    /// Human readable explanation
    pub message: String,

    /// Artifacts the dependency resolved to
    pub artifacts: Vec<ArtifactId>,
}

impl Finding {
    pub fn new(dependency: DependencyId, kind: FindingKind) -> Self {
        let severity = kind.default_severity();
        let message = kind.default_message(&dependency);

        Self {
            dependency,
            kind,
            severity,
            message,
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: Vec<ArtifactId>) -> Self {
        self.artifacts = artifacts;
        self
    }
}

/// Types of dependency findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// Declared directly but never referenced by project classes
    UnusedDirect,

    /// Referenced by project classes but only declared transitively
    UsedUndeclared,

    /// Declared as api but never exposed to consumers
    ApiCouldBeImplementation,

    /// Declared as implementation but exposed to consumers
    ImplementationShouldBeApi,
}

impl FindingKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            FindingKind::UnusedDirect => Severity::Warning,
            FindingKind::UsedUndeclared => Severity::Warning,
            FindingKind::ApiCouldBeImplementation => Severity::Info,
            FindingKind::ImplementationShouldBeApi => Severity::Warning,
        }
    }

    pub fn default_message(&self, dependency: &DependencyId) -> String {
        match self {
            FindingKind::UnusedDirect => {
                format!("Dependency '{}' is declared but never used", dependency)
            }
            FindingKind::UsedUndeclared => {
                format!(
                    "Dependency '{}' is used directly but only declared transitively",
                    dependency
                )
            }
            FindingKind::ApiCouldBeImplementation => {
                format!(
                    "Dependency '{}' is declared as api but not exposed; it could be implementation",
                    dependency
                )
            }
            FindingKind::ImplementationShouldBeApi => {
                format!(
                    "Dependency '{}' is exposed in public signatures; it should be api",
                    dependency
                )
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::UnusedDirect => "DU001",
            FindingKind::UsedUndeclared => "DU002",
            FindingKind::ApiCouldBeImplementation => "DU003",
            FindingKind::ImplementationShouldBeApi => "DU004",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FindingKind::UnusedDirect => "unused dependency",
            FindingKind::UsedUndeclared => "undeclared dependency",
            FindingKind::ApiCouldBeImplementation => "api could be implementation",
            FindingKind::ImplementationShouldBeApi => "implementation should be api",
        }
    }
}

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
