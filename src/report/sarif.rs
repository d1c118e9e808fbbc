use super::emit;
use crate::analysis::{DependencyReport, FindingKind, Severity};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// SARIF reporter for CI/CD integration (GitHub, Azure DevOps, etc.)
pub struct SarifReporter {
    output_path: Option<PathBuf>,
}

impl SarifReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, report: &DependencyReport) -> Result<()> {
        let json = self.render(report)?;
        emit(&json, self.output_path.as_deref(), "SARIF report")
    }

    pub fn render(&self, report: &DependencyReport) -> Result<String> {
        serde_json::to_string_pretty(&SarifReport::from_report(report)).into_diagnostic()
    }
}

/// SARIF 2.1.0 format
#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
struct SarifRule {
    id: &'static str,
    name: &'static str,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: &'static str,
    level: &'static str,
    message: SarifMessage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locations: Vec<SarifLocation>,
    #[serde(rename = "partialFingerprints")]
    partial_fingerprints: SarifFingerprints,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
struct SarifFingerprints {
    dependency: String,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

impl SarifReport {
    fn from_report(report: &DependencyReport) -> Self {
        let rules = [
            (FindingKind::UnusedDirect, "unused-dependency", "Declared dependency is never used"),
            (
                FindingKind::UsedUndeclared,
                "undeclared-dependency",
                "Dependency is used directly but only declared transitively",
            ),
            (
                FindingKind::ApiCouldBeImplementation,
                "api-could-be-implementation",
                "Api dependency is not exposed to consumers",
            ),
            (
                FindingKind::ImplementationShouldBeApi,
                "implementation-should-be-api",
                "Implementation dependency is exposed to consumers",
            ),
        ]
        .into_iter()
        .map(|(kind, name, description)| SarifRule {
            id: kind.code(),
            name,
            short_description: SarifMessage {
                text: description.to_string(),
            },
            default_configuration: SarifConfiguration {
                level: sarif_level(kind.default_severity()),
            },
        })
        .collect();

        let results: Vec<SarifResult> = report
            .findings
            .iter()
            .map(|finding| SarifResult {
                rule_id: finding.kind.code(),
                level: sarif_level(finding.severity),
                message: SarifMessage {
                    text: finding.message.clone(),
                },
                locations: finding
                    .artifacts
                    .iter()
                    .map(|artifact| SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: artifact.as_str().replace('\\', "/"),
                            },
                        },
                    })
                    .collect(),
                partial_fingerprints: SarifFingerprints {
                    dependency: finding.dependency.as_str().to_string(),
                },
            })
            .collect();

        SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "depusage",
                        version: env!("CARGO_PKG_VERSION"),
                        rules,
                    },
                },
                results,
            }],
        }
    }
}
