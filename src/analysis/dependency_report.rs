use super::{ExposureResult, Finding, FindingKind, UsageInput, UsageResult};
use crate::config::{Config, DependencyScope};
use crate::dependency::DependencyId;
use crate::graph::{ArtifactId, ClassName};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// How a declared dependency was found to be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyStatus {
    /// Referenced by project classes
    Used,
    /// Reachable only through other dependencies
    Required,
    /// Declared directly, never referenced by project classes
    Unused,
    /// Transitive and not reachable at all
    Unreached,
}

impl DependencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyStatus::Used => "used",
            DependencyStatus::Required => "required",
            DependencyStatus::Unused => "unused",
            DependencyStatus::Unreached => "unreached",
        }
    }
}

/// Per-dependency view of one analysis
#[derive(Debug, Clone, Serialize)]
pub struct DependencySummary {
    pub id: DependencyId,
    pub scope: DependencyScope,
    pub status: DependencyStatus,
    /// Classes in the dependency's artifacts
    pub classes: usize,
    /// Of those, classes reachable from the project
    pub reached_classes: usize,
    pub artifacts: Vec<ArtifactId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportStats {
    pub project_classes: usize,
    pub external_classes: usize,
    pub reachable_classes: usize,
    pub references: usize,
}

/// Usage, exposure and findings of one run, ready for reporting
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub usage: UsageResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<ExposureResult>,
    pub dependencies: Vec<DependencySummary>,
    pub findings: Vec<Finding>,
    pub stats: ReportStats,
}

impl DependencyReport {
    pub fn build(
        input: &UsageInput<'_>,
        usage: UsageResult,
        reachable: &HashSet<&ClassName>,
        exposure: Option<ExposureResult>,
    ) -> Self {
        let mut reached_counts: HashMap<&DependencyId, usize> = HashMap::new();
        for class in reachable {
            if input.project.contains(class) {
                continue;
            }
            if let Some(id) = input.dependency_of(class) {
                *reached_counts.entry(id).or_default() += 1;
            }
        }

        let dependencies = input
            .dependencies
            .all()
            .iter()
            .map(|id| {
                let artifacts: Vec<ArtifactId> = input
                    .coordinates
                    .artifacts_of(id)
                    .into_iter()
                    .cloned()
                    .collect();
                let classes = artifacts
                    .iter()
                    .filter_map(|artifact| input.external.classes_in_artifact(artifact).ok())
                    .map(|classes| classes.len())
                    .sum();

                DependencySummary {
                    id: id.clone(),
                    scope: scope_of(input, id),
                    status: status_of(&usage, id),
                    classes,
                    reached_classes: reached_counts.get(id).copied().unwrap_or(0),
                    artifacts,
                }
            })
            .collect();

        let mut findings = Vec::new();
        let mut push = |ids: &BTreeSet<DependencyId>, kind: FindingKind| {
            for id in ids {
                let artifacts = input.coordinates.artifacts_of(id).into_iter().cloned().collect();
                findings.push(Finding::new(id.clone(), kind).with_artifacts(artifacts));
            }
        };
        push(&usage.unused_direct_dependencies, FindingKind::UnusedDirect);
        push(&usage.used_undeclared_dependencies, FindingKind::UsedUndeclared);
        if let Some(exposure) = &exposure {
            push(&exposure.api_could_be_implementation, FindingKind::ApiCouldBeImplementation);
            push(&exposure.implementation_should_be_api, FindingKind::ImplementationShouldBeApi);
        }

        let stats = ReportStats {
            project_classes: input.project.len(),
            external_classes: input.external.len(),
            reachable_classes: reachable.len(),
            references: input.graph.reference_count(),
        };

        Self {
            usage,
            exposure,
            dependencies,
            findings,
            stats,
        }
    }

    /// Drop findings about dependencies matching the retain patterns
    pub fn apply_retain(&mut self, config: &Config) -> usize {
        let before = self.findings.len();
        self.findings.retain(|finding| !config.should_retain(&finding.dependency));
        let removed = before - self.findings.len();
        if removed > 0 {
            debug!("Retained {} findings", removed);
        }
        removed
    }

    /// Keep only the findings matching `keep`
    pub fn filter_findings(&mut self, keep: impl FnMut(&Finding) -> bool) {
        self.findings.retain(keep);
    }

    /// Whether any unused direct dependency is still reported
    pub fn has_unused(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.kind == FindingKind::UnusedDirect)
    }

    pub fn summary(&self, id: &DependencyId) -> Option<&DependencySummary> {
        self.dependencies.iter().find(|summary| &summary.id == id)
    }
}

fn scope_of(input: &UsageInput<'_>, id: &DependencyId) -> DependencyScope {
    if input.dependencies.is_api(id) {
        DependencyScope::Api
    } else if input.dependencies.is_direct(id) {
        DependencyScope::Implementation
    } else {
        DependencyScope::Transitive
    }
}

fn status_of(usage: &UsageResult, id: &DependencyId) -> DependencyStatus {
    if usage.used_direct_dependencies.contains(id) || usage.used_undeclared_dependencies.contains(id) {
        DependencyStatus::Used
    } else if usage.unused_direct_dependencies.contains(id) {
        DependencyStatus::Unused
    } else if usage.required_dependencies.contains(id) {
        DependencyStatus::Required
    } else {
        DependencyStatus::Unreached
    }
}
