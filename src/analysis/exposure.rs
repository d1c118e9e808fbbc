use super::usage::{UsageInput, UsageResult};
use crate::dependency::DependencyId;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Api/implementation classification of direct dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExposureResult {
    /// Dependencies whose types appear in the project's public surface
    pub exposed_dependencies: BTreeSet<DependencyId>,

    /// Used api dependencies that never appear in the public surface
    pub api_could_be_implementation: BTreeSet<DependencyId>,

    /// Non-api direct dependencies that appear in the public surface
    pub implementation_should_be_api: BTreeSet<DependencyId>,
}

/// Finds dependencies that leak through supertypes or public signatures of
/// top-level project classes
#[derive(Debug, Default, Clone, Copy)]
pub struct ExposureAnalyzer;

impl ExposureAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, input: &UsageInput<'_>, usage: &UsageResult) -> ExposureResult {
        let mut result = ExposureResult::default();

        for artifact in input.project.artifacts() {
            let public_classes = match input.project.public_classes_in_artifact(artifact) {
                Ok(classes) => classes,
                Err(e) => {
                    warn!("Skipping exposure check for {}: {}", artifact, e);
                    continue;
                }
            };

            for class in &public_classes {
                for (target, kind) in input.graph.references_from(class) {
                    if !kind.is_exposed() || input.project.contains(target) {
                        continue;
                    }
                    if let Some(id) = input.dependency_of(target) {
                        if result.exposed_dependencies.insert(id.clone()) {
                            debug!("{} exposed by {} ({})", id, class, kind.display_name());
                        }
                    }
                }
            }
        }

        result.api_could_be_implementation = usage
            .used_direct_dependencies
            .iter()
            .filter(|id| input.dependencies.is_api(id) && !result.exposed_dependencies.contains(*id))
            .cloned()
            .collect();

        result.implementation_should_be_api = result
            .exposed_dependencies
            .iter()
            .filter(|id| input.dependencies.is_direct(id) && !input.dependencies.is_api(id))
            .cloned()
            .collect();

        result
    }
}
