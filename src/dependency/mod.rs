//! Dependency identity
//!
//! Turns dependency coordinates into canonical identifiers, partitions the
//! declared dependencies, and maps artifacts to the dependency they belong to.

mod identity;
mod set;

pub use identity::{identifier_of, DependencyDeclaration, DependencyId};
pub use set::{build_dependency_set, DependencySet, DependencySetBuilder};

use crate::discovery::Artifact;
use crate::graph::ArtifactId;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("invalid dependency coordinate '{0}' (expected group:name:version)")]
    InvalidCoordinate(String),
    #[error("api dependency '{0}' is not among the declared dependencies")]
    ApiNotDeclared(DependencyDeclaration),
}

/// Maps artifacts to the dependency identifier they were resolved from
#[derive(Debug, Clone, Default)]
pub struct ArtifactCoordinates {
    by_artifact: HashMap<ArtifactId, DependencyId>,
    declarations: HashMap<DependencyId, DependencyDeclaration>,
}

impl ArtifactCoordinates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts without a coordinate, or with one that cannot be
    /// canonicalized, are left unmapped.
    pub fn from_artifacts<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> Self {
        let mut coordinates = Self::new();
        for artifact in artifacts {
            if let Some(coordinate) = &artifact.coordinate {
                coordinates.insert(artifact.id.clone(), coordinate.clone());
            }
        }
        coordinates
    }

    /// Returns false if the declaration has no identifier
    pub fn insert(&mut self, artifact: ArtifactId, declaration: DependencyDeclaration) -> bool {
        let Some(id) = identifier_of(&declaration) else {
            warn!("Artifact {} has malformed coordinate '{}'", artifact, declaration);
            return false;
        };
        self.by_artifact.insert(artifact, id.clone());
        self.declarations.insert(id, declaration);
        true
    }

    pub fn dependency_of(&self, artifact: &ArtifactId) -> Option<&DependencyId> {
        self.by_artifact.get(artifact)
    }

    pub fn declaration(&self, id: &DependencyId) -> Option<&DependencyDeclaration> {
        self.declarations.get(id)
    }

    /// Artifacts resolved from the given dependency, sorted
    pub fn artifacts_of(&self, id: &DependencyId) -> Vec<&ArtifactId> {
        let mut artifacts: Vec<_> = self
            .by_artifact
            .iter()
            .filter(|(_, dep)| *dep == id)
            .map(|(artifact, _)| artifact)
            .collect();
        artifacts.sort();
        artifacts
    }

    pub fn len(&self) -> usize {
        self.by_artifact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_artifact.is_empty()
    }
}
