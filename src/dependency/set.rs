use super::{identifier_of, DependencyDeclaration, DependencyError, DependencyId};
use std::collections::BTreeSet;
use tracing::warn;

/// Declared dependencies, partitioned by how they were declared.
///
/// `api ⊆ direct ⊆ all`. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    all: BTreeSet<DependencyId>,
    direct: BTreeSet<DependencyId>,
    api: BTreeSet<DependencyId>,
}

impl DependencySet {
    pub fn builder() -> DependencySetBuilder {
        DependencySetBuilder::default()
    }

    /// Every declared dependency, direct and transitive
    pub fn all(&self) -> &BTreeSet<DependencyId> {
        &self.all
    }

    /// Dependencies the project declares itself
    pub fn direct(&self) -> &BTreeSet<DependencyId> {
        &self.direct
    }

    /// Direct dependencies exported to consumers
    pub fn api(&self) -> &BTreeSet<DependencyId> {
        &self.api
    }

    pub fn contains(&self, id: &DependencyId) -> bool {
        self.all.contains(id)
    }

    pub fn is_direct(&self, id: &DependencyId) -> bool {
        self.direct.contains(id)
    }

    pub fn is_api(&self, id: &DependencyId) -> bool {
        self.api.contains(id)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Build a set where every declaration in `all` is direct
pub fn build_dependency_set(
    all: &[DependencyDeclaration],
    api: &[DependencyDeclaration],
) -> Result<DependencySet, DependencyError> {
    DependencySet::builder()
        .direct(all.iter().cloned())
        .api(api.iter().cloned())
        .build()
}

#[derive(Debug, Clone, Default)]
pub struct DependencySetBuilder {
    direct: Vec<DependencyDeclaration>,
    api: Vec<DependencyDeclaration>,
    transitive: Vec<DependencyDeclaration>,
}

impl DependencySetBuilder {
    /// Dependencies declared by the project (any configuration)
    pub fn direct(mut self, dependencies: impl IntoIterator<Item = DependencyDeclaration>) -> Self {
        self.direct.extend(dependencies);
        self
    }

    /// Direct dependencies that are exported; each must also be passed to [`Self::direct`]
    pub fn api(mut self, dependencies: impl IntoIterator<Item = DependencyDeclaration>) -> Self {
        self.api.extend(dependencies);
        self
    }

    /// Dependencies pulled in by other dependencies
    pub fn transitive(mut self, dependencies: impl IntoIterator<Item = DependencyDeclaration>) -> Self {
        self.transitive.extend(dependencies);
        self
    }

    /// Malformed declarations are dropped with a warning. An api declaration
    /// missing from the direct declarations is an error.
    pub fn build(self) -> Result<DependencySet, DependencyError> {
        let mut set = DependencySet::default();

        for dependency in &self.direct {
            match identifier_of(dependency) {
                Some(id) => {
                    set.all.insert(id.clone());
                    set.direct.insert(id);
                }
                None => warn!("Ignoring malformed dependency declaration '{}'", dependency),
            }
        }

        for dependency in &self.api {
            if !self.direct.contains(dependency) {
                return Err(DependencyError::ApiNotDeclared(dependency.clone()));
            }
            if let Some(id) = identifier_of(dependency) {
                set.api.insert(id);
            }
        }

        for dependency in &self.transitive {
            match identifier_of(dependency) {
                Some(id) => {
                    set.all.insert(id);
                }
                None => warn!("Ignoring malformed transitive dependency '{}'", dependency),
            }
        }

        Ok(set)
    }
}
