use super::{ArtifactId, ClassName};
use crate::discovery::{Artifact, ArtifactReader, DiscoveryError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("artifact '{0}' was never indexed")]
    UnknownArtifact(ArtifactId),
    #[error("class {class} is defined by both '{first}' and '{second}'")]
    DuplicateClass {
        class: ClassName,
        first: ArtifactId,
        second: ArtifactId,
    },
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// What to do when two artifacts contain the same class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateClassPolicy {
    /// Fail the index build
    #[default]
    Fail,
    /// Keep the owner seen first
    FirstWins,
    /// Move the class to the owner seen last
    LastWins,
}

/// Maps every indexed class to the artifact that contains it.
///
/// Each class has exactly one owner. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    owners: HashMap<ClassName, ArtifactId>,
    by_artifact: BTreeMap<ArtifactId, BTreeSet<ClassName>>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index artifacts with the default reader, failing on duplicate classes
    pub fn build(artifacts: &[Artifact]) -> Result<Self, IndexError> {
        Self::build_with(artifacts, &ArtifactReader::new(), DuplicateClassPolicy::default())
    }

    /// Index artifacts. Artifacts are listed in parallel and inserted in input
    /// order, so duplicate resolution is deterministic.
    pub fn build_with(
        artifacts: &[Artifact],
        reader: &ArtifactReader,
        policy: DuplicateClassPolicy,
    ) -> Result<Self, IndexError> {
        let listed: Vec<(ArtifactId, Vec<ClassName>)> = artifacts
            .par_iter()
            .map(|artifact| -> Result<_, DiscoveryError> {
                Ok((artifact.id.clone(), reader.class_names(artifact)?))
            })
            .collect::<Result<_, _>>()?;

        Self::from_entries(listed, policy)
    }

    /// Index pre-listed artifact contents
    pub fn from_entries(
        entries: impl IntoIterator<Item = (ArtifactId, Vec<ClassName>)>,
        policy: DuplicateClassPolicy,
    ) -> Result<Self, IndexError> {
        let mut index = Self::new();
        for (artifact, classes) in entries {
            index.insert_artifact(artifact, classes, policy)?;
        }
        debug!(
            "Indexed {} classes in {} artifacts",
            index.len(),
            index.by_artifact.len()
        );
        Ok(index)
    }

    fn insert_artifact(
        &mut self,
        artifact: ArtifactId,
        classes: impl IntoIterator<Item = ClassName>,
        policy: DuplicateClassPolicy,
    ) -> Result<(), IndexError> {
        self.by_artifact.entry(artifact.clone()).or_default();

        for class in classes {
            if let Some(previous) = self.owners.get(&class) {
                if *previous == artifact {
                    continue;
                }
                match policy {
                    DuplicateClassPolicy::Fail => {
                        return Err(IndexError::DuplicateClass {
                            class,
                            first: previous.clone(),
                            second: artifact,
                        });
                    }
                    DuplicateClassPolicy::FirstWins => {
                        warn!("{} in '{}' shadowed by '{}'", class, artifact, previous);
                        continue;
                    }
                    DuplicateClassPolicy::LastWins => {
                        warn!("{} in '{}' shadowed by '{}'", class, previous, artifact);
                        if let Some(previous_classes) = self.by_artifact.get_mut(previous) {
                            previous_classes.remove(&class);
                        }
                    }
                }
            }

            self.owners.insert(class.clone(), artifact.clone());
            if let Some(owned) = self.by_artifact.get_mut(&artifact) {
                owned.insert(class);
            }
        }

        Ok(())
    }

    /// Every class in the given artifact
    pub fn classes_in_artifact(&self, artifact: &ArtifactId) -> Result<&BTreeSet<ClassName>, IndexError> {
        self.by_artifact
            .get(artifact)
            .ok_or_else(|| IndexError::UnknownArtifact(artifact.clone()))
    }

    /// Top-level (non-nested) classes in the given artifact
    pub fn public_classes_in_artifact(&self, artifact: &ArtifactId) -> Result<BTreeSet<ClassName>, IndexError> {
        Ok(self
            .classes_in_artifact(artifact)?
            .iter()
            .filter(|class| !class.is_nested())
            .cloned()
            .collect())
    }

    /// Check classes this index shares with `other`.
    ///
    /// Under [`DuplicateClassPolicy::Fail`] the first shared class (in name
    /// order) is an error. Otherwise shared classes stay owned by `self` and
    /// their count is returned.
    pub fn check_shadowing(&self, other: &ClassIndex, policy: DuplicateClassPolicy) -> Result<usize, IndexError> {
        let mut shared: Vec<(&ClassName, &ArtifactId, &ArtifactId)> = self
            .owners
            .iter()
            .filter_map(|(class, owner)| Some((class, owner, other.find_owner(class)?)))
            .collect();
        shared.sort();

        if policy == DuplicateClassPolicy::Fail {
            if let Some((class, first, second)) = shared.first() {
                return Err(IndexError::DuplicateClass {
                    class: (*class).clone(),
                    first: (*first).clone(),
                    second: (*second).clone(),
                });
            }
        }
        for (class, owner, shadowed) in &shared {
            warn!("{} in '{}' shadowed by '{}'", class, shadowed, owner);
        }
        Ok(shared.len())
    }

    /// Owning artifact, `None` for platform or otherwise unindexed classes
    pub fn find_owner(&self, class: &ClassName) -> Option<&ArtifactId> {
        self.owners.get(class)
    }

    pub fn contains(&self, class: &ClassName) -> bool {
        self.owners.contains_key(class)
    }

    /// Indexed artifacts, sorted
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactId> {
        self.by_artifact.keys()
    }

    /// All indexed classes, grouped by artifact
    pub fn classes(&self) -> impl Iterator<Item = &ClassName> {
        self.by_artifact.values().flatten()
    }

    /// Number of indexed classes
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
