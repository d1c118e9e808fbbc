//! Artifact discovery: class directories and jars

mod artifact;

pub use artifact::{find_project_outputs, Artifact, ArtifactKind, ArtifactReader, ClassEntry, DiscoveryError};
