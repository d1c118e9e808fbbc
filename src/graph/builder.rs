use super::{ArtifactId, ClassGraph, ClassName};
use crate::discovery::{Artifact, ArtifactReader, DiscoveryError};
use crate::parser::{ClassFileParser, MalformedClassError, ParsedClass};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("malformed class {class} in '{artifact}': {source}")]
    MalformedClass {
        artifact: ArtifactId,
        class: ClassName,
        #[source]
        source: MalformedClassError,
    },
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Builder for constructing the class graph one artifact at a time
pub struct ClassGraphBuilder {
    /// The graph being built
    graph: ClassGraph,

    reader: ArtifactReader,

    parser: ClassFileParser,
}

impl ClassGraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: ClassGraph::new(),
            reader: ArtifactReader::new(),
            parser: ClassFileParser::new(),
        }
    }

    pub fn with_reader(mut self, reader: ArtifactReader) -> Self {
        self.reader = reader;
        self
    }

    /// Read every class of an artifact and add it to the graph
    pub fn process_artifact(&mut self, artifact: &Artifact) -> Result<(), GraphError> {
        debug!("Reading artifact: {}", artifact.path.display());

        for (name, parsed) in scan_artifact(&self.reader, &self.parser, artifact)? {
            self.graph.add_class(name, parsed.references);
        }

        Ok(())
    }

    /// Finish building and return the graph
    pub fn build(self) -> ClassGraph {
        debug!(
            "Class graph: {} classes ({} read), {} references",
            self.graph.class_count(),
            self.graph.defined_count(),
            self.graph.reference_count()
        );
        self.graph
    }
}

impl Default for ClassGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse every class in an artifact.
///
/// Classes are keyed by their entry path, which is also how the class index
/// knows them.
pub(super) fn scan_artifact(
    reader: &ArtifactReader,
    parser: &ClassFileParser,
    artifact: &Artifact,
) -> Result<Vec<(ClassName, ParsedClass)>, GraphError> {
    let entries = reader.read_classes(artifact)?;
    let mut parsed = Vec::with_capacity(entries.len());

    for entry in entries {
        let class = parser
            .parse(&entry.bytes)
            .map_err(|source| GraphError::MalformedClass {
                artifact: artifact.id.clone(),
                class: entry.name.clone(),
                source,
            })?;
        if class.name != entry.name {
            warn!(
                "{} in '{}' declares itself as {}",
                entry.name, artifact.id, class.name
            );
        }
        parsed.push((entry.name, class));
    }

    Ok(parsed)
}
