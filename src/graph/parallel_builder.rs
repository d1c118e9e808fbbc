// Parallel graph builder using rayon

use super::builder::{scan_artifact, GraphError};
use super::ClassGraph;
use crate::discovery::{Artifact, ArtifactReader};
use crate::parser::ClassFileParser;
use rayon::prelude::*;
use tracing::info;

/// Parallel graph builder for faster processing
#[derive(Debug, Default)]
pub struct ParallelClassGraphBuilder {
    reader: ArtifactReader,
    parser: ClassFileParser,
}

impl ParallelClassGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reader(mut self, reader: ArtifactReader) -> Self {
        self.reader = reader;
        self
    }

    /// Build graph from artifacts, reading and parsing them in parallel.
    ///
    /// Classes are merged in input order, so the result matches the sequential
    /// builder.
    pub fn build_from_artifacts(&self, artifacts: &[Artifact]) -> Result<ClassGraph, GraphError> {
        info!("Reading {} artifacts in parallel...", artifacts.len());

        let scanned: Vec<_> = artifacts
            .par_iter()
            .map(|artifact| scan_artifact(&self.reader, &self.parser, artifact))
            .collect::<Result<_, _>>()?;

        let mut graph = ClassGraph::new();
        for classes in scanned {
            for (name, parsed) in classes {
                graph.add_class(name, parsed.references);
            }
        }

        info!(
            "Parsed {} classes, {} references",
            graph.defined_count(),
            graph.reference_count()
        );

        Ok(graph)
    }
}
