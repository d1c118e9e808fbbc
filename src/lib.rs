//! depusage - Find unused and misconfigured JVM dependencies
//!
//! Reads compiled classes of a project and of its declared dependencies and
//! decides which dependencies the project actually needs.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Discovery** - Enumerate class directories and jars
//! 2. **Indexing** - Map every class to the artifact that contains it
//! 3. **Parsing** - Read class references out of each class file's constant pool
//! 4. **Graph Building** - Build a class reference graph
//! 5. **Usage Analysis** - Walk the graph from project classes and classify dependencies
//! 6. **Reporting** - Output results in various formats

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod dependency;
pub mod discovery;
pub mod graph;
pub mod parser;
pub mod report;

pub use analysis::{DependencyReport, DependencyUsageAnalyzer, ExposureAnalyzer, UsageInput, UsageResult};
pub use config::Config;
pub use dependency::{build_dependency_set, identifier_of, DependencyDeclaration, DependencyId, DependencySet};
pub use discovery::{Artifact, ArtifactReader};
pub use graph::{ClassGraph, ClassIndex, ClassName};
pub use parser::{extract_references, ClassFileParser};
pub use report::{ReportFormat, Reporter};
