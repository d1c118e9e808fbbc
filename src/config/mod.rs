//! Configuration file and defaults

mod loader;

pub use loader::{Config, DependencyEntry, DependencyScope, ReportConfig};
pub(crate) use loader::glob_match;
