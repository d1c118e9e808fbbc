use crate::config::{glob_match, Config};
use crate::dependency::DependencyDeclaration;
use crate::graph::{ArtifactId, ClassName};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Errors while enumerating or reading an artifact
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("artifact not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("unsupported artifact (expected a directory, .jar or .zip): {}", path.display())]
    Unsupported { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Physical layout of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Directory of `.class` files (e.g. `build/classes/java/main`)
    Directory,
    /// Jar or zip archive
    Archive,
}

impl ArtifactKind {
    /// Determine artifact kind from path
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(ArtifactKind::Directory);
        }
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("jar") || extension.eq_ignore_ascii_case("zip") {
            Some(ArtifactKind::Archive)
        } else {
            None
        }
    }
}

/// Compiler output directories of common Gradle, Android and Maven layouts
const CONVENTIONAL_OUTPUTS: &[&str] = &[
    "build/classes/java/main",
    "build/classes/kotlin/main",
    "build/intermediates/javac/release/classes",
    "build/tmp/kotlin-classes/release",
    "target/classes",
];

/// Existing conventional class output directories under a project root
pub fn find_project_outputs(root: &Path) -> Vec<PathBuf> {
    CONVENTIONAL_OUTPUTS
        .iter()
        .map(|relative| root.join(relative))
        .filter(|path| path.is_dir())
        .collect()
}

/// One binary artifact: project output or a resolved dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: ArtifactId,
    pub path: PathBuf,
    /// Resolved `group:name:version`, absent for project output
    pub coordinate: Option<DependencyDeclaration>,
}

impl Artifact {
    pub fn new(id: impl Into<ArtifactId>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            coordinate: None,
        }
    }

    /// Artifact identified by its own path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(path.display().to_string(), path)
    }

    pub fn with_coordinate(mut self, coordinate: DependencyDeclaration) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn kind(&self) -> Option<ArtifactKind> {
        ArtifactKind::from_path(&self.path)
    }
}

/// A class read out of an artifact
#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub name: ClassName,
    pub bytes: Vec<u8>,
}

/// Enumerates and reads class entries of artifacts.
///
/// Every artifact is opened, read and closed within a single call.
#[derive(Debug, Clone, Default)]
pub struct ArtifactReader {
    exclude: Vec<String>,
}

impl ArtifactReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new().with_excludes(config.exclude.clone())
    }

    /// Glob patterns over class entry names to skip
    pub fn with_excludes(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Names of all classes in the artifact, without reading their bytes
    pub fn class_names(&self, artifact: &Artifact) -> Result<Vec<ClassName>, DiscoveryError> {
        Ok(self
            .collect(artifact, false)?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// All classes in the artifact with their bytes
    pub fn read_classes(&self, artifact: &Artifact) -> Result<Vec<ClassEntry>, DiscoveryError> {
        self.collect(artifact, true)
    }

    fn collect(&self, artifact: &Artifact, with_bytes: bool) -> Result<Vec<ClassEntry>, DiscoveryError> {
        let path = &artifact.path;
        if !path.exists() {
            return Err(DiscoveryError::NotFound { path: path.clone() });
        }

        let entries = match artifact.kind() {
            Some(ArtifactKind::Directory) => self.collect_directory(path, with_bytes)?,
            Some(ArtifactKind::Archive) => self.collect_archive(path, with_bytes)?,
            None => return Err(DiscoveryError::Unsupported { path: path.clone() }),
        };

        debug!("{}: {} classes", artifact.id, entries.len());
        Ok(entries)
    }

    fn collect_directory(&self, root: &Path, with_bytes: bool) -> Result<Vec<ClassEntry>, DiscoveryError> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| DiscoveryError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let Some(name) = ClassName::from_entry(&relative.to_string_lossy()) else {
                continue;
            };
            if self.is_skipped(&name) {
                continue;
            }

            let bytes = if with_bytes {
                std::fs::read(entry.path()).map_err(|source| DiscoveryError::Io {
                    path: entry.path().to_path_buf(),
                    source,
                })?
            } else {
                Vec::new()
            };
            entries.push(ClassEntry { name, bytes });
        }

        Ok(entries)
    }

    fn collect_archive(&self, path: &Path, with_bytes: bool) -> Result<Vec<ClassEntry>, DiscoveryError> {
        let archive_error = |source| DiscoveryError::Archive {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(file).map_err(archive_error)?;

        let mut entries = Vec::new();
        for index in 0..archive.len() {
            let mut zip_entry = archive.by_index(index).map_err(archive_error)?;
            if zip_entry.is_dir() {
                continue;
            }
            let Some(name) = ClassName::from_entry(zip_entry.name()) else {
                continue;
            };
            if self.is_skipped(&name) {
                continue;
            }

            let mut bytes = Vec::new();
            if with_bytes {
                zip_entry
                    .read_to_end(&mut bytes)
                    .map_err(|source| DiscoveryError::Io {
                        path: path.join(name.as_str()),
                        source,
                    })?;
            }
            entries.push(ClassEntry { name, bytes });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn is_skipped(&self, name: &ClassName) -> bool {
        // module descriptors and multi-release overlays are not part of the class graph
        if name.simple_name() == "module-info" || name.as_str().starts_with("META-INF/") {
            trace!("Skipping: {}", name);
            return true;
        }
        if self.exclude.iter().any(|pattern| glob_match(pattern, name.as_str())) {
            trace!("Excluding: {}", name);
            return true;
        }
        false
    }
}
