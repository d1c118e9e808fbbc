use crate::dependency::{DependencyDeclaration, DependencyId, DependencySet};
use crate::discovery::Artifact;
use crate::graph::DuplicateClassPolicy;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for dependency usage analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project class directories or jars
    pub project: Vec<PathBuf>,

    /// Declared dependencies and the artifacts they resolved to
    pub dependencies: Vec<DependencyEntry>,

    /// Class entry patterns to skip (e.g. `**/BuildConfig.class`)
    pub exclude: Vec<String>,

    /// Dependency identifier patterns never reported
    pub retain: Vec<String>,

    /// What to do when two artifacts contain the same class
    pub duplicate_classes: DuplicateClassPolicy,

    /// Report configuration
    pub report: ReportConfig,
}

/// How a dependency was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    /// Direct and exported to consumers
    Api,
    /// Direct, not exported
    #[default]
    Implementation,
    /// Pulled in by another dependency
    Transitive,
}

/// One declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEntry {
    /// `group:name:version`
    pub coordinate: String,

    /// Jar or class directory the coordinate resolved to
    pub path: PathBuf,

    #[serde(default)]
    pub scope: DependencyScope,
}

impl DependencyEntry {
    pub fn new(coordinate: impl Into<String>, path: impl Into<PathBuf>, scope: DependencyScope) -> Self {
        Self {
            coordinate: coordinate.into(),
            path: path.into(),
            scope,
        }
    }

    pub fn declaration(&self) -> Result<DependencyDeclaration> {
        self.coordinate
            .parse()
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid dependency for {}", self.path.display()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json, sarif
    pub format: String,

    /// Report api/implementation misconfigurations
    pub check_api_exposure: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            check_api_exposure: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".depusage.yml",
            ".depusage.yaml",
            ".depusage.toml",
            "depusage.yml",
            "depusage.yaml",
            "depusage.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Check if a class entry should be skipped
    pub fn should_exclude(&self, entry: &str) -> bool {
        self.exclude.iter().any(|pattern| glob_match(pattern, entry))
    }

    /// Check if a dependency should never be reported
    pub fn should_retain(&self, id: &DependencyId) -> bool {
        self.retain.iter().any(|pattern| glob_match(pattern, id.as_str()))
    }

    /// Project artifacts, with relative paths resolved against `root`
    pub fn project_artifacts(&self, root: &Path) -> Vec<Artifact> {
        self.project
            .iter()
            .map(|path| Artifact::from_path(resolve(root, path)))
            .collect()
    }

    /// Dependency artifacts tagged with their coordinates
    pub fn dependency_artifacts(&self, root: &Path) -> Result<Vec<Artifact>> {
        self.dependencies
            .iter()
            .map(|entry| {
                Ok(Artifact::from_path(resolve(root, &entry.path)).with_coordinate(entry.declaration()?))
            })
            .collect()
    }

    /// Partition the declared dependencies by scope
    pub fn dependency_set(&self) -> Result<DependencySet> {
        let mut direct = Vec::new();
        let mut api = Vec::new();
        let mut transitive = Vec::new();

        for entry in &self.dependencies {
            let declaration = entry.declaration()?;
            match entry.scope {
                DependencyScope::Api => {
                    api.push(declaration.clone());
                    direct.push(declaration);
                }
                DependencyScope::Implementation => direct.push(declaration),
                DependencyScope::Transitive => transitive.push(declaration),
            }
        }

        DependencySet::builder()
            .direct(direct)
            .api(api)
            .transitive(transitive)
            .build()
            .into_diagnostic()
            .wrap_err("Invalid dependency declarations")
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Glob matching over `/`-separated names.
///
/// `*` matches within one segment, `?` matches one character of a segment,
/// `**` matches across segments and `**/` may also match nothing.
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    match_from(pattern.as_bytes(), text.as_bytes())
}

fn match_from(pattern: &[u8], text: &[u8]) -> bool {
    match pattern {
        [] => text.is_empty(),
        [b'*', b'*', rest @ ..] => {
            if let [b'/', after_slash @ ..] = rest {
                if match_from(after_slash, text) {
                    return true;
                }
            }
            (0..=text.len()).any(|i| match_from(rest, &text[i..]))
        }
        [b'*', rest @ ..] => {
            for i in 0..=text.len() {
                if match_from(rest, &text[i..]) {
                    return true;
                }
                if text.get(i) == Some(&b'/') {
                    break;
                }
            }
            false
        }
        [b'?', rest @ ..] => match text {
            [c, remaining @ ..] if *c != b'/' => match_from(rest, remaining),
            _ => false,
        },
        [p, rest @ ..] => match text {
            [c, remaining @ ..] if c == p => match_from(rest, remaining),
            _ => false,
        },
    }
}
