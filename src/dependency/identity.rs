use super::DependencyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A declared dependency coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl DependencyDeclaration {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Canonical identifier, `None` if the declaration cannot be canonicalized
    pub fn identifier(&self) -> Option<DependencyId> {
        identifier_of(self)
    }
}

/// Parses Gradle notation, `group:name:version`
impl FromStr for DependencyDeclaration {
    type Err = DependencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, name, version] => Ok(Self::new(*group, *name, *version)),
            _ => Err(DependencyError::InvalidCoordinate(s.to_string())),
        }
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Canonical dependency identifier, `{group}/{name}:{version}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyId(String);

impl DependencyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical identifier of a declaration.
///
/// Components must be non-empty and free of `/`, `:` and whitespace, which
/// keeps the join injective. Anything else yields `None`.
pub fn identifier_of(dependency: &DependencyDeclaration) -> Option<DependencyId> {
    let components = [&dependency.group, &dependency.name, &dependency.version];
    if !components.iter().all(|c| is_valid_component(c)) {
        return None;
    }
    Some(DependencyId(format!(
        "{}/{}:{}",
        dependency.group, dependency.name, dependency.version
    )))
}

fn is_valid_component(component: &str) -> bool {
    !component.is_empty()
        && !component
            .chars()
            .any(|c| c == '/' || c == ':' || c.is_whitespace())
}
