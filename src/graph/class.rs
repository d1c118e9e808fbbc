use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix carried by every [`ClassName`]
const CLASS_SUFFIX: &str = ".class";

/// Slash-separated class path ending in `.class`, e.g. `com/example/Foo.class`
///
/// Two classes are the same class iff their names are equal strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    /// Build from a JVM internal name such as `com/example/Foo`
    pub fn from_internal(internal: &str) -> Self {
        Self(format!("{}{}", internal, CLASS_SUFFIX))
    }

    /// Build from an archive entry or relative file path.
    ///
    /// Returns `None` unless the entry names a `.class` file.
    pub fn from_entry(entry: &str) -> Option<Self> {
        let normalized = entry.replace('\\', "/");
        let normalized = normalized.trim_start_matches('/');
        if normalized.len() <= CLASS_SUFFIX.len() || !normalized.ends_with(CLASS_SUFFIX) {
            return None;
        }
        Some(Self(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Internal name without the `.class` suffix
    pub fn internal_name(&self) -> &str {
        &self.0[..self.0.len() - CLASS_SUFFIX.len()]
    }

    /// Name after the last package separator, without suffix
    pub fn simple_name(&self) -> &str {
        let internal = self.internal_name();
        internal.rsplit('/').next().unwrap_or(internal)
    }

    /// Package in internal form (`com/example`), empty for the default package
    pub fn package(&self) -> &str {
        let internal = self.internal_name();
        internal.rfind('/').map(|idx| &internal[..idx]).unwrap_or("")
    }

    /// Whether this is a nested or synthetic class (`Outer$Inner`)
    pub fn is_nested(&self) -> bool {
        self.simple_name().contains('$')
    }

    /// Dotted Java name, e.g. `com.example.Foo`
    pub fn dotted(&self) -> String {
        self.internal_name().replace('/', ".")
    }
}

impl TryFrom<String> for ClassName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_entry(&value).ok_or_else(|| format!("not a class file name: '{}'", value))
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.0
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of one artifact (a jar or a class directory)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ArtifactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
