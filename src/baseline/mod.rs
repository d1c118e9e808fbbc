//! Baseline support
//!
//! A baseline records the findings of one run so later runs only report new
//! ones.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::analysis::Finding;

/// Baseline errors
#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Failed to read baseline file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse baseline: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Baseline version mismatch")]
    VersionMismatch,
}

/// Current baseline format version
const BASELINE_VERSION: u32 = 1;

/// A fingerprint for a finding that can be matched across runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FindingFingerprint {
    /// Finding code, e.g. `DU001`
    pub code: String,
    /// Canonical dependency identifier
    pub dependency: String,
}

impl FindingFingerprint {
    pub fn from_finding(finding: &Finding) -> Self {
        Self {
            code: finding.kind.code().to_string(),
            dependency: finding.dependency.as_str().to_string(),
        }
    }

    /// Same code and same dependency; a version bump still matches
    pub fn matches(&self, finding: &Finding) -> bool {
        if self.code != finding.kind.code() {
            return false;
        }
        let dependency = finding.dependency.as_str();
        self.dependency == dependency || module_of(&self.dependency) == module_of(dependency)
    }
}

/// `group/name` part of a canonical identifier
fn module_of(dependency: &str) -> &str {
    dependency
        .rsplit_once(':')
        .map(|(module, _)| module)
        .unwrap_or(dependency)
}

/// A baseline containing known findings to ignore
#[derive(Debug, Serialize, Deserialize)]
pub struct Baseline {
    /// Baseline format version
    pub version: u32,
    /// When the baseline was created
    pub created_at: String,
    /// Known findings to ignore
    pub findings: Vec<FindingFingerprint>,
}

impl Baseline {
    pub fn from_findings(findings: &[Finding]) -> Self {
        Self {
            version: BASELINE_VERSION,
            created_at: chrono_lite_now(),
            findings: findings.iter().map(FindingFingerprint::from_finding).collect(),
        }
    }

    /// Load a baseline from a file
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let baseline: Self = serde_json::from_reader(reader)?;

        if baseline.version != BASELINE_VERSION {
            return Err(BaselineError::VersionMismatch);
        }

        Ok(baseline)
    }

    /// Save baseline to a file
    pub fn save(&self, path: &Path) -> Result<(), BaselineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn is_baselined(&self, finding: &Finding) -> bool {
        self.findings.iter().any(|fp| fp.matches(finding))
    }

    pub fn stats(&self, findings: &[Finding]) -> BaselineStats {
        let baselined = findings.iter().filter(|f| self.is_baselined(f)).count();

        BaselineStats {
            total_in_baseline: self.findings.len(),
            baselined_found: baselined,
            new_findings: findings.len() - baselined,
        }
    }
}

/// Statistics about baseline comparison
#[derive(Debug, Clone)]
pub struct BaselineStats {
    /// Total findings recorded in baseline
    pub total_in_baseline: usize,
    /// Number of current findings that match baseline
    pub baselined_found: usize,
    /// Number of new findings not in baseline
    pub new_findings: usize,
}

impl std::fmt::Display for BaselineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} new findings ({} baselined, {} in baseline file)",
            self.new_findings, self.baselined_found, self.total_in_baseline
        )
    }
}

/// Seconds since the epoch, without a chrono dependency
fn chrono_lite_now() -> String {
    use std::time::SystemTime;

    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", duration.as_secs())
}
