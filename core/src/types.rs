use crate::version::severity_between;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A registered package as persisted in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Unique package name
    #[serde(skip)]
    pub name: String,
    /// Absolute path to the check-script
    #[serde(rename = "script")]
    pub script_path: PathBuf,
    /// Version recorded as currently packaged
    #[serde(rename = "snapshot", default, skip_serializing_if = "Option::is_none")]
    pub snapshot_version: Option<String>,
    /// Last value printed by the check-script
    #[serde(rename = "latest", default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
}

impl PackageEntry {
    pub fn new(name: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            script_path: script_path.into(),
            snapshot_version: None,
            latest_version: None,
        }
    }

    /// Compare the cached latest value against the snapshot
    pub fn status(&self) -> PackageStatus {
        match (&self.snapshot_version, &self.latest_version) {
            (_, None) => PackageStatus::Unknown,
            (None, Some(_)) => PackageStatus::NoSnapshot,
            (Some(snapshot), Some(latest)) if snapshot == latest => PackageStatus::UpToDate,
            (Some(_), Some(_)) => PackageStatus::Outdated,
        }
    }

    /// How far the latest value has moved away from the snapshot
    pub fn severity(&self) -> Option<UpdateSeverity> {
        match (&self.snapshot_version, &self.latest_version) {
            (Some(snapshot), Some(latest)) => severity_between(snapshot, latest),
            _ => None,
        }
    }
}

/// Snapshot vs. latest comparison for one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageStatus {
    UpToDate,
    Outdated,
    NoSnapshot,
    Unknown,
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStatus::UpToDate => write!(f, "up to date"),
            PackageStatus::Outdated => write!(f, "outdated"),
            PackageStatus::NoSnapshot => write!(f, "no snapshot"),
            PackageStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Severity of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSeverity {
    Major,
    Minor,
    Patch,
    /// Latest version is ordered before the snapshot
    Downgrade,
    /// Values differ but not in a way we can grade
    Other,
}

/// Result of running the check-script of one entry
#[derive(Debug)]
pub struct PackageCheck {
    pub name: String,
    /// Trimmed script output, `None` when the script printed nothing
    pub result: crate::Result<Option<String>>,
}
