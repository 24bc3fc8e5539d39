use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use crate::types::UpdateSeverity;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version string: {0}")]
    InvalidVersion(String),
}

/// A dotted numeric version as printed by a check-script.
///
/// Scripts are free to print anything, so this is only used to grade the
/// distance between a snapshot and the latest value when both happen to look
/// like versions. Equality of the raw strings stays the source of truth.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
    /// Original string representation
    pub original: String,
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.pre_release == other.pre_release
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let original = s.trim();
        let invalid = || VersionError::InvalidVersion(original.to_string());

        let s = original
            .strip_prefix('v')
            .or_else(|| original.strip_prefix('V'))
            .unwrap_or(original);

        // Build metadata never affects ordering
        let s = s.split_once('+').map_or(s, |(head, _)| head);

        let (base, pre_release) = match s.split_once('-') {
            Some((base, pre)) if !pre.is_empty() => (base, Some(pre.to_string())),
            Some(_) => return Err(invalid()),
            None => split_trailing_tag(s),
        };

        let mut parts = base.split('.');
        let mut next = |required: bool| -> Result<u64, VersionError> {
            match parts.next() {
                Some(part) => part.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };

        let major = next(true)?;
        let minor = next(false)?;
        let patch = next(false)?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Version {
            major,
            minor,
            patch,
            pre_release,
            original: original.to_string(),
        })
    }
}

/// Split `1.4.0rc1` into `1.4.0` and `rc1`.
fn split_trailing_tag(s: &str) -> (&str, Option<String>) {
    match s.find(|c: char| c.is_ascii_alphabetic()) {
        Some(idx) if idx > 0 => (&s[..idx], Some(s[idx..].to_string())),
        _ => (s, None),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                // Pre-release versions are less than release versions
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
                (None, None) => Ordering::Equal,
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Classify the change from `snapshot` to `latest`.
///
/// Returns `None` when the strings are identical. Values that do not parse
/// as versions are reported as [`UpdateSeverity::Other`], and a latest
/// version ordered before the snapshot as [`UpdateSeverity::Downgrade`].
pub fn severity_between(snapshot: &str, latest: &str) -> Option<UpdateSeverity> {
    if snapshot == latest {
        return None;
    }

    let (Ok(from), Ok(to)) = (snapshot.parse::<Version>(), latest.parse::<Version>()) else {
        return Some(UpdateSeverity::Other);
    };

    if to < from {
        return Some(UpdateSeverity::Downgrade);
    }

    if from.major != to.major {
        Some(UpdateSeverity::Major)
    } else if from.minor != to.minor {
        Some(UpdateSeverity::Minor)
    } else if from.patch != to.patch {
        Some(UpdateSeverity::Patch)
    } else {
        Some(UpdateSeverity::Other)
    }
}
