use crate::error::{Result, UpsError};
use crate::types::PackageEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the tab-separated store written by older releases
pub const LEGACY_FILE_NAME: &str = "data";

/// Placeholder for an absent value in the legacy format
const LEGACY_NONE: &str = "NONE";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    packages: BTreeMap<String, PackageEntry>,
}

/// The persisted list of registered packages, keyed by name
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    entries: BTreeMap<String, PackageEntry>,
}

impl Store {
    /// Load the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_legacy(path, None)
    }

    /// Load the store at `path`, importing `legacy` when the store file does
    /// not exist yet and `legacy` is a regular file.
    ///
    /// Nothing is written until [`Store::save`] is called.
    pub fn open_with_legacy(path: impl Into<PathBuf>, legacy: Option<&Path>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| UpsError::Read {
                path: path.clone(),
                source,
            })?;
            let file: StoreFile = toml::from_str(&content).map_err(|source| UpsError::Parse {
                path: path.clone(),
                source,
            })?;

            file.packages
                .into_iter()
                .map(|(name, mut entry)| {
                    entry.name.clone_from(&name);
                    (name, entry)
                })
                .collect()
        } else {
            match legacy.filter(|p| p.is_file()) {
                Some(legacy) => {
                    tracing::info!("importing legacy data file {}", legacy.display());
                    parse_legacy(legacy)?
                }
                None => BTreeMap::new(),
            }
        };

        tracing::debug!("loaded {} package(s) from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by name
    pub fn entries(&self) -> impl Iterator<Item = &PackageEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Result<&PackageEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| UpsError::UnknownPackage(name.to_string()))
    }

    /// Register a package.
    ///
    /// The script path is canonicalized so the entry keeps working from any
    /// directory. An existing entry is only overwritten when `replace` is set,
    /// and the replacement starts without snapshot or latest value.
    pub fn insert(&mut self, name: &str, script_path: &Path, replace: bool) -> Result<&PackageEntry> {
        validate_name(name)?;

        if !replace && self.entries.contains_key(name) {
            return Err(UpsError::DuplicatePackage(name.to_string()));
        }

        let script_path = canonical_script(script_path)?;
        tracing::info!("registering {name} -> {}", script_path.display());

        self.entries
            .insert(name.to_string(), PackageEntry::new(name, script_path));
        self.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Result<PackageEntry> {
        self.entries
            .remove(name)
            .ok_or_else(|| UpsError::UnknownPackage(name.to_string()))
    }

    /// Cache the value the check-script just printed
    pub fn record_latest(&mut self, name: &str, latest: Option<String>) -> Result<()> {
        let entry = self.get_mut(name)?;
        entry.latest_version = latest;
        Ok(())
    }

    /// Record `version` as the packaged version. It is also the latest value
    /// since it was just read from the script.
    pub fn record_snapshot(&mut self, name: &str, version: Option<String>) -> Result<()> {
        let entry = self.get_mut(name)?;
        entry.latest_version.clone_from(&version);
        entry.snapshot_version = version;
        Ok(())
    }

    /// Write the store, replacing the previous file atomically
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| UpsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = StoreFile {
            packages: self.entries.clone(),
        };
        let content = toml::to_string_pretty(&file)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, content).map_err(|source| UpsError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| UpsError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("saved {} package(s) to {}", self.len(), self.path.display());
        Ok(())
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut PackageEntry> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| UpsError::UnknownPackage(name.to_string()))
    }
}

/// Names must be non-empty and free of whitespace and control characters
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UpsError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn canonical_script(script_path: &Path) -> Result<PathBuf> {
    let not_found = |source| UpsError::ScriptNotFound {
        path: script_path.to_path_buf(),
        source,
    };

    let canonical = fs::canonicalize(script_path).map_err(not_found)?;
    if !canonical.is_file() {
        return Err(not_found(std::io::Error::other("not a regular file")));
    }
    Ok(canonical)
}

/// Parse the legacy format: one `name snapshot latest script` record per
/// line, whitespace separated, with `NONE` marking absent values.
fn parse_legacy(path: &Path) -> Result<BTreeMap<String, PackageEntry>> {
    let content = fs::read_to_string(path).map_err(|source| UpsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let optional = |value: &str| (value != LEGACY_NONE).then(|| value.to_string());

    let mut entries = BTreeMap::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[name, snapshot, latest, script] = fields.as_slice() else {
            return Err(UpsError::LegacyFormat {
                path: path.to_path_buf(),
                line: index + 1,
            });
        };

        entries.insert(
            name.to_string(),
            PackageEntry {
                name: name.to_string(),
                script_path: PathBuf::from(script),
                snapshot_version: optional(snapshot),
                latest_version: optional(latest),
            },
        );
    }

    Ok(entries)
}
