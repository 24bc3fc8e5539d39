use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UpsError>;

#[derive(Error, Debug)]
pub enum UpsError {
    #[error("Package `{0}` is not registered")]
    UnknownPackage(String),
    #[error("Package `{0}` is already registered (use --force to replace it)")]
    DuplicatePackage(String),
    #[error("Invalid package name: {0:?}")]
    InvalidName(String),
    #[error("Script not found: {}", .path.display())]
    ScriptNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to run {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Script {} exited with {status}{}", .path.display(), stderr_suffix(.stderr))]
    ScriptFailed {
        path: PathBuf,
        status: String,
        stderr: String,
    },
    #[error("Script {} timed out after {}s", .path.display(), .timeout.as_secs())]
    Timeout { path: PathBuf, timeout: Duration },
    #[error("Script {} printed output that is not valid UTF-8", .path.display())]
    InvalidOutput { path: PathBuf },
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Malformed legacy data file {} at line {line}", .path.display())]
    LegacyFormat { path: PathBuf, line: usize },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_failed_message_includes_stderr() {
        let err = UpsError::ScriptFailed {
            path: PathBuf::from("/tmp/check.sh"),
            status: "exit status: 2".to_string(),
            stderr: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Script /tmp/check.sh exited with exit status: 2:\nboom"
        );
    }

    #[test]
    fn test_script_failed_message_without_stderr() {
        let err = UpsError::ScriptFailed {
            path: PathBuf::from("/tmp/check.sh"),
            status: "exit status: 1".to_string(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "Script /tmp/check.sh exited with exit status: 1");
    }
}
