use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding a store file and check-scripts
pub struct TempStore {
    pub dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the store file used by [`TempStore::ups`]
    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("store/ups.toml")
    }

    /// Write an executable shell script printing `output`
    pub fn script(&self, name: &str, output: &str) -> PathBuf {
        self.script_with_body(name, &format!("echo '{output}'"))
    }

    /// Write an executable shell script with the given body
    pub fn script_with_body(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("Failed to make script executable");
        }

        path
    }

    /// `ups` command bound to this store, without colors or env overrides
    pub fn ups(&self) -> Command {
        let mut cmd = Command::cargo_bin("ups").expect("ups binary not built");
        cmd.env_remove("RUST_LOG")
            .env_remove("UPS_TIMEOUT")
            .env("UPS_DATA_FILE", self.data_file())
            .arg("--no-color");
        cmd
    }

    /// `ups` command using the platform default store, rooted in this
    /// directory through `XDG_DATA_HOME`
    pub fn ups_default_store(&self) -> Command {
        let mut cmd = Command::cargo_bin("ups").expect("ups binary not built");
        cmd.env_remove("RUST_LOG")
            .env_remove("UPS_TIMEOUT")
            .env_remove("UPS_DATA_FILE")
            .env("XDG_DATA_HOME", self.xdg_data_home())
            .arg("--no-color");
        cmd
    }

    pub fn xdg_data_home(&self) -> PathBuf {
        self.dir.path().join("xdg")
    }

    pub fn store_contents(&self) -> String {
        fs::read_to_string(self.data_file()).unwrap_or_default()
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}
