use crate::cli::Args;
use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use ups_core::script::{DEFAULT_JOBS, DEFAULT_TIMEOUT};
use ups_core::store::LEGACY_FILE_NAME;
use ups_core::ScriptRunner;

/// Directory under the user data dir holding the store
pub const APP_DIR: &str = "ups";
/// Store file name inside [`APP_DIR`]
pub const STORE_FILE: &str = "ups.toml";

/// Settings resolved from flags, environment and platform defaults
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    /// Data file of older releases, only consulted for the default store
    pub legacy_file: Option<PathBuf>,
    pub timeout: Duration,
    pub jobs: usize,
    pub show_colors: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let (data_file, legacy_file) = match &args.data_file {
            Some(path) => (path.clone(), None),
            None => (default_data_file()?, Some(default_legacy_file()?)),
        };

        let timeout = args.timeout.map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        if timeout.is_zero() {
            anyhow::bail!("--timeout must be at least one second");
        }

        let show_colors = !args.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();

        Ok(Self {
            data_file,
            legacy_file,
            timeout,
            jobs: args.jobs.unwrap_or(DEFAULT_JOBS).max(1),
            show_colors,
        })
    }

    pub fn runner(&self) -> ScriptRunner {
        ScriptRunner::new(self.timeout, self.jobs)
    }
}

fn app_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Can not find the user data directory")?;
    Ok(data_dir.join(APP_DIR))
}

/// `<data dir>/ups/ups.toml`
pub fn default_data_file() -> Result<PathBuf> {
    Ok(app_dir()?.join(STORE_FILE))
}

/// `<data dir>/ups/data`, where older releases kept their store
pub fn default_legacy_file() -> Result<PathBuf> {
    Ok(app_dir()?.join(LEGACY_FILE_NAME))
}
