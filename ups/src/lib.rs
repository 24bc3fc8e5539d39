pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Args, Command, ListArgs};
pub use config::Config;

// Re-export core types for convenience
pub use ups_core::{
    PackageCheck, PackageEntry, PackageStatus, ScriptRunner, Store, TableRenderer,
    UpdateSeverity, UpsError,
};
