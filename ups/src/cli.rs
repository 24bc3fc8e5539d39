use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Track upstream versions of the packages you maintain
#[derive(Parser, Debug, Clone)]
#[command(name = "ups")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Store file (defaults to <data dir>/ups/ups.toml)
    #[arg(long, global = true, env = "UPS_DATA_FILE", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Seconds a check-script may run before it is killed
    #[arg(long, global = true, env = "UPS_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of check-scripts to run at once
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run every check-script and compare against the snapshots (default)
    List(ListArgs),

    /// Register a package and the script that prints its latest version
    Insert {
        /// Package name
        name: String,
        /// Executable printing the latest version on stdout
        script: PathBuf,
        /// Replace an already registered package
        #[arg(short, long)]
        force: bool,
    },

    /// Record the latest version as the currently packaged one
    Snapshot {
        /// Packages to snapshot
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        names: Vec<String>,
        /// Snapshot every registered package
        #[arg(short, long)]
        all: bool,
    },

    /// Run a package's check-script and print the latest version
    Get {
        /// Package name
        name: String,
    },

    /// Unregister a package
    Remove {
        /// Package name
        name: String,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::List(ListArgs::default())
    }
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show packages whose latest version differs from the snapshot
    #[arg(short, long)]
    pub outdated: bool,

    /// Show the versions from the last run without running any script
    #[arg(short, long)]
    pub cached: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
