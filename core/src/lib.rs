pub mod error;
pub mod output;
pub mod script;
pub mod store;
pub mod types;
pub mod version;

// Re-export commonly used types at crate root
pub use error::{Result, UpsError};
pub use output::TableRenderer;
pub use script::ScriptRunner;
pub use store::Store;
pub use types::{PackageCheck, PackageEntry, PackageStatus, UpdateSeverity};
pub use version::{Version, VersionError};
