//! # wp-migrate
//!
//! WordPress installation migration library.
//!
//! Moves a local WordPress installation (MySQL database plus the
//! `wp-content` asset tree) to a remote server reachable over FTP:
//!
//! - **SQL dump export** with batched, replayable INSERT statements
//! - **Remote restore** through an uploaded trigger script invoked over HTTP
//! - **Idempotent asset sync** that skips files already present remotely
//! - **Repair-and-retry** for uploads hitting a missing parent directory
//!
//! ## Example
//!
//! ```rust,no_run
//! use wp_migrate::{ConfigDraft, ConfigOverrides, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wp_migrate::MigrateError> {
//!     let config = ConfigDraft::from_overrides(ConfigOverrides::default()).finalize()?;
//!     let result = Orchestrator::new(config).run().await?;
//!     println!("Live at {}", result.live_url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dump;
pub mod error;
pub mod orchestrator;
pub mod source;
pub mod target;
pub mod transfer;

// Re-exports for convenient access
pub use config::{
    ConfigDraft, ConfigOverrides, DbCredentials, FtpConfig, MigrationConfig, SourceConfig,
    TargetConfig,
};
pub use error::{MigrateError, Result};
pub use orchestrator::{MigrationResult, Orchestrator};
pub use transfer::{SyncStats, TransferEngine, TransferPlan};
