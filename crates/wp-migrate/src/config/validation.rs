//! Configuration validation.

use super::MigrationConfig;
use crate::error::{MigrateError, Result};

/// Marker file proving a directory is a genuine WordPress installation root.
pub const WP_CONFIG_FILE: &str = "wp-config.php";

/// Validate the resolved configuration.
pub fn validate(config: &MigrationConfig) -> Result<()> {
    if config.target.url.is_empty() {
        return Err(MigrateError::Config("target.url is required".into()));
    }
    if !config.target.url.to_lowercase().starts_with("http") {
        return Err(MigrateError::Config(format!(
            "target.url must carry an explicit scheme, got '{}'",
            config.target.url
        )));
    }
    if config.target.ftp.host.is_empty() {
        return Err(MigrateError::Config("target.ftp.host is required".into()));
    }
    if config.target.ftp.user.is_empty() {
        return Err(MigrateError::Config("target.ftp.user is required".into()));
    }
    if config.target.ftp.dir.is_empty() {
        return Err(MigrateError::Config("target.ftp.dir is required".into()));
    }

    // The source tree must be a real installation root.
    if !config.source.dir.join(WP_CONFIG_FILE).is_file() {
        return Err(MigrateError::Config(format!(
            "Invalid source WordPress installation: {} not found in {}",
            WP_CONFIG_FILE,
            config.source.dir.display()
        )));
    }

    Ok(())
}
