//! Configuration resolution and validation.

mod types;
mod validation;
mod wp_config;

pub use types::*;
pub use validation::WP_CONFIG_FILE;
pub use wp_config::DbCredentials;

use crate::error::Result;
use std::path::PathBuf;

impl ConfigDraft {
    /// Normalize and validate the draft into the final immutable config.
    pub fn finalize(self) -> Result<MigrationConfig> {
        let config = MigrationConfig {
            source: SourceConfig {
                dir: self.source_dir,
            },
            target: TargetConfig {
                url: normalize_url(&self.target_url),
                ftp: FtpConfig {
                    host: self.ftp_host,
                    user: self.ftp_user,
                    password: self.ftp_password,
                    dir: self.ftp_dir,
                },
            },
            skip_database: self.skip_database,
            skip_content: self.skip_content,
        };
        config.validate()?;
        Ok(config)
    }
}

impl MigrationConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Path of the source installation's `wp-config.php`.
    pub fn wp_config_path(&self) -> PathBuf {
        self.source.dir.join(WP_CONFIG_FILE)
    }

    /// Path of the source installation's asset tree.
    pub fn content_dir(&self) -> PathBuf {
        self.source.dir.join("wp-content")
    }

    /// Extract the source database credentials from `wp-config.php`.
    pub fn db_credentials(&self) -> Result<DbCredentials> {
        let contents = std::fs::read_to_string(self.wp_config_path())?;
        wp_config::extract_credentials(&contents)
    }

    /// Target URL without a trailing slash, for composing request paths.
    pub fn base_url(&self) -> &str {
        self.target.url.trim_end_matches('/')
    }
}

/// Prepend `http://` when the URL carries no scheme.
fn normalize_url(url: &str) -> String {
    if url.to_lowercase().starts_with("http") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}
