//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure. Immutable once resolved: built exactly once
/// at startup from defaults, CLI overrides and interactive prompts, then
/// never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Source installation configuration.
    pub source: SourceConfig,

    /// Target site configuration.
    pub target: TargetConfig,

    /// Skip the database export/restore phases.
    pub skip_database: bool,

    /// Skip the asset sync phase.
    pub skip_content: bool,
}

/// Source installation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source WordPress installation directory.
    pub dir: PathBuf,
}

/// Target site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Target site URL. Always carries an explicit scheme after resolution.
    pub url: String,

    /// Target FTP credentials.
    pub ftp: FtpConfig,
}

/// Target FTP credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct FtpConfig {
    /// FTP host.
    pub host: String,

    /// FTP user.
    pub user: String,

    /// FTP password.
    pub password: String,

    /// Remote directory, relative to the FTP session root.
    pub dir: String,
}

impl fmt::Debug for FtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("dir", &self.dir)
            .finish()
    }
}

/// CLI-level overrides for the dotted configuration keys. `None` means the
/// key was not supplied and keeps its default (or is prompted for).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub target_url: Option<String>,
    pub ftp_host: Option<String>,
    pub ftp_user: Option<String>,
    pub ftp_password: Option<String>,
    pub ftp_dir: Option<String>,
    pub skip_database: bool,
    pub skip_content: bool,
}

/// Mutable pre-resolution configuration: defaults merged with overrides,
/// open for interactive prompting, finalized into [`MigrationConfig`] once.
#[derive(Debug, Clone)]
pub struct ConfigDraft {
    pub source_dir: PathBuf,
    pub target_url: String,
    pub ftp_host: String,
    pub ftp_user: String,
    pub ftp_password: String,
    pub ftp_dir: String,
    pub skip_database: bool,
    pub skip_content: bool,
}

impl ConfigDraft {
    /// Merge defaults with CLI overrides.
    pub fn from_overrides(overrides: ConfigOverrides) -> Self {
        Self {
            source_dir: overrides
                .source_dir
                .unwrap_or_else(|| PathBuf::from(".")),
            target_url: overrides
                .target_url
                .unwrap_or_else(|| "http://example.com".to_string()),
            ftp_host: overrides.ftp_host.unwrap_or_else(|| "localhost".to_string()),
            ftp_user: overrides.ftp_user.unwrap_or_else(|| "anonymous".to_string()),
            ftp_password: overrides.ftp_password.unwrap_or_default(),
            ftp_dir: overrides.ftp_dir.unwrap_or_else(|| "public_html".to_string()),
            skip_database: overrides.skip_database,
            skip_content: overrides.skip_content,
        }
    }
}
