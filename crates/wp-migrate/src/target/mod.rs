//! Remote-side ports: the target filesystem reached over FTP and the
//! HTTP-invoked restore trigger.
//!
//! Existence probes are part of normal control flow, so the port exposes
//! them as `bool`/`Option` rather than errors; only operations that must
//! succeed return `Result`.

mod ftp;
mod trigger;

#[cfg(test)]
pub(crate) mod mock;

pub use ftp::FtpRemote;
pub use trigger::{HttpTrigger, RestoreTrigger, RESTORE_TRIGGER_PHP};

use crate::error::{MigrateError, Result};
use std::path::Path;

/// Well-known staging subdirectory on the remote side.
pub const STAGING_DIR: &str = "wp-migrate";

/// Dump file name inside the staging directory.
pub const DUMP_FILE: &str = "db.sql";

/// Restore trigger file name inside the staging directory.
pub const TRIGGER_FILE: &str = "migrate.php";

/// Upload failure, classified so the transfer engine can repair the one
/// recoverable case.
#[derive(Debug)]
pub enum PutError {
    /// The remote parent directory is absent; creating it and retrying
    /// once is expected to succeed.
    MissingParent,
    /// Anything else; fatal.
    Other(MigrateError),
}

impl PutError {
    /// Convert into the fatal transfer error for `path`.
    pub fn into_transfer(self, path: &str) -> MigrateError {
        match self {
            PutError::MissingParent => {
                MigrateError::transfer(path, "remote parent directory is missing")
            }
            PutError::Other(e) => e,
        }
    }
}

/// Remote filesystem operations used by the migration.
///
/// All paths are relative to the session's current working directory and
/// use forward slashes.
pub trait RemoteFs {
    /// Change the session working directory.
    fn chdir(&mut self, dir: &str) -> Result<()>;

    /// Non-destructive existence probe for a directory. Never errors;
    /// a failed probe means "absent".
    fn dir_exists(&mut self, dir: &str) -> bool;

    /// Size probe for a file. `None` means "absent"; any reported size
    /// means "already present".
    fn file_size(&mut self, path: &str) -> Option<u64>;

    /// Create a single directory. Errors when it cannot be created.
    fn mkdir(&mut self, dir: &str) -> Result<()>;

    /// Create a directory and all missing ancestors, component by
    /// component. Errors on already-existing segments are suppressed
    /// (mkdir -p semantics).
    fn mkdir_full(&mut self, dir: &str);

    /// Upload a local file to the given remote path.
    fn put_file(&mut self, remote: &str, local: &Path) -> std::result::Result<(), PutError>;

    /// Delete a remote file.
    fn delete_file(&mut self, path: &str) -> Result<()>;

    /// Remove a remote directory.
    fn remove_dir(&mut self, dir: &str) -> Result<()>;
}
