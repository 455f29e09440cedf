//! FTP-backed implementation of the remote filesystem port.

use std::fs::File;
use std::path::Path;

use suppaftp::types::{FileType, FormatControl};
use suppaftp::{FtpError, FtpStream, Mode};
use tracing::{debug, info};

use super::{PutError, RemoteFs};
use crate::config::FtpConfig;
use crate::error::{MigrateError, Result};

/// One FTP session, opened once and reused for every directory and file
/// operation of the migration.
pub struct FtpRemote {
    stream: FtpStream,
}

impl FtpRemote {
    /// Connect, authenticate, switch to passive mode and a text-safe
    /// transfer type, and enter the configured base directory.
    pub fn connect(config: &FtpConfig) -> Result<Self> {
        let addr = if config.host.contains(':') {
            config.host.clone()
        } else {
            format!("{}:21", config.host)
        };

        info!("Connecting to target FTP server {}...", config.host);

        let mut stream = FtpStream::connect(&addr).map_err(|e| {
            MigrateError::connection(
                format!("ftp {}", config.host),
                format!("couldn't connect: {}", e),
            )
        })?;

        stream.login(&config.user, &config.password).map_err(|e| {
            MigrateError::connection(
                format!("ftp {}", config.host),
                format!("couldn't login as {}: {}", config.user, e),
            )
        })?;

        stream.set_mode(Mode::Passive);

        stream.transfer_type(FileType::Ascii(FormatControl::Default)).map_err(|e| {
            MigrateError::connection(format!("ftp {}", config.host), e.to_string())
        })?;

        stream.cwd(&config.dir).map_err(|e| {
            MigrateError::connection(
                format!("ftp {}", config.host),
                format!("failed to change directory to {}: {}", config.dir, e),
            )
        })?;

        info!("Connected.");
        Ok(Self { stream })
    }

    /// End the session cleanly.
    pub fn quit(mut self) -> Result<()> {
        self.stream
            .quit()
            .map_err(|e| MigrateError::connection("ftp", e.to_string()))
    }
}

impl RemoteFs for FtpRemote {
    fn chdir(&mut self, dir: &str) -> Result<()> {
        self.stream.cwd(dir).map_err(|e| {
            MigrateError::connection("ftp", format!("failed to change directory to {}: {}", dir, e))
        })
    }

    fn dir_exists(&mut self, dir: &str) -> bool {
        // Attempt to change into the path and return to where we were; a
        // failed CWD means "absent".
        let origin = match self.stream.pwd() {
            Ok(origin) => origin,
            Err(_) => return false,
        };
        if self.stream.cwd(dir).is_ok() {
            let _ = self.stream.cwd(&origin);
            return true;
        }
        false
    }

    fn file_size(&mut self, path: &str) -> Option<u64> {
        self.stream.size(path).ok().map(|size| size as u64)
    }

    fn mkdir(&mut self, dir: &str) -> Result<()> {
        self.stream
            .mkdir(dir)
            .map_err(|e| MigrateError::transfer(dir, format!("couldn't create directory: {}", e)))
    }

    fn mkdir_full(&mut self, dir: &str) {
        let mut current = String::new();
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            // Already-existing segments fail; that is expected.
            let _ = self.stream.mkdir(&current);
        }
    }

    fn put_file(&mut self, remote: &str, local: &Path) -> std::result::Result<(), PutError> {
        let mut file = File::open(local)
            .map_err(|e| PutError::Other(MigrateError::Io(e)))?;

        match self.stream.put_file(remote, &mut file) {
            Ok(bytes) => {
                debug!("Sent {} ({} bytes)", remote, bytes);
                Ok(())
            }
            Err(e) if is_missing_parent(&e) => Err(PutError::MissingParent),
            Err(e) => Err(PutError::Other(MigrateError::transfer(
                remote,
                e.to_string(),
            ))),
        }
    }

    fn delete_file(&mut self, path: &str) -> Result<()> {
        self.stream
            .rm(path)
            .map_err(|e| MigrateError::transfer(path, format!("couldn't delete: {}", e)))
    }

    fn remove_dir(&mut self, dir: &str) -> Result<()> {
        self.stream
            .rmdir(dir)
            .map_err(|e| MigrateError::transfer(dir, format!("couldn't remove directory: {}", e)))
    }
}

/// Whether an upload failure reports an absent parent directory.
fn is_missing_parent(error: &FtpError) -> bool {
    error
        .to_string()
        .to_lowercase()
        .contains("no such file or directory")
}
