//! Directory differ and transfer engine.
//!
//! The differ walks a local tree into a [`TransferPlan`]; the engine
//! replays the plan against the remote side, creating missing directories
//! and uploading files the remote does not already have (skip-on-exists,
//! never overwrite). Presence is decided per entry by a fresh probe so
//! concurrent external changes are tolerated.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{MigrateError, Result};
use crate::target::{PutError, RemoteFs};

/// One local filesystem entry paired with its remote-relative path.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub local: PathBuf,
    pub remote: String,
    pub is_dir: bool,
}

/// Ordered upload plan: directories appear before the files they contain.
#[derive(Debug, Clone, Default)]
pub struct TransferPlan {
    pub entries: Vec<PlanEntry>,
}

impl TransferPlan {
    /// Walk `root` and build the plan. Remote paths are relative to the
    /// root and use forward slashes regardless of host conventions.
    pub fn build(root: &Path) -> Result<Self> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            let rel = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| MigrateError::transfer(entry.path().display().to_string(), e.to_string()))?;
            let remote = normalize_separators(rel);
            let is_dir = entry.file_type().is_dir();
            entries.push(PlanEntry {
                local: entry.into_path(),
                remote,
                is_dir,
            });
        }

        Ok(Self { entries })
    }
}

/// Join path components with forward slashes.
fn normalize_separators(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Counters reported by one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub uploaded: usize,
    pub skipped: usize,
    pub dirs_created: usize,
}

/// Replays a [`TransferPlan`] against a remote filesystem.
pub struct TransferEngine<'a, R: RemoteFs> {
    remote: &'a mut R,
}

impl<'a, R: RemoteFs> TransferEngine<'a, R> {
    pub fn new(remote: &'a mut R) -> Self {
        Self { remote }
    }

    /// Run the plan to completion. Fatal on any failure that survives the
    /// single repair-and-retry.
    pub fn sync(&mut self, plan: &TransferPlan) -> Result<SyncStats> {
        let mut stats = SyncStats::default();

        for entry in &plan.entries {
            if entry.is_dir {
                if !self.remote.dir_exists(&entry.remote) {
                    info!("Creating directory {}...", entry.remote);
                    self.remote.mkdir_full(&entry.remote);
                    stats.dirs_created += 1;
                }
                continue;
            }

            if self.remote.file_size(&entry.remote).is_some() {
                debug!("{} already exists, skipping", entry.remote);
                stats.skipped += 1;
                continue;
            }

            self.upload(entry)?;
            stats.uploaded += 1;
        }

        Ok(stats)
    }

    /// Upload one file, repairing a missing parent directory at most once.
    fn upload(&mut self, entry: &PlanEntry) -> Result<()> {
        info!("Sending {}...", entry.remote);

        let mut repaired = false;
        loop {
            match self.remote.put_file(&entry.remote, &entry.local) {
                Ok(()) => return Ok(()),
                Err(PutError::MissingParent) if !repaired => {
                    let parent = parent_dir(&entry.remote);
                    info!(
                        "Parent directory {} doesn't exist, creating it...",
                        parent
                    );
                    self.remote.mkdir_full(parent);
                    repaired = true;
                }
                Err(e) => return Err(e.into_transfer(&entry.remote)),
            }
        }
    }
}

/// The remote parent of a relative path ("" at the top level).
fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}
