//! In-memory test doubles for the remote-side ports.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use async_trait::async_trait;

use super::{PutError, RemoteFs, RestoreTrigger};
use crate::error::{MigrateError, Result};

/// In-memory remote filesystem recording every operation.
#[derive(Default)]
pub struct MockRemote {
    pub dirs: BTreeSet<String>,
    pub files: BTreeMap<String, u64>,
    pub chdir_calls: Vec<String>,
    pub mkdir_calls: Vec<String>,
    pub put_attempts: Vec<String>,
    pub uploads: Vec<String>,
    pub deleted: Vec<String>,
    pub removed_dirs: Vec<String>,
    /// When set, uploads fail with `MissingParent` until the parent
    /// directory exists, like a real server.
    pub enforce_parents: bool,
    /// Paths whose upload always fails with a non-repairable error.
    pub fail_put_other: BTreeSet<String>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parents_enforced() -> Self {
        Self {
            enforce_parents: true,
            ..Self::default()
        }
    }

    fn parent_of(path: &str) -> Option<&str> {
        path.rsplit_once('/').map(|(parent, _)| parent)
    }
}

impl RemoteFs for MockRemote {
    fn chdir(&mut self, dir: &str) -> Result<()> {
        self.chdir_calls.push(dir.to_string());
        Ok(())
    }

    fn dir_exists(&mut self, dir: &str) -> bool {
        self.dirs.contains(dir)
    }

    fn file_size(&mut self, path: &str) -> Option<u64> {
        self.files.get(path).copied()
    }

    fn mkdir(&mut self, dir: &str) -> Result<()> {
        if !self.dirs.insert(dir.to_string()) {
            return Err(MigrateError::transfer(dir, "directory already exists"));
        }
        self.mkdir_calls.push(dir.to_string());
        Ok(())
    }

    fn mkdir_full(&mut self, dir: &str) {
        let mut current = String::new();
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            if self.dirs.insert(current.clone()) {
                self.mkdir_calls.push(current.clone());
            }
        }
    }

    fn put_file(&mut self, remote: &str, _local: &Path) -> std::result::Result<(), PutError> {
        self.put_attempts.push(remote.to_string());

        if self.fail_put_other.contains(remote) {
            return Err(PutError::Other(MigrateError::transfer(remote, "refused")));
        }
        if self.enforce_parents {
            if let Some(parent) = Self::parent_of(remote) {
                if !self.dirs.contains(parent) {
                    return Err(PutError::MissingParent);
                }
            }
        }

        self.files.insert(remote.to_string(), 1);
        self.uploads.push(remote.to_string());
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> Result<()> {
        if self.files.remove(path).is_none() {
            return Err(MigrateError::transfer(path, "no such file"));
        }
        self.deleted.push(path.to_string());
        Ok(())
    }

    fn remove_dir(&mut self, dir: &str) -> Result<()> {
        if !self.dirs.remove(dir) {
            return Err(MigrateError::transfer(dir, "no such directory"));
        }
        self.removed_dirs.push(dir.to_string());
        Ok(())
    }
}

/// A trigger that always answers with a fixed body.
pub struct ScriptedTrigger {
    pub body: String,
}

impl ScriptedTrigger {
    pub fn answering(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl RestoreTrigger for ScriptedTrigger {
    async fn execute(&self) -> String {
        self.body.clone()
    }
}
