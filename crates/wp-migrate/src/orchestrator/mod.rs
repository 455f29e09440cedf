//! Migration orchestrator - sequential workflow coordinator.
//!
//! Runs the phases in strict order, no concurrency between them:
//! resolve config, export the database, open the FTP session, ensure the
//! staging directory, restore the dump remotely, sync assets. Any fatal
//! error unwinds through the scoped temp-file guards, so locally-created
//! artifacts are deleted on every exit path.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tempfile::NamedTempFile;
use tracing::info;

use crate::config::MigrationConfig;
use crate::dump::render_dump;
use crate::error::{MigrateError, Result};
use crate::source::MysqlSource;
use crate::target::{
    FtpRemote, HttpTrigger, RemoteFs, RestoreTrigger, DUMP_FILE, RESTORE_TRIGGER_PHP,
    STAGING_DIR, TRIGGER_FILE,
};
use crate::transfer::{SyncStats, TransferEngine, TransferPlan};

/// Remote directory mirroring the source asset tree.
const CONTENT_DIR: &str = "wp-content";

/// Migration orchestrator.
pub struct Orchestrator {
    config: MigrationConfig,
}

/// Result of a completed migration run.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    /// The live target URL.
    pub live_url: String,

    /// Tables exported and restored (None when the database phase was
    /// skipped).
    pub tables_migrated: Option<usize>,

    /// Asset sync counters (None when the content phase was skipped).
    pub sync: Option<SyncStats>,

    /// Total duration in seconds.
    pub duration_seconds: f64,
}

/// The exported dump, held in a scoped temporary file.
struct DatabaseExport {
    file: NamedTempFile,
    tables: usize,
}

impl Orchestrator {
    /// Create a new orchestrator over a resolved configuration.
    pub fn new(config: MigrationConfig) -> Self {
        Self { config }
    }

    /// Run the migration to completion.
    pub async fn run(self) -> Result<MigrationResult> {
        let started = Instant::now();
        let config = &self.config;

        info!("Starting up...");
        info!(
            "Source WordPress directory is {}",
            config.source.dir.display()
        );

        let export = if config.skip_database {
            None
        } else {
            Some(self.export_database().await?)
        };

        let mut remote = FtpRemote::connect(&config.target.ftp)?;

        ensure_staging(&mut remote)?;

        let tables_migrated = match &export {
            Some(export) => {
                let trigger = HttpTrigger::new(config.base_url())?;
                migrate_database(&mut remote, &trigger, export.file.path()).await?;
                Some(export.tables)
            }
            None => None,
        };

        let sync = if config.skip_content {
            None
        } else {
            Some(sync_content(&mut remote, &config.content_dir())?)
        };

        remote.quit()?;

        info!("Done! You can see your site live at {}", config.target.url);

        Ok(MigrationResult {
            live_url: config.target.url.clone(),
            tables_migrated,
            sync,
            duration_seconds: started.elapsed().as_secs_f64(),
        })
    }

    /// Open the source database, encode the full dump and write it to a
    /// process-local temporary file.
    async fn export_database(&self) -> Result<DatabaseExport> {
        let creds = self.config.db_credentials()?;
        let mut source = MysqlSource::connect(&creds).await?;

        info!("Extracting the database, this may take some time...");
        let tables = source.export().await?;
        source.close().await?;

        let sql = render_dump(&tables);

        let mut file = NamedTempFile::new()?;
        file.write_all(sql.as_bytes())?;
        file.flush()?;

        info!("Full SQL has been saved to {}", file.path().display());

        Ok(DatabaseExport {
            file,
            tables: tables.len(),
        })
    }
}

/// Ensure the well-known staging subdirectory exists remotely.
fn ensure_staging<R: RemoteFs>(remote: &mut R) -> Result<()> {
    info!("Checking if the staging folder exists...");
    if remote.dir_exists(STAGING_DIR) {
        return Ok(());
    }
    info!("Creating staging folder {}...", STAGING_DIR);
    remote.mkdir(STAGING_DIR)
}

/// Upload the dump and the restore trigger into the staging directory,
/// invoke the trigger over HTTP, and clean the staging artifacts up on
/// success.
///
/// A failure body aborts WITHOUT remote cleanup so the residue stays
/// diagnosable; a cleanup failure after success is fatal so residue never
/// survives a successful run.
async fn migrate_database<R, T>(remote: &mut R, trigger: &T, dump_path: &Path) -> Result<()>
where
    R: RemoteFs,
    T: RestoreTrigger,
{
    let dump_remote = format!("{}/{}", STAGING_DIR, DUMP_FILE);
    let trigger_remote = format!("{}/{}", STAGING_DIR, TRIGGER_FILE);

    info!("Sending SQL dump file...");
    remote
        .put_file(&dump_remote, dump_path)
        .map_err(|e| e.into_transfer(&dump_remote))?;

    info!("Sending migration script file...");
    let mut script = NamedTempFile::new()?;
    script.write_all(RESTORE_TRIGGER_PHP.as_bytes())?;
    script.flush()?;
    remote
        .put_file(&trigger_remote, script.path())
        .map_err(|e| e.into_transfer(&trigger_remote))?;

    info!("Executing migration script...");
    let body = trigger.execute().await;
    if body != "1" {
        return Err(MigrateError::RemoteExecution(body));
    }
    info!("Database successfully migrated!");

    remote.delete_file(&trigger_remote)?;
    remote.delete_file(&dump_remote)?;
    remote.remove_dir(STAGING_DIR)?;

    Ok(())
}

/// Sync the source asset tree into the remote asset directory.
fn sync_content<R: RemoteFs>(remote: &mut R, content_dir: &Path) -> Result<SyncStats> {
    info!("Sending content to the FTP...");

    if !remote.dir_exists(CONTENT_DIR) {
        remote.mkdir_full(CONTENT_DIR);
    }
    remote.chdir(CONTENT_DIR)?;

    let plan = TransferPlan::build(content_dir)?;
    let stats = TransferEngine::new(remote).sync(&plan)?;

    info!(
        "Content synced: {} uploaded, {} already present, {} directories created",
        stats.uploaded, stats.skipped, stats.dirs_created
    );
    Ok(stats)
}
