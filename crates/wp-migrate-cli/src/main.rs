//! wp-migrate CLI - WordPress server migration.

mod prompts;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use wp_migrate::{ConfigDraft, ConfigOverrides, MigrateError, Orchestrator};

#[derive(Parser)]
#[command(name = "wp-migrate")]
#[command(about = "Migrate a WordPress installation to a remote server over FTP")]
#[command(version)]
struct Cli {
    /// Source WordPress installation directory
    #[arg(long = "source.dir")]
    source_dir: Option<PathBuf>,

    /// Remote WordPress site URL
    #[arg(long = "target.url")]
    target_url: Option<String>,

    /// Remote FTP host
    #[arg(long = "target.ftp.host")]
    ftp_host: Option<String>,

    /// Remote FTP user
    #[arg(long = "target.ftp.user")]
    ftp_user: Option<String>,

    /// Remote FTP password
    #[arg(long = "target.ftp.password")]
    ftp_password: Option<String>,

    /// Remote FTP directory
    #[arg(long = "target.ftp.dir")]
    ftp_dir: Option<String>,

    /// Skip the asset sync phase
    #[arg(long = "skip-content")]
    skip_content: bool,

    /// Skip the database export/restore phases
    #[arg(long = "skip-database")]
    skip_database: bool,

    /// Accept the resolved values without interactive prompting
    #[arg(long)]
    non_interactive: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_dir: self.source_dir.clone(),
            target_url: self.target_url.clone(),
            ftp_host: self.ftp_host.clone(),
            ftp_user: self.ftp_user.clone(),
            ftp_password: self.ftp_password.clone(),
            ftp_dir: self.ftp_dir.clone(),
            skip_database: self.skip_database,
            skip_content: self.skip_content,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(MigrateError::Config)?;

    let mut draft = ConfigDraft::from_overrides(cli.overrides());

    if !cli.non_interactive {
        prompts::fill_draft(&mut draft)
            .map_err(|e| MigrateError::Config(e.to_string()))?;
        println!();
    }

    let config = draft.finalize()?;

    let result = Orchestrator::new(config).run().await?;

    println!("\nMigration completed!");
    if let Some(tables) = result.tables_migrated {
        println!("  Tables migrated: {}", tables);
    }
    if let Some(sync) = result.sync {
        println!(
            "  Content: {} uploaded, {} already present",
            sync.uploaded, sync.skipped
        );
    }
    println!("  Duration: {:.2}s", result.duration_seconds);
    println!("\nDone! You can see your site live at {}", result.live_url);

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
