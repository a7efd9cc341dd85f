use anyhow::{Context, Result, bail};
use clap::Parser;
use session_warden::cli::{Args, Commands};
use session_warden::{
    ConfigDiscovery, DetachedBootstrap, ImportUpload, SessionWarden, WardenConfig,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr: `export` may stream the binary archive to stdout
    let default_filter = if args.verbose {
        "session_warden=debug"
    } else {
        "session_warden=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => WardenConfig::from_toml_file(path)?,
        None => ConfigDiscovery::discover()?,
    };
    if let Some(base_dir) = args.base_dir {
        config.base_dir = base_dir;
    }
    if let Some(user_data_dir) = args.user_data_dir {
        config.user_data_dir = Some(user_data_dir);
    }

    let warden = SessionWarden::new(config, Arc::new(DetachedBootstrap));

    match args.command {
        Commands::Export { output } => run_export(&warden, output, args.json).await,
        Commands::Import { file, content_type } => {
            run_import(&warden, file, content_type, args.json).await
        }
        Commands::Purge { yes } => run_purge(&warden, yes, args.json).await,
        Commands::Sessions => {
            for id in warden.registry().list_session_ids() {
                println!("{}", id);
            }
            Ok(())
        }
    }
}

async fn run_export(warden: &SessionWarden, output: Option<PathBuf>, json: bool) -> Result<()> {
    if json && output.is_none() {
        bail!("--json requires --output, the archive itself is streamed to stdout otherwise");
    }

    match output {
        Some(path) => {
            let mut file = tokio::fs::File::create(&path)
                .await
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let summary = warden.export_to(&mut file).await?;
            file.sync_all().await?;
            info!("Wrote backup archive to {}", path.display());
            print_summary(&summary, json)
        }
        None => {
            let mut stdout = tokio::io::stdout();
            let summary = warden.export_to(&mut stdout).await?;
            info!(
                "Streamed {} bytes of session state to stdout",
                summary.archive_bytes
            );
            Ok(())
        }
    }
}

async fn run_import(
    warden: &SessionWarden,
    file: PathBuf,
    content_type: Option<String>,
    json: bool,
) -> Result<()> {
    let upload = match content_type {
        Some(content_type) => ImportUpload {
            path: file,
            content_type,
        },
        None => ImportUpload::from_path(file),
    };

    let summary = warden.import(&upload).await?;
    print_summary(&summary, json)
}

async fn run_purge(warden: &SessionWarden, yes: bool, json: bool) -> Result<()> {
    if !yes {
        bail!("Refusing to wipe session state without --yes");
    }

    let summary = warden.purge().await?;
    if !json {
        println!("{}", summary.message);
        return Ok(());
    }
    print_summary(&summary, json)
}

fn print_summary<T: Serialize>(summary: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    Ok(())
}
