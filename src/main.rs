#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use metalogin::{
    app_config::AppConfig,
    cli::Cli,
    config::{reader, writer, Configuration},
    merge::{merge_with_names, MergeReport, Upsert},
};
use std::path::Path;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    initialize_tracing(cli.debug, cli.trace);

    if let Err(e) = run(&cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing with the specified debug/trace flags
fn initialize_tracing(debug: bool, trace: bool) {
    let log_level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy())
        .init();
}

/// Load application configuration and log its status
fn load_and_log_config() -> Result<AppConfig> {
    let app_config = AppConfig::load().context("failed to load app configuration")?;

    if app_config.is_some() {
        debug!("Loaded app configuration from: {}", AppConfig::config_path()?.display());
    } else {
        debug!("No app configuration file found, using defaults");
    }

    Ok(app_config.unwrap_or_default())
}

fn run(cli: &Cli) -> Result<()> {
    let app_config = load_and_log_config()?;

    let source = reader::read_source_config().context("failed to read source configuration")?;

    let mut destination = reader::read_destination_config(&cli.config)
        .context("failed to read destination configuration")?;

    let report = merge_with_names(&source, &mut destination, &app_config.source_names())
        .context("failed to merge source configuration into destination one")?;
    log_report(&report);
    warn_dangling_contexts(&destination);

    let yaml = writer::encode(&destination).context("failed to marshal result configuration")?;

    if cli.dry_run {
        info!("Dry run mode - not writing changes");
        print!("{yaml}");
        return Ok(());
    }

    if cli.backup || app_config.backup {
        handle_backup(&cli.config)?;
    }

    writer::write_bytes(&cli.config, yaml.as_bytes())
        .context("failed to write result configuration")?;

    info!("Configuration written to {}", cli.config.display());
    Ok(())
}

fn log_report(report: &MergeReport) {
    let describe = |outcome: Upsert| match outcome {
        Upsert::Inserted => "added",
        Upsert::Updated => "updated",
    };

    info!("Cluster {} {}", report.names.cluster, describe(report.cluster));
    info!("User {} {}", report.names.user, describe(report.user));
    info!("Context {} {}", report.names.context, describe(report.context));
}

fn warn_dangling_contexts(config: &Configuration) {
    for entry in config.dangling_contexts() {
        warn!(
            "Context {} references cluster `{}` and user `{}`, which are not all defined",
            entry.name, entry.context.cluster, entry.context.user
        );
    }
}

fn handle_backup(path: &Path) -> Result<()> {
    debug!("Creating backup of {}", path.display());
    match writer::backup_file(path).context("failed to back up destination configuration")? {
        Some(backup_path) => info!("Backup created: {backup_path}"),
        None => debug!("No backup needed (file doesn't exist)"),
    }
    Ok(())
}
