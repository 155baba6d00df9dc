//! Command line interface for the bundler.
//!
//! Runs the startup pipeline (resolve key, build, validate, sign) and writes
//! the container and, optionally, its metadata to disk.

mod args;

pub use args::Args;

use anyhow::Context as _;
use std::path::Path;

use crate::{
    bundler::BundleManager,
    error::{CliError, Result},
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Runs the pipeline for already parsed arguments.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let settings = args.to_settings()?;
    log::info!("Creating bundle from {}", settings.asset_root().display());

    // Walking, hashing and signing are blocking
    let manager = tokio::task::spawn_blocking(move || BundleManager::from_settings(&settings))
        .await
        .map_err(|e| CliError::ExecutionFailed {
            command: "build bundle".to_string(),
            reason: e.to_string(),
        })??;

    let bundle = manager.bundle();

    write_output(&args.output, bundle.content()).await?;
    println!("Bundle written to: {}", args.output.display());

    if let Some(manifest_path) = &args.manifest {
        let json = bundle.metadata().to_json_pretty()?;
        write_output(manifest_path, json.as_bytes()).await?;
        println!("Manifest written to: {}", manifest_path.display());
    }

    println!(
        "Bundle {} created with {} files ({} bytes)",
        bundle.metadata().version,
        bundle.metadata().manifest.files.len(),
        bundle.content().len()
    );
    println!("Verifying key: {}", manager.verifying_key_base64());

    Ok(0)
}

async fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
