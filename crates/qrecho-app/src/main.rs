// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qrecho: Recover a QR payload from a photographed image and re-encode it.
//
// Entry point. Initialises logging, resolves settings, runs one scan through
// the popup controller, and prints or saves the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qrecho_app::cli::{SettingsOverrides, exit_status, resolve_settings, write_binarized};
use qrecho_app::controller::PopupController;
use qrecho_app::services::config_dir::default_config_path;
use qrecho_app::services::scan_service::{ScanOptions, ScanReport, ScanService};
use qrecho_core::error::Result;
use qrecho_core::human_errors::{describe_outcome, humanize_error};
use qrecho_core::types::ScanOutcome;

/// Scan an image for a QR code and write a clean copy of it.
#[derive(Debug, Parser)]
#[command(name = "qrecho", version, about)]
struct Args {
    /// Image file to scan (PNG, JPEG, GIF, BMP, WebP, ...).
    image: PathBuf,

    /// Where to write the regenerated code [default: output_file from config].
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Side length of the thresholding window, in pixels.
    #[arg(short, long)]
    window: Option<u32>,

    /// Binarize rows in parallel.
    #[arg(long)]
    parallel: bool,

    /// Settings file [default: $XDG_CONFIG_HOME/qrecho/config.json].
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the scan report as JSON.
    #[arg(long)]
    json: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    /// Do not write a regenerated code.
    #[arg(long)]
    no_regenerate: bool,

    /// Also write the binarized image to this file.
    #[arg(long, value_name = "FILE")]
    binarized: Option<PathBuf>,

    /// Save the effective settings back to the settings file.
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("qrecho starting");

    let result = run(args).await;
    if let Err(e) = &result {
        let human = humanize_error(e);
        tracing::error!(error = %e, "scan aborted");
        eprintln!("{}\n{}", human.message, human.suggestion);
    }
    ExitCode::from(exit_status(&result))
}

async fn run(args: Args) -> Result<ScanOutcome> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let overrides = SettingsOverrides {
        window: args.window,
        parallel: args.parallel,
    };
    let config = resolve_settings(&config_path, &overrides, args.save_config)?;

    let service = ScanService::new(config)?;
    let source = args.image.to_string_lossy().into_owned();

    let mut popup = PopupController::new(service.config().output_file.clone());
    let id = popup.open(source.clone());
    let options = ScanOptions {
        regenerate: !args.no_regenerate,
        keep_binarized: args.binarized.is_some(),
    };
    let report = service.scan_as(id, &source, options).await?;
    let outcome = report.outcome.clone();

    if let Some(path) = &args.binarized {
        write_binarized(&report, path)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let ScanReport { outcome: result, regenerated, .. } = report;
    popup.populate(id, result, regenerated);
    if let Some(download) = popup.download()? {
        let path = args
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(&download.file_name));
        std::fs::write(&path, &download.bytes)?;
        if !args.json {
            println!("New QR code saved to {}", path.display());
        }
    }

    Ok(outcome)
}

fn print_report(report: &ScanReport) {
    println!("Image: {}", report.source);
    println!("{}", describe_outcome(&report.outcome));
    match &report.outcome {
        ScanOutcome::Detected(symbol) => println!("{}", symbol.payload),
        ScanOutcome::LoadFailed { reason } => tracing::debug!(%reason, "load failure detail"),
        ScanOutcome::NotDetected => {}
    }
}
