// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of EnerView.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

mod config;
mod console;

use anyhow::Result;
use clap::Parser;
use enerview_client::ReportingApiClient;
use enerview_core::NavigationController;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Terminal front end for the energy reporting dashboard engine
#[derive(Debug, Parser)]
#[command(name = "enerview", version, about)]
struct Args {
    /// Report date to open (YYYY-MM or YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Reporting API base path (overrides the configuration file)
    #[arg(long)]
    base_url: Option<String>,

    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Trigger the CSV exports once the reports have loaded
    #[arg(long)]
    download: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with env filter support; respects RUST_LOG
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let mut config = config::load_config(&args.config)?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }

    info!("🚀 Starting EnerView");
    info!("   API base: {}", config.api.base_url);

    let api = ReportingApiClient::new(config.api.base_url)?;
    let controller = NavigationController::new(api, console::ConsoleSink);

    controller.start(args.date.as_deref()).await;

    if args.download && !controller.download() {
        warn!("nothing to download");
    }

    Ok(())
}
