use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use client_core::{load_settings, PortfolioClient};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{theme::PersistedDesktopSettings, PortfolioApp};

#[derive(Parser, Debug)]
#[command(name = "folio-gui", about = "Desktop portfolio viewer")]
struct Args {
    /// Settings file; defaults to ./folio.toml or the per-user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref());
    let client = PortfolioClient::from_settings(&settings)?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let bridge = backend_bridge::runtime::launch(client.clone(), cmd_rx, ui_tx)?;
    let runtime = bridge.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Portfolio")
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "folio",
        options,
        Box::new(move |cc| {
            let persisted = PersistedDesktopSettings::from_storage(cc.storage);
            Ok(Box::new(PortfolioApp::new(
                &settings, &client, &runtime, cmd_tx, ui_rx, persisted,
            )))
        }),
    );

    bridge.join();
    result.map_err(|err| anyhow::anyhow!(err.to_string())).context("desktop window failed")
}
