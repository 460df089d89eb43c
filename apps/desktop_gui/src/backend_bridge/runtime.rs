//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use anyhow::{Context, Result};
use client_core::{ChatTransport, PortfolioClient};
use crossbeam_channel::{Receiver, Sender};
use tokio::runtime::{Handle, Runtime};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{PreviewImage, UiEvent};

const MAX_PREVIEW_DIMENSION: u32 = 512;

/// Owns the tokio runtime for the lifetime of the app.
///
/// Section loads are spawned on [`BackendBridge::handle`] by the views that
/// own them; chat and image traffic goes through the command queue.
pub struct BackendBridge {
    handle: Handle,
    worker: Option<thread::JoinHandle<()>>,
}

impl BackendBridge {
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn join(mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("backend worker panicked");
            }
        }
    }
}

pub fn launch(
    client: PortfolioClient,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> Result<BackendBridge> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("folio-backend")
        .build()
        .context("failed to build backend runtime")?;
    let handle = runtime.handle().clone();

    let worker = thread::Builder::new()
        .name("folio-bridge".into())
        .spawn(move || run_worker(runtime, client, cmd_rx, ui_tx))
        .context("failed to spawn backend worker thread")?;

    Ok(BackendBridge {
        handle,
        worker: Some(worker),
    })
}

fn run_worker(
    runtime: Runtime,
    client: PortfolioClient,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

    runtime.block_on(async move {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::SendChat { request } => {
                    let transport = client.chat_transport();
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let outcome = transport.send(&request).await;
                        let _ = ui_tx.send(UiEvent::ChatReplied(outcome));
                    });
                }
                BackendCommand::FetchImage { url } => {
                    let client = client.clone();
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let event = match client.fetch_image(&url).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => UiEvent::ImageLoaded { url, image },
                                Err(reason) => UiEvent::ImageFailed { url, reason },
                            },
                            Err(err) => {
                                tracing::warn!(url = %url, "image fetch failed: {err}");
                                UiEvent::ImageFailed {
                                    url,
                                    reason: err.to_string(),
                                }
                            }
                        };
                        let _ = ui_tx.send(event);
                    });
                }
                BackendCommand::Shutdown => break,
            }
        }
        tracing::info!("backend worker stopping");
    });

    // Outstanding loads, chat posts and image fetches die with the runtime.
    runtime.shutdown_background();
}

fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(MAX_PREVIEW_DIMENSION, MAX_PREVIEW_DIMENSION)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
