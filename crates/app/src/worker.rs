//! Capture worker thread

use crate::ui::UiState;
use anyhow::{Context, Result};
use capture::{Rect, ScreenGrabber};
use crossbeam_channel::{Receiver, Sender};
use export::{SaveConfig, SavedCapture};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// One capture job
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Screen region in physical pixels
    pub region: Rect,
    /// Text from the panel input
    pub note: String,
    /// Explicit output path from the save dialog
    pub destination: Option<PathBuf>,
}

/// Capture worker commands
pub enum CaptureCommand {
    Capture(CaptureRequest),
    Shutdown,
}

/// Capture worker result
#[derive(Debug)]
pub enum CaptureEvent {
    Saved(SavedCapture),
    Failed(String),
}

pub fn capture_worker(
    grabber: Box<dyn ScreenGrabber>,
    save_config: SaveConfig,
    cmd_rx: Receiver<CaptureCommand>,
    event_tx: Sender<CaptureEvent>,
) {
    log::debug!("Capture worker started");

    while let Ok(command) = cmd_rx.recv() {
        let request = match command {
            CaptureCommand::Capture(request) => request,
            CaptureCommand::Shutdown => break,
        };

        let event = match run_capture(grabber.as_ref(), &save_config, &request) {
            Ok(saved) => CaptureEvent::Saved(saved),
            Err(e) => {
                log::error!("Capture failed: {:#}", e);
                CaptureEvent::Failed(format!("{:#}", e))
            }
        };

        if event_tx.send(event).is_err() {
            break;
        }
    }

    log::debug!("Capture worker stopped");
}

fn run_capture(
    grabber: &dyn ScreenGrabber,
    save_config: &SaveConfig,
    request: &CaptureRequest,
) -> Result<SavedCapture> {
    log::info!("Capturing region {:?}", request.region);

    let image = grabber
        .grab(request.region)
        .with_context(|| format!("Failed to grab {:?}", request.region))?;

    let saved = match &request.destination {
        Some(path) => export::save_capture_to(&image, path, &request.note, save_config.write_note),
        None => export::save_capture(&image, &request.note, save_config),
    }
    .context("Failed to save capture")?;

    Ok(saved)
}

/// Apply worker events to the shared UI state
pub fn result_handler(ui_state: Arc<Mutex<UiState>>, event_rx: Receiver<CaptureEvent>) {
    while let Ok(event) = event_rx.recv() {
        let mut state = ui_state.lock();
        match event {
            CaptureEvent::Saved(saved) => {
                state.status_text = format!("Saved {}", file_label(&saved));
                log::info!("Capture saved to {}", saved.image_path.display());
                state.state_machine.finish_capture(saved);
                log::debug!("{} captures this session", state.state_machine.capture_count());
            }
            CaptureEvent::Failed(msg) => {
                state.status_text = format!("Error: {}", msg);
                state.state_machine.cancel_capture();
            }
        }

        if let Some(ctx) = &state.repaint {
            ctx.request_repaint();
        }
    }

    // Worker hung up; never leave the UI waiting on a capture
    let mut state = ui_state.lock();
    if !state.state_machine.state().can_capture() {
        log::error!("Capture worker exited with a capture in flight");
        state.state_machine.cancel_capture();
        state.status_text = "Error: capture worker stopped".to_string();
        if let Some(ctx) = &state.repaint {
            ctx.request_repaint();
        }
    }
}

fn file_label(saved: &SavedCapture) -> String {
    saved
        .image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| saved.image_path.display().to_string())
}
