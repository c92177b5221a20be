//! Desktop Agent - transparent capture overlay

mod config;
mod state;
mod ui;
mod worker;

use crate::config::Config;
use crate::ui::{OverlayApp, UiState};
use crate::worker::{capture_worker, result_handler, CaptureCommand, CaptureEvent, CaptureRequest};
use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender};
use eframe::egui;
use export::SaveConfig;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

const APP_NAME: &str = "Desktop Agent";

#[derive(Parser, Debug)]
#[command(name = "desktop-agent")]
#[command(version, about = "Transparent overlay that captures the screen region inside its frame")]
struct Cli {
    /// Config file (default: ~/.config/desktop-agent/config.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to save captures to
    #[arg(long, short = 'o', value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Let the overlay move past the edges of the screen
    #[arg(long)]
    no_clamp: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    #[cfg(windows)]
    unsafe {
        use windows::Win32::UI::HiDpi::{
            SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
        };
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if cli.no_clamp {
        config.window.clamp_to_screen = false;
    }

    let mut save_config = config.save_config();
    if let Some(dir) = cli.output_dir {
        save_config.directory = dir;
    }
    log::info!("Captures go to {}", save_config.directory.display());

    // Create shared state
    let ui_state = Arc::new(Mutex::new(UiState::new()));

    // Create capture worker channels
    let (cmd_tx, cmd_rx): (Sender<CaptureCommand>, Receiver<CaptureCommand>) = bounded(4);
    let (event_tx, event_rx): (Sender<CaptureEvent>, Receiver<CaptureEvent>) = bounded(4);

    let worker_save_config = save_config.clone();
    let capture_handle = thread::Builder::new()
        .name("capture-worker".into())
        .spawn(move || {
            capture_worker(capture::default_grabber(), worker_save_config, cmd_rx, event_tx);
        })
        .context("Failed to start capture worker")?;

    // Setup callbacks
    {
        let cmd_tx = cmd_tx.clone();
        let ui_state_clone = ui_state.clone();
        let ask_for_path = config.capture.ask_for_path;
        let mut state = ui_state.lock();
        state.on_capture = Some(Arc::new(move |request| {
            on_capture_click(&ui_state_clone, &cmd_tx, &save_config, ask_for_path, request);
        }));
    }

    let ui_state_clone = ui_state.clone();
    let _result_handle = thread::Builder::new()
        .name("capture-results".into())
        .spawn(move || result_handler(ui_state_clone, event_rx))
        .context("Failed to start result handler")?;

    let geometry = config.initial_geometry();
    let min_size = config.frame_layout().min_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_position([geometry.x as f32, geometry.y as f32])
            .with_inner_size([geometry.width as f32, geometry.height as f32])
            .with_min_inner_size([min_size.width as f32, min_size.height as f32])
            .with_resizable(true),
        ..Default::default()
    };

    let ui_state_for_app = ui_state.clone();
    let run_result = eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(OverlayApp::new(
                cc,
                ui_state_for_app,
                &config,
                capture::default_grabber(),
            )))
        }),
    );

    // Cleanup
    ui_state.lock().on_capture = None;
    let _ = cmd_tx.send(CaptureCommand::Shutdown);
    let _ = capture_handle.join();

    run_result.map_err(|e| anyhow::anyhow!("Overlay window failed: {}", e))?;
    log::info!("{} closed", APP_NAME);

    Ok(())
}

fn on_capture_click(
    ui_state: &Arc<Mutex<UiState>>,
    cmd_tx: &Sender<CaptureCommand>,
    save_config: &SaveConfig,
    ask_for_path: bool,
    mut request: CaptureRequest,
) {
    {
        let mut state = ui_state.lock();
        if !state.state_machine.start_capture() {
            return;
        }
        state.status_text = state.state_machine.state().display_text().to_string();
    }

    if ask_for_path {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .add_filter("JPEG image", &["jpg", "jpeg"])
            .add_filter("Bitmap image", &["bmp"])
            .set_directory(&save_config.directory);
        match export::generate_filename(
            &save_config.filename_template,
            save_config.format.extension(),
        ) {
            Ok(name) => dialog = dialog.set_file_name(name),
            Err(e) => log::warn!("No default file name: {}", e),
        }
        let picked = dialog.save_file();

        match picked {
            Some(path) => request.destination = Some(path),
            None => {
                let mut state = ui_state.lock();
                state.state_machine.cancel_capture();
                state.status_text = "Capture cancelled".to_string();
                return;
            }
        }
    }

    if cmd_tx.send(CaptureCommand::Capture(request)).is_err() {
        log::error!("Capture worker is gone");
        let mut state = ui_state.lock();
        state.state_machine.cancel_capture();
        state.status_text = "Error: capture worker stopped".to_string();
    }
}
