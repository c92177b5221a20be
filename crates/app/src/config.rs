//! Configuration file support.
//!
//! Settings live in `~/.config/desktop-agent/config.toml`. A missing file
//! means defaults; out-of-range values are clamped with a warning.
//!
//! ```toml
//! [window]
//! x = 100
//! y = 100
//! width = 800
//! height = 600
//! clamp_to_screen = true
//!
//! [frame]
//! edge_margin = 16
//! border_width = 2
//! border_color = [0, 217, 255]
//!
//! [capture]
//! directory = "~/Pictures/Desktop Agent"
//! format = "png"
//! ```

use anyhow::{Context, Result};
use capture::Rect;
use export::{ImageFormatKind, SaveConfig};
use log::{debug, info, warn};
use overlay::{FrameLayout, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub frame: FrameConfig,

    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Initial geometry and resize limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Keep the overlay inside the visible area of its monitor while dragging
    pub clamp_to_screen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let geometry = overlay::DEFAULT_GEOMETRY;
        Self {
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            min_width: overlay::MIN_SIZE.width,
            min_height: overlay::MIN_SIZE.height,
            clamp_to_screen: true,
        }
    }
}

/// Border and control panel appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub edge_margin: u32,
    pub border_width: u32,
    pub border_color: [u8; 3],
    pub panel_height: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            edge_margin: overlay::EDGE_MARGIN,
            border_width: overlay::BORDER_WIDTH,
            border_color: overlay::BORDER_COLOR,
            panel_height: overlay::PANEL_HEIGHT,
        }
    }
}

/// Where captures go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Defaults to `~/Pictures/Desktop Agent`
    pub directory: Option<String>,
    pub filename_template: String,
    pub format: String,
    pub write_note: bool,
    /// Ask for a file name with a save dialog on every capture
    pub ask_for_path: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let save = SaveConfig::default();
        Self {
            directory: None,
            filename_template: save.filename_template,
            format: save.format.extension().to_string(),
            write_note: save.write_note,
            ask_for_path: false,
        }
    }
}

impl Config {
    /// Path of the user config file
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("desktop-agent");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or the default location; defaults when the file is missing
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config = Self::parse(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parse TOML text and clamp the result
    pub fn parse(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        config.validate_and_clamp();
        Ok(config)
    }

    fn validate_and_clamp(&mut self) {
        let w = &mut self.window;

        if !(50..=4096).contains(&w.min_width) {
            warn!("Invalid min_width {}, clamping to 50-4096 range", w.min_width);
            w.min_width = w.min_width.clamp(50, 4096);
        }
        if !(50..=4096).contains(&w.min_height) {
            warn!("Invalid min_height {}, clamping to 50-4096 range", w.min_height);
            w.min_height = w.min_height.clamp(50, 4096);
        }
        if w.width < w.min_width {
            warn!("Window width {} below min_width, using {}", w.width, w.min_width);
            w.width = w.min_width;
        }
        if w.height < w.min_height {
            warn!("Window height {} below min_height, using {}", w.height, w.min_height);
            w.height = w.min_height;
        }

        let f = &mut self.frame;

        if !(2..=64).contains(&f.edge_margin) {
            warn!("Invalid edge_margin {}, clamping to 2-64 range", f.edge_margin);
            f.edge_margin = f.edge_margin.clamp(2, 64);
        }
        if !(1..=16).contains(&f.border_width) {
            warn!("Invalid border_width {}, clamping to 1-16 range", f.border_width);
            f.border_width = f.border_width.clamp(1, 16);
        }
        if !(24..=120).contains(&f.panel_height) {
            warn!("Invalid panel_height {}, clamping to 24-120 range", f.panel_height);
            f.panel_height = f.panel_height.clamp(24, 120);
        }

        let c = &mut self.capture;

        if c.format.parse::<ImageFormatKind>().is_err() {
            warn!("Invalid capture format '{}', falling back to 'png'", c.format);
            c.format = "png".to_string();
        }
        if c.filename_template.trim().is_empty() {
            warn!("Empty filename_template, using default");
            c.filename_template = CaptureConfig::default().filename_template;
        } else if export::validate_template(&c.filename_template).is_err() {
            warn!(
                "Invalid filename_template '{}', using default",
                c.filename_template
            );
            c.filename_template = CaptureConfig::default().filename_template;
        }
    }

    /// Geometry the overlay opens with (logical points)
    pub fn initial_geometry(&self) -> Rect {
        Rect::new(self.window.x, self.window.y, self.window.width, self.window.height)
    }

    pub fn frame_layout(&self) -> FrameLayout {
        FrameLayout {
            edge_margin: self.frame.edge_margin,
            border_width: self.frame.border_width,
            panel_height: self.frame.panel_height,
            min_size: Size::new(self.window.min_width, self.window.min_height),
        }
    }

    pub fn save_config(&self) -> SaveConfig {
        let defaults = SaveConfig::default();
        SaveConfig {
            directory: self
                .capture
                .directory
                .as_deref()
                .map(expand_tilde)
                .unwrap_or(defaults.directory),
            filename_template: self.capture.filename_template.clone(),
            format: self.capture.format.parse().unwrap_or_default(),
            write_note: self.capture.write_note,
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
