//! Export module for Desktop Agent
//!
//! Writes captured regions to image files.

mod file;

pub use file::{
    ensure_directory_exists, generate_filename, save_capture, save_capture_to, unique_path,
    validate_template, SavedCapture,
};

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Captured image is empty")]
    EmptyImage,

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid filename template: {0}")]
    InvalidTemplate(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormatKind {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormatKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormatKind::Png => "png",
            ImageFormatKind::Jpeg => "jpg",
            ImageFormatKind::Bmp => "bmp",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            ImageFormatKind::Png => image::ImageFormat::Png,
            ImageFormatKind::Jpeg => image::ImageFormat::Jpeg,
            ImageFormatKind::Bmp => image::ImageFormat::Bmp,
        }
    }

    /// Format implied by a file extension, if any
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl FromStr for ImageFormatKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormatKind::Png),
            "jpg" | "jpeg" => Ok(ImageFormatKind::Jpeg),
            "bmp" => Ok(ImageFormatKind::Bmp),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Where and how captures are written
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Directory to save captures to
    pub directory: PathBuf,
    /// Filename template (chrono format specifiers)
    pub filename_template: String,
    pub format: ImageFormatKind,
    /// Write the panel note next to the image as `<name>.txt`
    pub write_note: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            filename_template: "capture_%Y-%m-%d_%H%M%S".to_string(),
            format: ImageFormatKind::Png,
            write_note: true,
        }
    }
}

/// `~/Pictures/Desktop Agent`, or the working directory without a home
pub fn default_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Desktop Agent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parse_formats() {
        assert_eq!("png".parse::<ImageFormatKind>().unwrap(), ImageFormatKind::Png);
        assert_eq!("JPEG".parse::<ImageFormatKind>().unwrap(), ImageFormatKind::Jpeg);
        assert_eq!("jpg".parse::<ImageFormatKind>().unwrap(), ImageFormatKind::Jpeg);
        assert_eq!("bmp".parse::<ImageFormatKind>().unwrap(), ImageFormatKind::Bmp);
        assert!(matches!(
            "gif".parse::<ImageFormatKind>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn format_from_path() {
        assert_eq!(ImageFormatKind::from_path(Path::new("a/b.JPG")), Some(ImageFormatKind::Jpeg));
        assert_eq!(ImageFormatKind::from_path(Path::new("a/b")), None);
    }

    #[test]
    fn default_config() {
        let config = SaveConfig::default();
        assert_eq!(config.format, ImageFormatKind::Png);
        assert!(config.directory.ends_with("Desktop Agent"));
        assert!(config.write_note);
    }
}
