//! Capture file writing

use crate::{ExportError, ExportResult, ImageFormatKind, SaveConfig};
use chrono::Local;
use image::{DynamicImage, RgbaImage};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// Files produced by one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCapture {
    pub image_path: PathBuf,
    pub note_path: Option<PathBuf>,
}

/// Filename from a chrono template and the current local time
///
/// Fails with [`ExportError::InvalidTemplate`] when the template holds a
/// specifier chrono cannot format.
pub fn generate_filename(template: &str, extension: &str) -> ExportResult<String> {
    let mut stem = String::new();
    write!(stem, "{}", Local::now().format(template))
        .map_err(|_| ExportError::InvalidTemplate(template.to_string()))?;
    Ok(format!("{}.{}", stem, extension))
}

/// Check that a filename template formats cleanly
pub fn validate_template(template: &str) -> ExportResult<()> {
    generate_filename(template, "png").map(|_| ())
}

/// `dir/filename`, or `dir/stem_N.ext` with the first free N
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(filename);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{}_{}.{}", stem, n, ext)),
            None => dir.join(format!("{}_{}", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Create `directory` if needed
pub fn ensure_directory_exists(directory: &Path) -> ExportResult<PathBuf> {
    if !directory.exists() {
        log::info!("Creating capture directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    Ok(directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf()))
}

/// Save a capture under the configured directory with a generated name
pub fn save_capture(image: &RgbaImage, note: &str, config: &SaveConfig) -> ExportResult<SavedCapture> {
    let directory = ensure_directory_exists(&config.directory)?;
    let filename = generate_filename(&config.filename_template, config.format.extension())?;
    let path = unique_path(&directory, &filename);

    write_capture(image, &path, config.format, note, config.write_note)
}

/// Save a capture to an explicit path (format from the extension, PNG otherwise)
pub fn save_capture_to(
    image: &RgbaImage,
    path: &Path,
    note: &str,
    write_note: bool,
) -> ExportResult<SavedCapture> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }

    let format = ImageFormatKind::from_path(path).unwrap_or_default();
    write_capture(image, path, format, note, write_note)
}

fn write_capture(
    image: &RgbaImage,
    path: &Path,
    format: ImageFormatKind,
    note: &str,
    write_note: bool,
) -> ExportResult<SavedCapture> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::EmptyImage);
    }

    log::info!(
        "Saving {}x{} capture to {}",
        image.width(),
        image.height(),
        path.display()
    );

    match format {
        // JPEG has no alpha channel
        ImageFormatKind::Jpeg => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(path, format.image_format())?,
        _ => image.save_with_format(path, format.image_format())?,
    }

    let note = note.trim();
    let note_path = if write_note && !note.is_empty() {
        let note_path = path.with_extension("txt");
        fs::write(&note_path, format!("{}\n", note))?;
        log::debug!("Note written to {}", note_path.display());
        Some(note_path)
    } else {
        None
    };

    Ok(SavedCapture {
        image_path: path.to_path_buf(),
        note_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(8, 6, Rgba([0, 217, 255, 255]))
    }

    fn config(dir: &TempDir) -> SaveConfig {
        SaveConfig {
            directory: dir.path().join("captures"),
            filename_template: "shot".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("capture_%Y", "png").unwrap();
        assert!(filename.starts_with("capture_2"));
        assert!(filename.ends_with(".png"));
    }

    #[test]
    fn invalid_template_is_an_error() {
        assert!(matches!(
            generate_filename("shot_%Q", "png"),
            Err(ExportError::InvalidTemplate(t)) if t == "shot_%Q"
        ));
        assert!(validate_template("shot_%Q").is_err());
        assert!(validate_template("capture_%Y-%m-%d_%H%M%S").is_ok());
    }

    #[test]
    fn save_with_invalid_template_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let config = SaveConfig {
            filename_template: "shot_%Q".to_string(),
            ..config(&dir)
        };
        let result = save_capture(&sample(), "", &config);
        assert!(matches!(result, Err(ExportError::InvalidTemplate(_))));
    }

    #[test]
    fn unique_path_appends_counter() {
        let dir = TempDir::new().unwrap();
        assert_eq!(unique_path(dir.path(), "a.png"), dir.path().join("a.png"));

        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("a_1.png"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "a.png"), dir.path().join("a_2.png"));
    }

    #[test]
    fn save_creates_directory_and_image() {
        let dir = TempDir::new().unwrap();
        let saved = save_capture(&sample(), "", &config(&dir)).unwrap();

        assert!(saved.image_path.ends_with("shot.png"));
        assert_eq!(saved.note_path, None);

        let reread = image::open(&saved.image_path).unwrap();
        assert_eq!((reread.width(), reread.height()), (8, 6));
    }

    #[test]
    fn save_twice_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let first = save_capture(&sample(), "", &config(&dir)).unwrap();
        let second = save_capture(&sample(), "", &config(&dir)).unwrap();
        assert_ne!(first.image_path, second.image_path);
        assert!(second.image_path.ends_with("shot_1.png"));
    }

    #[test]
    fn note_written_next_to_image() {
        let dir = TempDir::new().unwrap();
        let saved = save_capture(&sample(), "  what is this error?  ", &config(&dir)).unwrap();

        let note_path = saved.note_path.unwrap();
        assert!(note_path.ends_with("shot.txt"));
        assert_eq!(fs::read_to_string(note_path).unwrap(), "what is this error?\n");
    }

    #[test]
    fn note_skipped_when_disabled() {
        let dir = TempDir::new().unwrap();
        let config = SaveConfig {
            write_note: false,
            ..config(&dir)
        };
        let saved = save_capture(&sample(), "note", &config).unwrap();
        assert_eq!(saved.note_path, None);
    }

    #[test]
    fn save_as_jpeg_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.jpg");
        let saved = save_capture_to(&sample(), &path, "", true).unwrap();

        assert_eq!(saved.image_path, path);
        assert_eq!(image::ImageFormat::from_path(&path).unwrap(), image::ImageFormat::Jpeg);
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn empty_image_rejected() {
        let dir = TempDir::new().unwrap();
        let result = save_capture(&RgbaImage::new(0, 0), "", &config(&dir));
        assert!(matches!(result, Err(ExportError::EmptyImage)));
    }
}
