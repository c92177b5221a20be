//! Frame conversion and cropping

use crate::{CaptureError, CaptureResult, Point, Rect};
use image::{imageops, ImageBuffer, RgbaImage};

/// Convert top-down BGRA rows into an RGBA image
pub fn bgra_to_rgba(mut data: Vec<u8>, width: u32, height: u32) -> CaptureResult<RgbaImage> {
    for chunk in data.chunks_exact_mut(4) {
        chunk.swap(0, 2);
        // GDI leaves alpha undefined for screen DCs
        chunk[3] = 255;
    }

    ImageBuffer::from_raw(width, height, data).ok_or_else(|| {
        CaptureError::Backend(format!("pixel buffer does not match {}x{}", width, height))
    })
}

/// Crop an image whose top-left corner sits at `image_origin` (screen space)
/// to `region` (screen space).
///
/// The region is clipped to the image first.
pub fn crop_to_region(
    image: &RgbaImage,
    image_origin: Point,
    region: Rect,
) -> CaptureResult<RgbaImage> {
    let image_rect = Rect::new(image_origin.x, image_origin.y, image.width(), image.height());
    let clipped = image_rect
        .intersection(&region)
        .filter(|r| !r.is_empty())
        .ok_or(CaptureError::EmptyRegion)?;

    if clipped != region {
        log::debug!("Capture region {:?} clipped to {:?}", region, clipped);
    }

    let local_x = (clipped.x - image_origin.x) as u32;
    let local_y = (clipped.y - image_origin.y) as u32;

    Ok(imageops::crop_imm(image, local_x, local_y, clipped.width, clipped.height).to_image())
}
