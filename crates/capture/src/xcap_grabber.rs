//! Screen region grab using the `xcap` crate

use crate::frame::crop_to_region;
use crate::{CaptureError, CaptureResult, Point, Rect, ScreenGrabber};
use image::RgbaImage;
use xcap::Monitor;

/// Grabber that captures the whole monitor and crops.
///
/// xcap does not report docks or panels, so work areas are the full
/// monitor rectangles here and clamping may let the overlay slide under
/// a macOS dock or a Linux panel.
pub struct XcapGrabber;

impl XcapGrabber {
    fn monitor_at(point: Point) -> CaptureResult<Monitor> {
        Monitor::from_point(point.x, point.y).or_else(|e| {
            log::debug!("No monitor at {:?} ({}), falling back to primary", point, e);
            let monitors = Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
            monitors
                .into_iter()
                .find(|m| m.is_primary().unwrap_or(false))
                .ok_or(CaptureError::NoMonitor { x: point.x, y: point.y })
        })
    }

    fn monitor_rect(monitor: &Monitor) -> CaptureResult<Rect> {
        let backend = |e: xcap::XCapError| CaptureError::Backend(e.to_string());
        Ok(Rect::new(
            monitor.x().map_err(backend)?,
            monitor.y().map_err(backend)?,
            monitor.width().map_err(backend)?,
            monitor.height().map_err(backend)?,
        ))
    }
}

impl ScreenGrabber for XcapGrabber {
    fn work_areas(&self) -> CaptureResult<Vec<Rect>> {
        Monitor::all()
            .map_err(|e| CaptureError::Backend(e.to_string()))?
            .iter()
            .map(Self::monitor_rect)
            .collect()
    }

    fn grab(&self, region: Rect) -> CaptureResult<RgbaImage> {
        if region.is_empty() {
            return Err(CaptureError::EmptyRegion);
        }

        let monitor = Self::monitor_at(region.center())?;
        let bounds = Self::monitor_rect(&monitor)?;

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        log::debug!(
            "xcap captured {}x{} monitor at ({}, {})",
            image.width(),
            image.height(),
            bounds.x,
            bounds.y
        );

        crop_to_region(&image, bounds.origin(), region)
    }
}
