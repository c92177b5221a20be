//! Screen capture module for Desktop Agent
//!
//! Provides screen geometry types and region grabbing.

pub mod frame;

#[cfg(windows)]
pub mod gdi;
#[cfg(not(windows))]
pub mod xcap_grabber;

pub use frame::crop_to_region;

use image::RgbaImage;
use std::ops::{Add, Sub};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Capture backend error: {0}")]
    Backend(String),

    #[error("No monitor at ({x}, {y})")]
    NoMonitor { x: i32, y: i32 },

    #[error("No monitors found")]
    NoMonitors,

    #[error("Capture region is empty")]
    EmptyRegion,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Point in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rectangle in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from its edges, collapsing inverted spans to zero
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x &&
        self.y < other.bottom() && self.bottom() > other.y
    }

    /// Overlapping part of two rectangles
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        Some(Rect::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Scale every coordinate, e.g. from logical points to physical pixels
    pub fn scale(&self, factor: f32) -> Rect {
        let left = (self.x as f32 * factor).round() as i32;
        let top = (self.y as f32 * factor).round() as i32;
        let right = (self.right() as f32 * factor).round() as i32;
        let bottom = (self.bottom() as f32 * factor).round() as i32;
        Rect::from_edges(left, top, right, bottom)
    }
}

/// Source of screen pixels and monitor layout.
///
/// All coordinates are physical pixels in virtual-desktop space.
pub trait ScreenGrabber: Send {
    /// Usable area of every monitor
    fn work_areas(&self) -> CaptureResult<Vec<Rect>>;

    /// Grab the pixels under `region`
    fn grab(&self, region: Rect) -> CaptureResult<RgbaImage>;

    /// Bounding box of all work areas
    fn desktop_bounds(&self) -> CaptureResult<Rect> {
        self.work_areas()?
            .iter()
            .copied()
            .reduce(|acc, area| acc.union(&area))
            .ok_or(CaptureError::NoMonitors)
    }
}

/// Platform grabber: GDI on Windows, xcap elsewhere
pub fn default_grabber() -> Box<dyn ScreenGrabber> {
    #[cfg(windows)]
    {
        Box::new(gdi::GdiGrabber)
    }

    #[cfg(not(windows))]
    {
        Box::new(xcap_grabber::XcapGrabber)
    }
}
