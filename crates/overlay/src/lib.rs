//! Overlay module for Desktop Agent
//!
//! Frame geometry for the capture overlay: which zone the pointer is in,
//! how a drag or resize changes the window, and what part of the window
//! gets captured.

pub mod drag;
pub mod edge;
pub mod layout;

pub use drag::{move_rect, resize_rect, DragSession};
pub use edge::{CursorShape, Edge};
pub use layout::{FrameLayout, Zone};

/// Size in screen units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pointer distance from the window edge that still counts as the edge
pub const EDGE_MARGIN: u32 = 16;

/// Border line width
pub const BORDER_WIDTH: u32 = 2;

/// Border colour (cyan)
pub const BORDER_COLOR: [u8; 3] = [0, 217, 255];

/// Height of the control panel strip
pub const PANEL_HEIGHT: u32 = 40;

/// Smallest window the user can resize to
pub const MIN_SIZE: Size = Size::new(200, 150);

/// Geometry used on first start
pub const DEFAULT_GEOMETRY: capture::Rect = capture::Rect {
    x: 100,
    y: 100,
    width: 800,
    height: 600,
};
