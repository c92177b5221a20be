//! Frame layout and hit testing

use crate::edge::Edge;
use crate::{Size, BORDER_WIDTH, EDGE_MARGIN, MIN_SIZE, PANEL_HEIGHT};
use capture::{Point, Rect};

/// What a press at a window position should start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Resize(Edge),
    Move,
    /// Inside the control panel; widgets handle the click
    Panel,
}

/// Dimensions of the overlay frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub edge_margin: u32,
    pub border_width: u32,
    pub panel_height: u32,
    pub min_size: Size,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            edge_margin: EDGE_MARGIN,
            border_width: BORDER_WIDTH,
            panel_height: PANEL_HEIGHT,
            min_size: MIN_SIZE,
        }
    }
}

impl FrameLayout {
    /// Classify a window-relative position
    pub fn hit_test(&self, pos: Point, size: Size) -> Zone {
        if let Some(edge) = Edge::at(pos, size.width, size.height, self.edge_margin) {
            return Zone::Resize(edge);
        }

        if self.panel_rect(size).contains(pos.x, pos.y) {
            Zone::Panel
        } else {
            Zone::Move
        }
    }

    /// Control panel strip along the bottom, inside the border (window-relative)
    pub fn panel_rect(&self, size: Size) -> Rect {
        let b = self.border_width as i32;
        let bottom = size.height as i32 - b;
        let top = (bottom - self.panel_height as i32).max(b);
        Rect::from_edges(b, top, size.width as i32 - b, bottom)
    }

    /// Screen area to capture for a window at `geometry`.
    ///
    /// `None` when the border and panel leave nothing to capture.
    pub fn capture_region(&self, geometry: Rect) -> Option<Rect> {
        let region = self.inset(geometry);
        (!region.is_empty()).then_some(region)
    }

    fn inset(&self, rect: Rect) -> Rect {
        let b = self.border_width as i32;
        Rect::from_edges(
            rect.x + b,
            rect.y + b,
            rect.right() - b,
            rect.bottom() - b - self.panel_height as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FrameLayout {
        FrameLayout::default()
    }

    const SIZE: Size = Size::new(800, 600);

    #[test]
    fn edges_win_over_panel() {
        // Bottom edge margin overlaps the panel strip
        assert_eq!(
            layout().hit_test(Point::new(400, 590), SIZE),
            Zone::Resize(Edge::Bottom)
        );
        assert_eq!(
            layout().hit_test(Point::new(2, 570), SIZE),
            Zone::Resize(Edge::Left)
        );
    }

    #[test]
    fn panel_and_move_zones() {
        assert_eq!(layout().hit_test(Point::new(400, 570), SIZE), Zone::Panel);
        assert_eq!(layout().hit_test(Point::new(400, 300), SIZE), Zone::Move);
        // Just above the panel
        assert_eq!(layout().hit_test(Point::new(400, 557), SIZE), Zone::Move);
    }

    #[test]
    fn panel_rect_sits_inside_border() {
        assert_eq!(layout().panel_rect(SIZE), Rect::new(2, 558, 796, 40));
    }

    #[test]
    fn panel_rect_never_crosses_top_border() {
        let r = layout().panel_rect(Size::new(100, 30));
        assert_eq!(r.y, 2);
        assert_eq!(r.height, 26);
    }

    #[test]
    fn capture_region_excludes_border_and_panel() {
        let region = layout().capture_region(Rect::new(100, 100, 800, 600)).unwrap();
        assert_eq!(region, Rect::new(102, 102, 796, 556));
    }

    #[test]
    fn capture_region_at_negative_origin() {
        let region = layout().capture_region(Rect::new(-500, -20, 300, 200)).unwrap();
        assert_eq!(region, Rect::new(-498, -18, 296, 156));
    }

    #[test]
    fn capture_region_empty_when_panel_fills_window() {
        assert_eq!(layout().capture_region(Rect::new(0, 0, 300, 44)), None);
        assert_eq!(layout().capture_region(Rect::new(0, 0, 4, 400)), None);
    }
}
