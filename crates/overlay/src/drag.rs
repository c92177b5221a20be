//! Drag and resize geometry

use crate::edge::Edge;
use crate::Size;
use capture::{Point, Rect};

/// Press-to-release state of a drag or resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// Pointer position at press (screen space)
    pub start_pointer: Point,
    /// Window geometry at press
    pub start_geometry: Rect,
    /// Edge being resized, `None` when moving
    pub edge: Option<Edge>,
    /// Area the window has to stay inside
    pub bounds: Option<Rect>,
}

impl DragSession {
    pub fn begin(
        start_pointer: Point,
        start_geometry: Rect,
        edge: Option<Edge>,
        bounds: Option<Rect>,
    ) -> Self {
        log::trace!(
            "Drag session started at {:?} with edge {:?}",
            start_pointer,
            edge
        );
        Self {
            start_pointer,
            start_geometry,
            edge,
            bounds,
        }
    }

    /// Geometry for the current pointer position
    pub fn update(&self, pointer: Point, min_size: Size) -> Rect {
        let delta = pointer - self.start_pointer;
        match self.edge {
            None => move_rect(self.start_geometry, delta, self.bounds),
            Some(edge) => resize_rect(self.start_geometry, edge, delta, min_size, self.bounds),
        }
    }
}

/// Translate `start` by `delta`, keeping it inside `bounds` when given.
///
/// A rectangle that started partly outside may move back inward but never
/// further out, so it does not snap into place on the first tick.
pub fn move_rect(start: Rect, delta: Point, bounds: Option<Rect>) -> Rect {
    let mut x = start.x + delta.x;
    let mut y = start.y + delta.y;

    if let Some(b) = bounds {
        x = clamp_span(x, start.x, start.width, b.x, b.right());
        y = clamp_span(y, start.y, start.height, b.y, b.bottom());
    }

    Rect::new(x, y, start.width, start.height)
}

fn clamp_span(pos: i32, start: i32, len: u32, lo: i32, hi: i32) -> i32 {
    // start always lies inside [lo, hi], so the range is never inverted
    let lo = lo.min(start);
    let hi = (hi - len as i32).max(start);
    pos.clamp(lo, hi)
}

/// Move the edges named by `edge` by `delta`.
///
/// Moving edges are clamped to `bounds` first (an edge that already started
/// outside may not travel further out), then the minimum size is enforced
/// by keeping the opposite edge anchored.
pub fn resize_rect(
    start: Rect,
    edge: Edge,
    delta: Point,
    min_size: Size,
    bounds: Option<Rect>,
) -> Rect {
    let mut left = start.x;
    let mut top = start.y;
    let mut right = start.right();
    let mut bottom = start.bottom();

    if edge.touches_left() {
        left += delta.x;
    }
    if edge.touches_right() {
        right += delta.x;
    }
    if edge.touches_top() {
        top += delta.y;
    }
    if edge.touches_bottom() {
        bottom += delta.y;
    }

    if let Some(b) = bounds {
        if edge.touches_left() {
            left = left.max(b.x.min(start.x));
        }
        if edge.touches_right() {
            right = right.min(b.right().max(start.right()));
        }
        if edge.touches_top() {
            top = top.max(b.y.min(start.y));
        }
        if edge.touches_bottom() {
            bottom = bottom.min(b.bottom().max(start.bottom()));
        }
    }

    let min_w = min_size.width as i32;
    let min_h = min_size.height as i32;

    if right - left < min_w {
        if edge.touches_left() {
            left = start.right() - min_w;
            right = start.right();
        } else {
            right = left + min_w;
        }
    }

    if bottom - top < min_h {
        if edge.touches_top() {
            top = start.bottom() - min_h;
            bottom = start.bottom();
        } else {
            bottom = top + min_h;
        }
    }

    Rect::from_edges(left, top, right, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Rect = Rect {
        x: 100,
        y: 100,
        width: 800,
        height: 600,
    };
    const MIN: Size = Size::new(200, 150);
    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1040,
    };

    fn d(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn move_without_bounds() {
        assert_eq!(move_rect(START, d(-300, 50), None), Rect::new(-200, 150, 800, 600));
    }

    #[test]
    fn move_clamped_to_screen() {
        assert_eq!(move_rect(START, d(-300, -500), Some(SCREEN)), Rect::new(0, 0, 800, 600));
        assert_eq!(
            move_rect(START, d(5000, 5000), Some(SCREEN)),
            Rect::new(1120, 440, 800, 600)
        );
    }

    #[test]
    fn move_larger_than_screen_cannot_go_further_out() {
        let big = Rect::new(50, 50, 2000, 600);
        assert_eq!(move_rect(big, d(10, 10), Some(SCREEN)), Rect::new(50, 60, 2000, 600));
        assert_eq!(move_rect(big, d(-100, 0), Some(SCREEN)), Rect::new(0, 50, 2000, 600));
    }

    #[test]
    fn move_from_offscreen_does_not_jump() {
        let off = Rect::new(-500, 100, 800, 600);
        // First pixel of the drag keeps the offset
        assert_eq!(move_rect(off, d(1, 0), Some(SCREEN)).x, -499);
        // Further out is held at the start
        assert_eq!(move_rect(off, d(-30, 0), Some(SCREEN)).x, -500);
        // Back on screen the usual clamp applies
        assert_eq!(move_rect(off, d(2000, 0), Some(SCREEN)).x, 1120);
    }

    #[test]
    fn move_across_side_by_side_monitors() {
        let left = Rect::new(0, 0, 1920, 1040);
        let right = Rect::new(1920, 0, 2560, 1400);
        let desktop = left.union(&right);

        let session = DragSession::begin(d(500, 400), START, None, Some(desktop));
        assert_eq!(session.update(d(3000, 400), MIN), Rect::new(2600, 100, 800, 600));
        assert_eq!(session.update(d(9000, 400), MIN).right(), 4480);
    }

    #[test]
    fn resize_each_side() {
        assert_eq!(resize_rect(START, Edge::Right, d(50, 99), MIN, None), Rect::new(100, 100, 850, 600));
        assert_eq!(resize_rect(START, Edge::Bottom, d(99, 50), MIN, None), Rect::new(100, 100, 800, 650));
        assert_eq!(resize_rect(START, Edge::Left, d(50, 99), MIN, None), Rect::new(150, 100, 750, 600));
        assert_eq!(resize_rect(START, Edge::Top, d(99, 50), MIN, None), Rect::new(100, 150, 800, 550));
    }

    #[test]
    fn resize_corners_move_two_edges() {
        assert_eq!(
            resize_rect(START, Edge::TopLeft, d(-20, -30), MIN, None),
            Rect::new(80, 70, 820, 630)
        );
        assert_eq!(
            resize_rect(START, Edge::BottomRight, d(20, 30), MIN, None),
            Rect::new(100, 100, 820, 630)
        );
        assert_eq!(
            resize_rect(START, Edge::TopRight, d(20, 30), MIN, None),
            Rect::new(100, 130, 820, 570)
        );
        assert_eq!(
            resize_rect(START, Edge::BottomLeft, d(20, 30), MIN, None),
            Rect::new(120, 100, 780, 630)
        );
    }

    #[test]
    fn left_resize_below_minimum_keeps_right_edge() {
        let r = resize_rect(START, Edge::Left, d(700, 0), MIN, None);
        assert_eq!(r, Rect::new(700, 100, 200, 600));
        assert_eq!(r.right(), START.right());
    }

    #[test]
    fn top_resize_below_minimum_keeps_bottom_edge() {
        let r = resize_rect(START, Edge::Top, d(0, 1000), MIN, None);
        assert_eq!(r, Rect::new(100, 550, 800, 150));
        assert_eq!(r.bottom(), START.bottom());
    }

    #[test]
    fn right_and_bottom_resize_below_minimum_keep_origin() {
        let r = resize_rect(START, Edge::BottomRight, d(-2000, -2000), MIN, None);
        assert_eq!(r, Rect::new(100, 100, 200, 150));
    }

    #[test]
    fn resize_clamped_to_screen() {
        let r = resize_rect(START, Edge::TopLeft, d(-500, -500), MIN, Some(SCREEN));
        assert_eq!(r, Rect::new(0, 0, 900, 700));

        let r = resize_rect(START, Edge::BottomRight, d(5000, 5000), MIN, Some(SCREEN));
        assert_eq!(r, Rect::new(100, 100, 1820, 940));
    }

    #[test]
    fn resize_edge_already_outside_does_not_jump() {
        let off = Rect::new(-50, 100, 800, 600);
        // Left edge moves inward: allowed
        assert_eq!(resize_rect(off, Edge::Left, d(20, 0), MIN, Some(SCREEN)).x, -30);
        // Left edge moves further out: held where it started
        assert_eq!(resize_rect(off, Edge::Left, d(-20, 0), MIN, Some(SCREEN)).x, -50);
    }

    #[test]
    fn resize_only_clamps_moving_edges() {
        let off = Rect::new(-50, 100, 800, 600);
        let r = resize_rect(off, Edge::Right, d(10, 0), MIN, Some(SCREEN));
        assert_eq!(r, Rect::new(-50, 100, 810, 600));
    }

    #[test]
    fn session_moves_from_center() {
        let session = DragSession::begin(d(500, 400), START, None, None);
        assert_eq!(session.update(d(510, 380), MIN), Rect::new(110, 80, 800, 600));
        // Always relative to the press, not to the previous tick
        assert_eq!(session.update(d(500, 400), MIN), START);
    }

    #[test]
    fn session_resizes_from_edge() {
        let session = DragSession::begin(d(899, 400), START, Some(Edge::Right), Some(SCREEN));
        assert_eq!(session.update(d(949, 999), MIN), Rect::new(100, 100, 850, 600));
        assert_eq!(session.update(d(0, 400), MIN), Rect::new(100, 100, 200, 600));
    }
}
