//! Edge and corner classification

use capture::Point;

/// Window edge or corner under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Edge {
    /// Classify a window-relative position.
    ///
    /// Returns `None` for the center (drag) area. Corners win over edges.
    pub fn at(pos: Point, width: u32, height: u32, margin: u32) -> Option<Edge> {
        let (x, y) = (pos.x, pos.y);
        let (width, height, margin) = (width as i32, height as i32, margin as i32);

        let near_left = x < margin;
        let near_right = x > width - margin;
        let near_top = y < margin;
        let near_bottom = y > height - margin;

        if near_top && near_left {
            return Some(Edge::TopLeft);
        }
        if near_top && near_right {
            return Some(Edge::TopRight);
        }
        if near_bottom && near_left {
            return Some(Edge::BottomLeft);
        }
        if near_bottom && near_right {
            return Some(Edge::BottomRight);
        }

        if near_top {
            return Some(Edge::Top);
        }
        if near_bottom {
            return Some(Edge::Bottom);
        }
        if near_left {
            return Some(Edge::Left);
        }
        if near_right {
            return Some(Edge::Right);
        }

        None
    }

    pub fn touches_left(self) -> bool {
        matches!(self, Edge::Left | Edge::TopLeft | Edge::BottomLeft)
    }

    pub fn touches_right(self) -> bool {
        matches!(self, Edge::Right | Edge::TopRight | Edge::BottomRight)
    }

    pub fn touches_top(self) -> bool {
        matches!(self, Edge::Top | Edge::TopLeft | Edge::TopRight)
    }

    pub fn touches_bottom(self) -> bool {
        matches!(self, Edge::Bottom | Edge::BottomLeft | Edge::BottomRight)
    }
}

/// Pointer shape to show for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Move,
    Horizontal,
    Vertical,
    /// Top-left to bottom-right
    DiagonalNwSe,
    /// Top-right to bottom-left
    DiagonalNeSw,
}

impl CursorShape {
    pub fn for_edge(edge: Option<Edge>) -> CursorShape {
        match edge {
            None => CursorShape::Move,
            Some(Edge::Left | Edge::Right) => CursorShape::Horizontal,
            Some(Edge::Top | Edge::Bottom) => CursorShape::Vertical,
            Some(Edge::TopLeft | Edge::BottomRight) => CursorShape::DiagonalNwSe,
            Some(Edge::TopRight | Edge::BottomLeft) => CursorShape::DiagonalNeSw,
        }
    }
}
