//! Resize handles for canvas items.

use kurbo::{Point, Rect};

/// Side length of a handle square, in item-local units.
pub const HANDLE_SIZE: f64 = 15.0;

/// One of the eight resize handles around an item.
///
/// The declaration order is the hit-test order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    Left,
    BottomLeft,
}

/// Which end of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The low end (left or top edge).
    Start,
    /// The high end (right or bottom edge).
    End,
}

/// Pointer cursor requested by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Arrow,
    /// `\` diagonal, for top-left and bottom-right handles.
    ResizeForwardDiagonal,
    /// `/` diagonal, for top-right and bottom-left handles.
    ResizeBackwardDiagonal,
    ResizeVertical,
    ResizeHorizontal,
    /// View is being panned.
    ClosedHand,
}

impl HandleKind {
    /// All handles in hit-test order.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::Top,
        HandleKind::TopRight,
        HandleKind::Right,
        HandleKind::BottomRight,
        HandleKind::Bottom,
        HandleKind::Left,
        HandleKind::BottomLeft,
    ];

    /// Check if this is a corner handle (drags two edges).
    pub fn is_corner(self) -> bool {
        self.horizontal_side().is_some() && self.vertical_side().is_some()
    }

    /// The vertical edge this handle drags, if any.
    pub fn horizontal_side(self) -> Option<Side> {
        match self {
            HandleKind::TopLeft | HandleKind::Left | HandleKind::BottomLeft => Some(Side::Start),
            HandleKind::TopRight | HandleKind::Right | HandleKind::BottomRight => Some(Side::End),
            HandleKind::Top | HandleKind::Bottom => None,
        }
    }

    /// The horizontal edge this handle drags, if any.
    pub fn vertical_side(self) -> Option<Side> {
        match self {
            HandleKind::TopLeft | HandleKind::Top | HandleKind::TopRight => Some(Side::Start),
            HandleKind::BottomLeft | HandleKind::Bottom | HandleKind::BottomRight => Some(Side::End),
            HandleKind::Left | HandleKind::Right => None,
        }
    }

    /// The handle across the item, which stays put while this one is dragged.
    pub fn opposite(self) -> HandleKind {
        match self {
            HandleKind::TopLeft => HandleKind::BottomRight,
            HandleKind::Top => HandleKind::Bottom,
            HandleKind::TopRight => HandleKind::BottomLeft,
            HandleKind::Right => HandleKind::Left,
            HandleKind::BottomRight => HandleKind::TopLeft,
            HandleKind::Bottom => HandleKind::Top,
            HandleKind::Left => HandleKind::Right,
            HandleKind::BottomLeft => HandleKind::TopRight,
        }
    }

    /// Centre of this handle on the given rectangle.
    pub fn anchor(self, bounds: Rect) -> Point {
        let center = bounds.center();
        let x = match self.horizontal_side() {
            Some(Side::Start) => bounds.x0,
            Some(Side::End) => bounds.x1,
            None => center.x,
        };
        let y = match self.vertical_side() {
            Some(Side::Start) => bounds.y0,
            Some(Side::End) => bounds.y1,
            None => center.y,
        };
        Point::new(x, y)
    }

    /// Resize cursor for this handle.
    pub fn cursor(self) -> CursorShape {
        match self {
            HandleKind::TopLeft | HandleKind::BottomRight => CursorShape::ResizeForwardDiagonal,
            HandleKind::TopRight | HandleKind::BottomLeft => CursorShape::ResizeBackwardDiagonal,
            HandleKind::Top | HandleKind::Bottom => CursorShape::ResizeVertical,
            HandleKind::Left | HandleKind::Right => CursorShape::ResizeHorizontal,
        }
    }
}

/// Cursor for the handle under the pointer while in resize mode.
pub fn cursor_for_handle(handle: Option<HandleKind>) -> CursorShape {
    handle.map_or(CursorShape::Arrow, HandleKind::cursor)
}

/// A handle and its hit region in item-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub rect: Rect,
}

/// The eight handle regions derived from an item's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleSet {
    handles: [Handle; 8],
}

impl HandleSet {
    /// Compute handles for the given local bounds.
    pub fn new(bounds: Rect) -> Self {
        let handles = HandleKind::ALL.map(|kind| Handle {
            kind,
            rect: square_at(kind.anchor(bounds)),
        });
        Self { handles }
    }

    /// Recompute handle regions after the bounds changed.
    pub fn update(&mut self, bounds: Rect) {
        *self = Self::new(bounds);
    }

    /// First handle (in hit-test order) whose square contains `point`.
    pub fn handle_at(&self, point: Point) -> Option<HandleKind> {
        self.handles
            .iter()
            .find(|handle| handle.rect.contains(point))
            .map(|handle| handle.kind)
    }

    /// Hit region of a specific handle.
    pub fn rect(&self, kind: HandleKind) -> Rect {
        self.handles
            .iter()
            .find(|handle| handle.kind == kind)
            .map(|handle| handle.rect)
            .unwrap_or(Rect::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        self.handles.iter()
    }
}

fn square_at(center: Point) -> Rect {
    Rect::from_center_size(center, (HANDLE_SIZE, HANDLE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn test_handle_positions() {
        let handles = HandleSet::new(bounds());
        assert_eq!(handles.rect(HandleKind::TopLeft).center(), Point::new(0.0, 0.0));
        assert_eq!(handles.rect(HandleKind::Top).center(), Point::new(100.0, 0.0));
        assert_eq!(handles.rect(HandleKind::Right).center(), Point::new(200.0, 50.0));
        assert_eq!(handles.rect(HandleKind::BottomLeft).center(), Point::new(0.0, 100.0));
        assert!((handles.rect(HandleKind::Bottom).width() - HANDLE_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_hit_test() {
        let handles = HandleSet::new(bounds());
        assert_eq!(handles.handle_at(Point::new(3.0, 3.0)), Some(HandleKind::TopLeft));
        assert_eq!(handles.handle_at(Point::new(198.0, 98.0)), Some(HandleKind::BottomRight));
        assert_eq!(handles.handle_at(Point::new(101.0, 99.0)), Some(HandleKind::Bottom));
        assert_eq!(handles.handle_at(Point::new(100.0, 50.0)), None);
    }

    #[test]
    fn test_overlapping_handles_use_enumeration_order() {
        // On a tiny item every handle overlaps; the first in order wins.
        let handles = HandleSet::new(Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(handles.handle_at(Point::new(2.0, 2.0)), Some(HandleKind::TopLeft));
    }

    #[test]
    fn test_handles_follow_bounds() {
        let mut handles = HandleSet::new(bounds());
        handles.update(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(handles.rect(HandleKind::BottomRight).center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_cursor_mapping() {
        assert_eq!(HandleKind::TopLeft.cursor(), CursorShape::ResizeForwardDiagonal);
        assert_eq!(HandleKind::BottomRight.cursor(), CursorShape::ResizeForwardDiagonal);
        assert_eq!(HandleKind::TopRight.cursor(), CursorShape::ResizeBackwardDiagonal);
        assert_eq!(HandleKind::BottomLeft.cursor(), CursorShape::ResizeBackwardDiagonal);
        assert_eq!(HandleKind::Top.cursor(), CursorShape::ResizeVertical);
        assert_eq!(HandleKind::Left.cursor(), CursorShape::ResizeHorizontal);
        assert_eq!(cursor_for_handle(None), CursorShape::Arrow);
    }

    #[test]
    fn test_corner_classification() {
        assert!(HandleKind::TopRight.is_corner());
        assert!(!HandleKind::Bottom.is_corner());
        assert_eq!(HandleKind::Left.horizontal_side(), Some(Side::Start));
        assert_eq!(HandleKind::Left.vertical_side(), None);
    }
}
