//! Handle-driven resize geometry.

use crate::widget::{HandleKind, Side};
use kurbo::{Rect, Vec2};

/// Smallest width or height an item can be resized to, in scene units.
pub const MIN_ITEM_EXTENT: f64 = 1.0;

/// Width/height ratio used for aspect-locked resizing.
///
/// Degenerate sizes fall back to a square ratio.
pub fn aspect_ratio(width: f64, height: f64) -> f64 {
    let ratio = if height > 0.0 { width / height } else { 1.0 };
    if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 }
}

/// Resize `initial` by dragging `handle` by `delta`.
///
/// `aspect` is the width/height ratio to keep, if aspect lock is held. The side
/// or corner opposite the handle stays fixed; edge handles keep the centre line
/// of the perpendicular axis fixed. Both dimensions are clamped to
/// [`MIN_ITEM_EXTENT`].
pub fn resize_rect(initial: Rect, handle: HandleKind, delta: Vec2, aspect: Option<f64>) -> Rect {
    let horizontal = handle.horizontal_side();
    let vertical = handle.vertical_side();

    let (mut x0, mut x1) = (initial.x0, initial.x1);
    let (mut y0, mut y1) = (initial.y0, initial.y1);
    match horizontal {
        Some(Side::Start) => x0 += delta.x,
        Some(Side::End) => x1 += delta.x,
        None => {}
    }
    match vertical {
        Some(Side::Start) => y0 += delta.y,
        Some(Side::End) => y1 += delta.y,
        None => {}
    }

    let mut width = x1 - x0;
    let mut height = y1 - y0;

    if let Some(ratio) = aspect {
        if handle.is_corner() {
            // The axis that moved further drives
            if delta.x.abs() > delta.y.abs() {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
        } else if horizontal.is_none() {
            width = height * ratio;
        } else {
            height = width / ratio;
        }
    }

    let (width, height) = clamp_extent(width, height, aspect);

    let x0 = match horizontal {
        Some(Side::Start) => initial.x1 - width,
        Some(Side::End) => initial.x0,
        None => initial.center().x - width / 2.0,
    };
    let y0 = match vertical {
        Some(Side::Start) => initial.y1 - height,
        Some(Side::End) => initial.y0,
        None => initial.center().y - height / 2.0,
    };

    Rect::new(x0, y0, x0 + width, y0 + height)
}

fn clamp_extent(width: f64, height: f64, aspect: Option<f64>) -> (f64, f64) {
    match aspect {
        Some(ratio) if width < MIN_ITEM_EXTENT || height < MIN_ITEM_EXTENT => {
            // Smallest size with the locked ratio where both sides are valid.
            if ratio >= 1.0 {
                (MIN_ITEM_EXTENT * ratio, MIN_ITEM_EXTENT)
            } else {
                (MIN_ITEM_EXTENT, MIN_ITEM_EXTENT / ratio)
            }
        }
        _ => (width.max(MIN_ITEM_EXTENT), height.max(MIN_ITEM_EXTENT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn item_rect() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn test_bottom_right_free_resize() {
        let r = resize_rect(item_rect(), HandleKind::BottomRight, Vec2::new(50.0, 50.0), None);
        assert_eq!(r, Rect::new(0.0, 0.0, 250.0, 150.0));
    }

    #[test]
    fn test_top_left_keeps_bottom_right_fixed() {
        let r = resize_rect(item_rect(), HandleKind::TopLeft, Vec2::new(20.0, -10.0), None);
        assert_eq!(r, Rect::new(20.0, -10.0, 200.0, 100.0));
    }

    #[test]
    fn test_edge_handle_moves_one_edge() {
        let r = resize_rect(item_rect(), HandleKind::Left, Vec2::new(-30.0, 40.0), None);
        assert_eq!(r, Rect::new(-30.0, 0.0, 200.0, 100.0));

        let r = resize_rect(item_rect(), HandleKind::Bottom, Vec2::new(99.0, 25.0), None);
        assert_eq!(r, Rect::new(0.0, 0.0, 200.0, 125.0));
    }

    #[test]
    fn test_aspect_lock_corner_x_drives() {
        let ratio = aspect_ratio(200.0, 100.0);
        let r = resize_rect(item_rect(), HandleKind::BottomRight, Vec2::new(100.0, 20.0), Some(ratio));
        assert!((r.width() - 300.0).abs() < EPS);
        assert!((r.height() - r.width() / 2.0).abs() < EPS);
        assert_eq!(r.origin(), kurbo::Point::ZERO);
    }

    #[test]
    fn test_aspect_lock_corner_y_drives() {
        let r = resize_rect(item_rect(), HandleKind::TopLeft, Vec2::new(-5.0, -50.0), Some(2.0));
        assert!((r.height() - 150.0).abs() < EPS);
        assert!((r.width() - 300.0).abs() < EPS);
        // Bottom-right corner stays put
        assert!((r.x1 - 200.0).abs() < EPS);
        assert!((r.y1 - 100.0).abs() < EPS);
    }

    #[test]
    fn test_aspect_lock_edge_derives_perpendicular() {
        let r = resize_rect(item_rect(), HandleKind::Bottom, Vec2::new(0.0, 50.0), Some(2.0));
        assert!((r.height() - 150.0).abs() < EPS);
        assert!((r.width() - 300.0).abs() < EPS);
        // Top edge fixed, horizontal centre line fixed
        assert!(r.y0.abs() < EPS);
        assert!((r.center().x - 100.0).abs() < EPS);

        let r = resize_rect(item_rect(), HandleKind::Right, Vec2::new(-100.0, 0.0), Some(2.0));
        assert!((r.width() - 100.0).abs() < EPS);
        assert!((r.height() - 50.0).abs() < EPS);
        assert!(r.x0.abs() < EPS);
    }

    #[test]
    fn test_collapse_is_clamped() {
        let r = resize_rect(item_rect(), HandleKind::BottomRight, Vec2::new(-500.0, -500.0), None);
        assert!((r.width() - MIN_ITEM_EXTENT).abs() < EPS);
        assert!((r.height() - MIN_ITEM_EXTENT).abs() < EPS);
        assert_eq!(r.origin(), kurbo::Point::ZERO);

        // Dragging the left edge past the right edge keeps the right edge anchored
        let r = resize_rect(item_rect(), HandleKind::Left, Vec2::new(400.0, 0.0), None);
        assert!((r.x1 - 200.0).abs() < EPS);
        assert!((r.width() - MIN_ITEM_EXTENT).abs() < EPS);
    }

    #[test]
    fn test_collapse_with_aspect_lock_keeps_ratio() {
        let r = resize_rect(item_rect(), HandleKind::BottomRight, Vec2::new(-300.0, 0.0), Some(2.0));
        assert!((r.width() - 2.0).abs() < EPS);
        assert!((r.height() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_aspect_ratio_degenerate() {
        assert!((aspect_ratio(10.0, 0.0) - 1.0).abs() < EPS);
        assert!((aspect_ratio(30.0, 10.0) - 3.0).abs() < EPS);
    }
}
