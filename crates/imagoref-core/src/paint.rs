//! Backend-agnostic display list for the canvas.
//!
//! The core never rasterizes. Painting produces a list of draw operations in
//! scene coordinates that a renderer replays back to front.

use crate::item::ItemId;
use image::RgbaImage;
use kurbo::{Affine, Rect};
use peniko::Color;

/// Width of the hover/selection outline.
pub const OUTLINE_WIDTH: f64 = 2.0;
/// Stroke width of resize handle circles.
pub const HANDLE_STROKE_WIDTH: f64 = 2.0;
/// Diameter of a background grid dot.
pub const GRID_DOT_SIZE: f64 = 3.0;

pub fn outline_color() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

pub fn handle_fill_color() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

pub fn handle_stroke_color() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

/// A single draw operation.
#[derive(Debug, Clone)]
pub enum DrawOp<'a> {
    /// Dotted background grid covering `area`.
    Grid {
        area: Rect,
        spacing: f64,
        color: Color,
        dot_size: f64,
    },
    /// Item pixels stretched into `dest` (item-local), placed by `transform`.
    Image {
        item: ItemId,
        pixels: &'a RgbaImage,
        dest: Rect,
        transform: Affine,
    },
    /// Stroked rectangle (item-local), placed by `transform`.
    Outline {
        rect: Rect,
        transform: Affine,
        color: Color,
        width: f64,
    },
    /// Circular resize handle inscribed in `rect` (item-local).
    Handle {
        rect: Rect,
        transform: Affine,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    },
    /// Rubber-band selection rectangle in scene coordinates.
    RubberBand { rect: Rect },
}

/// Ordered draw operations, back to front.
#[derive(Debug, Clone, Default)]
pub struct DisplayList<'a> {
    ops: Vec<DrawOp<'a>>,
}

impl<'a> DisplayList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DrawOp<'a>) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp<'a>] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Items in the order their pixels are drawn.
    pub fn image_order(&self) -> Vec<ItemId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { item, .. } => Some(*item),
                _ => None,
            })
            .collect()
    }
}
