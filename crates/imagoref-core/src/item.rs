//! Canvas items: placed images and their direct-manipulation state.

use crate::paint::{self, DisplayList, DrawOp};
use crate::resize::{self, MIN_ITEM_EXTENT};
use crate::widget::{CursorShape, HandleKind, HandleSet, ItemState, HANDLE_SIZE, cursor_for_handle};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use kurbo::{Affine, Point, Rect, Vec2};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of a canvas item.
pub type ItemId = Uuid;

/// Errors when turning a bitmap into a canvas item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Drawable, hit-testable element of a scene.
pub trait SceneItem {
    /// Get the item's identifier.
    fn id(&self) -> ItemId;

    /// Axis-aligned bounding box in scene coordinates.
    fn scene_bounds(&self) -> Rect;

    /// Check if a scene point lands on the item.
    fn hit_test(&self, point: Point) -> bool;

    /// Append the item's draw operations.
    fn paint<'a>(&'a self, out: &mut DisplayList<'a>);
}

/// Local bounds plus scene position: everything a resize changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub bounds: Rect,
    pub position: Point,
}

/// A finished drag-move, ready to be recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEdit {
    pub id: ItemId,
    pub from: Point,
    pub to: Point,
}

/// A finished handle drag, ready to be recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEdit {
    pub id: ItemId,
    pub before: Geometry,
    pub after: Geometry,
}

#[derive(Debug, Clone, Copy)]
enum Drag {
    Handle {
        handle: HandleKind,
        initial_bounds: Rect,
        initial_pointer: Point,
        initial_position: Point,
        /// Scene location of the opposite handle, pinned for the whole drag.
        anchor: Point,
    },
    Move {
        initial_position: Point,
    },
}

/// Upper bound on resampling, as a multiple of the base pixel size. Larger
/// bounds stretch the capped buffer.
pub const MAX_RESAMPLE_FACTOR: f64 = 4.0;

/// A placed image on the canvas.
#[derive(Debug)]
pub struct CanvasItem {
    id: ItemId,
    /// Original pixels. Every displayed buffer is resampled from these.
    base_pixels: RgbaImage,
    /// `base_pixels` resampled to the last settled size.
    display_pixels: RgbaImage,
    /// Local bounds, origin always at (0, 0).
    bounds: Rect,
    /// Top-left in scene coordinates.
    position: Point,
    /// Accumulated rotation about the bounds centre, clockwise.
    rotation_degrees: f64,
    selected: bool,
    hovered: bool,
    resize_mode: bool,
    active_handle: Option<HandleKind>,
    handles: HandleSet,
    drag: Option<Drag>,
}

impl CanvasItem {
    /// Wrap a decoded bitmap. The item starts at its natural pixel size.
    pub fn new(pixels: RgbaImage) -> Result<Self, IngestError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(IngestError::EmptyImage { width, height });
        }
        let bounds = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        Ok(Self {
            id: Uuid::new_v4(),
            display_pixels: pixels.clone(),
            base_pixels: pixels,
            bounds,
            position: Point::ZERO,
            rotation_degrees: 0.0,
            selected: false,
            hovered: false,
            resize_mode: false,
            active_handle: None,
            handles: HandleSet::new(bounds),
            drag: None,
        })
    }

    /// Set the initial scene position.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Local bounds. The origin is always (0, 0).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Scene position of the unrotated top-left corner.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Rotation in degrees, clockwise.
    pub fn rotation(&self) -> f64 {
        self.rotation_degrees
    }

    /// Snapshot of bounds and position, as recorded by resize edits.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            bounds: self.bounds,
            position: self.position,
        }
    }

    /// Pixels as decoded, never modified.
    pub fn base_pixels(&self) -> &RgbaImage {
        &self.base_pixels
    }

    /// Pixels resampled for the last settled size.
    pub fn display_pixels(&self) -> &RgbaImage {
        &self.display_pixels
    }

    /// Resize handles around the local bounds.
    pub fn handles(&self) -> &HandleSet {
        &self.handles
    }

    /// Check if the item is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Check if the pointer is over the item.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Check if the item shows its resize handles.
    pub fn is_resize_mode(&self) -> bool {
        self.resize_mode
    }

    /// Handle being dragged, if any.
    pub fn active_handle(&self) -> Option<HandleKind> {
        self.active_handle
    }

    /// Current interaction state.
    pub fn state(&self) -> ItemState {
        match self.drag {
            Some(Drag::Handle { handle, .. }) => ItemState::DraggingHandle(handle),
            Some(Drag::Move { .. }) => ItemState::DraggingMove,
            None if self.resize_mode => ItemState::ResizeMode,
            None if self.selected => ItemState::Selected,
            None if self.hovered => ItemState::Hovered,
            None => ItemState::Idle,
        }
    }

    /// Local-to-scene transform: rotation about the bounds centre, then translation.
    pub fn transform(&self) -> Affine {
        local_to_scene(self.position, self.bounds, self.rotation_degrees)
    }

    /// Map a local point to scene coordinates.
    pub fn map_to_scene(&self, local: Point) -> Point {
        self.transform() * local
    }

    /// Map a scene point to local coordinates.
    pub fn map_from_scene(&self, scene: Point) -> Point {
        self.transform().inverse() * scene
    }

    /// Bounding box of the (possibly rotated) bounds in scene coordinates.
    pub fn scene_rect(&self) -> Rect {
        self.transform().transform_rect_bbox(self.bounds)
    }

    /// Move the item without touching its pixels.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Add `delta_degrees` to the rotation, clockwise.
    pub fn rotate_by(&mut self, delta_degrees: f64) {
        self.rotation_degrees += delta_degrees;
    }

    /// Reposition and resize together, then resample the display pixels.
    pub fn set_geometry(&mut self, bounds: Rect, position: Point) {
        self.position = position;
        self.bounds = Rect::new(
            0.0,
            0.0,
            bounds.width().max(MIN_ITEM_EXTENT),
            bounds.height().max(MIN_ITEM_EXTENT),
        );
        self.handles.update(self.bounds);
        self.resample();
    }

    /// Pixel size the display buffer should have for the current bounds.
    /// Never more than `MAX_RESAMPLE_FACTOR` times the base size.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (base_width, base_height) = self.base_pixels.dimensions();
        let extent = |length: f64, base: u32| {
            let cap = (f64::from(base) * MAX_RESAMPLE_FACTOR).max(1.0);
            length.round().clamp(1.0, cap) as u32
        };
        (
            extent(self.bounds.width(), base_width),
            extent(self.bounds.height(), base_height),
        )
    }

    /// Check if the display buffer lags behind the bounds (mid-drag).
    pub fn is_display_stale(&self) -> bool {
        self.display_pixels.dimensions() != self.pixel_size()
    }

    fn resample(&mut self) {
        let (width, height) = self.pixel_size();
        if self.display_pixels.dimensions() == (width, height) {
            return;
        }
        log::debug!("Resampling item {} to {}x{}", self.id, width, height);
        self.display_pixels = imageops::resize(&self.base_pixels, width, height, FilterType::Triangle);
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        if !selected {
            self.set_resize_mode(false);
        }
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Toggle resize mode. While on, the item shows handles and cannot be moved.
    pub fn set_resize_mode(&mut self, enabled: bool) {
        if self.resize_mode == enabled {
            return;
        }
        self.resize_mode = enabled;
        if enabled {
            self.handles.update(self.bounds);
        } else {
            self.active_handle = None;
        }
    }

    /// Handle under a local point. Only resize mode exposes handles.
    pub fn handle_at(&self, local: Point) -> Option<HandleKind> {
        if !self.resize_mode {
            return None;
        }
        self.handles.handle_at(local)
    }

    /// Cursor to show with the pointer at a scene point over this item.
    pub fn cursor_at(&self, scene: Point) -> CursorShape {
        if !self.resize_mode {
            return CursorShape::Arrow;
        }
        cursor_for_handle(self.handle_at(self.map_from_scene(scene)))
    }

    /// Start dragging the handle under `scene`, if any.
    pub fn begin_handle_drag(&mut self, scene: Point) -> Option<HandleKind> {
        let handle = self.handle_at(self.map_from_scene(scene))?;
        self.active_handle = Some(handle);
        self.drag = Some(Drag::Handle {
            handle,
            initial_bounds: self.bounds,
            initial_pointer: scene,
            initial_position: self.position,
            anchor: self.map_to_scene(handle.opposite().anchor(self.bounds)),
        });
        Some(handle)
    }

    /// Follow the pointer during a handle drag. Geometry changes live; pixels
    /// are only resampled when the drag finishes.
    ///
    /// The resize happens along the item's own axes, so a rotated item grows
    /// along its rotated sides while the opposite handle stays put in the scene.
    pub fn drag_handle_to(&mut self, scene: Point, keep_aspect: bool) {
        let Some(Drag::Handle {
            handle,
            initial_bounds,
            initial_pointer,
            anchor,
            ..
        }) = self.drag
        else {
            return;
        };
        let unrotate = Affine::rotate(-self.rotation_degrees.to_radians());
        let local_delta = (unrotate * (scene - initial_pointer).to_point()).to_vec2();
        let aspect = keep_aspect.then(|| resize::aspect_ratio(initial_bounds.width(), initial_bounds.height()));
        let rect = resize::resize_rect(initial_bounds, handle, local_delta, aspect);

        let bounds = Rect::new(0.0, 0.0, rect.width(), rect.height());
        let pinned = local_to_scene(Point::ZERO, bounds, self.rotation_degrees) * handle.opposite().anchor(bounds);
        self.position = anchor - pinned.to_vec2();
        self.bounds = bounds;
        self.handles.update(self.bounds);
    }

    /// End a handle drag. Returns the edit if the geometry changed.
    pub fn finish_handle_drag(&mut self) -> Option<ResizeEdit> {
        let Some(Drag::Handle {
            initial_bounds,
            initial_position,
            ..
        }) = self.drag
        else {
            return None;
        };
        self.drag = None;
        self.active_handle = None;
        self.resample();

        if self.bounds == initial_bounds && self.position == initial_position {
            return None;
        }
        Some(ResizeEdit {
            id: self.id,
            before: Geometry {
                bounds: initial_bounds,
                position: initial_position,
            },
            after: self.geometry(),
        })
    }

    /// Start a drag-move. Items in resize mode are not movable.
    pub fn begin_move(&mut self) -> bool {
        let state = self.state();
        if state.is_resize_mode() || state.is_dragging() {
            return false;
        }
        self.drag = Some(Drag::Move {
            initial_position: self.position,
        });
        true
    }

    /// Offset the item from where the drag-move started.
    pub fn drag_move_by(&mut self, delta: Vec2) {
        if let Some(Drag::Move { initial_position }) = self.drag {
            self.position = initial_position + delta;
        }
    }

    /// End a drag-move. Returns the edit if the item actually moved.
    pub fn finish_move(&mut self) -> Option<MoveEdit> {
        let Some(Drag::Move { initial_position }) = self.drag else {
            return None;
        };
        self.drag = None;
        (self.position != initial_position).then_some(MoveEdit {
            id: self.id,
            from: initial_position,
            to: self.position,
        })
    }

    /// Drop all transient interaction state (item left the scene).
    pub(crate) fn reset_interaction(&mut self) {
        self.selected = false;
        self.hovered = false;
        self.resize_mode = false;
        self.active_handle = None;
        self.drag = None;
    }
}

fn local_to_scene(position: Point, bounds: Rect, rotation_degrees: f64) -> Affine {
    Affine::translate(position.to_vec2()) * Affine::rotate_about(rotation_degrees.to_radians(), bounds.center())
}

impl SceneItem for CanvasItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn scene_bounds(&self) -> Rect {
        self.scene_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        let local = self.map_from_scene(point);
        let area = if self.resize_mode {
            self.bounds.inflate(HANDLE_SIZE / 2.0, HANDLE_SIZE / 2.0)
        } else {
            self.bounds
        };
        area.contains(local)
    }

    fn paint<'a>(&'a self, out: &mut DisplayList<'a>) {
        let transform = self.transform();
        out.push(DrawOp::Image {
            item: self.id,
            pixels: &self.display_pixels,
            dest: self.bounds,
            transform,
        });

        if self.selected || self.hovered {
            out.push(DrawOp::Outline {
                rect: self.bounds,
                transform,
                color: paint::outline_color(),
                width: paint::OUTLINE_WIDTH,
            });
        }

        if self.resize_mode {
            for handle in self.handles.iter() {
                out.push(DrawOp::Handle {
                    rect: handle.rect,
                    transform,
                    fill: paint::handle_fill_color(),
                    stroke: paint::handle_stroke_color(),
                    stroke_width: paint::HANDLE_STROKE_WIDTH,
                });
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn test_item(width: u32, height: u32) -> CanvasItem {
    let pixels = RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    CanvasItem::new(pixels).expect("non-empty test image")
}
