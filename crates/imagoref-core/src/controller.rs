//! Canvas controller: turns gestures and actions into scene edits.
//!
//! Every mutating edit is recorded in the history after it has been applied.
//! Pan and zoom only touch the camera and are never recorded.

use crate::actions::{CanvasAction, ShortcutRegistry};
use crate::camera::{Camera, ZOOM_STEP};
use crate::command::{AddCommand, MoveCommand, RemoveCommand, ResizeCommand, RotateCommand};
use crate::history::{Availability, HistoryStack};
use crate::input::{Key, Modifiers, MouseButton, PointerEvent};
use crate::item::{CanvasItem, IngestError, ItemId, MoveEdit};
use crate::paint::{DisplayList, DrawOp, GRID_DOT_SIZE};
use crate::scene::{Redraw, Scene};
use crate::settings::{Settings, SettingsResult, Theme};
use crate::snap::snap_to_grid;
use crate::widget::{CursorShape, cursor_for_handle};
use image::RgbaImage;
use kurbo::{Point, Rect, Size, Vec2};

/// Degrees applied by one rotate action.
pub const ROTATE_STEP_DEGREES: f64 = 90.0;

/// Viewport size used until the shell reports one.
pub const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

/// Pointer gesture in progress. Positions are in scene coordinates unless noted.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Middle-button pan. `last` is in screen coordinates.
    Panning { last: Point },
    MovingItems { origin: Point, items: Vec<ItemId> },
    ResizingItem { id: ItemId },
    RubberBand {
        origin: Point,
        current: Point,
        /// Selection kept when the band was started with Ctrl.
        base: Vec<ItemId>,
    },
}

/// Owns the scene, its history and the view.
#[derive(Debug)]
pub struct CanvasController {
    scene: Scene,
    history: HistoryStack,
    camera: Camera,
    settings: Settings,
    theme: Theme,
    viewport: Size,
    gesture: Gesture,
    cursor: CursorShape,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl CanvasController {
    pub fn new(settings: Settings) -> Self {
        Self {
            scene: Scene::new(),
            history: HistoryStack::with_limit(settings.history_limit),
            camera: Camera::new(),
            theme: settings.theme(),
            settings,
            viewport: DEFAULT_VIEWPORT,
            gesture: Gesture::Idle,
            cursor: CursorShape::Arrow,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
        self.scene.invalidate_all();
    }

    /// Check if a move or resize drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::MovingItems { .. } | Gesture::ResizingItem { .. })
    }

    /// Pending repaint area.
    pub fn take_redraw(&mut self) -> Redraw {
        self.scene.take_redraw()
    }

    // --- Settings ---

    pub fn set_grid_size(&mut self, grid_size: u32) -> SettingsResult<()> {
        self.settings.set_grid_size(grid_size)?;
        self.scene.invalidate_all();
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.set_theme(theme);
        self.theme = theme;
        self.scene.invalidate_all();
    }

    /// Replace all settings at once, e.g. after the settings dialog closes.
    pub fn apply_settings(&mut self, settings: Settings) -> SettingsResult<()> {
        settings.validate()?;
        self.history.set_limit(settings.history_limit);
        self.theme = settings.theme();
        self.settings = settings;
        self.scene.invalidate_all();
        Ok(())
    }

    // --- Ingestion ---

    /// Place a bitmap with its top-left at a scene point.
    pub fn insert_image(&mut self, pixels: RgbaImage, position: Point) -> Result<ItemId, IngestError> {
        let item = CanvasItem::new(pixels)?.with_position(position);
        let cmd = AddCommand::execute(item, &mut self.scene);
        let id = cmd.id();
        log::debug!("Added image {id} at ({:.1}, {:.1})", position.x, position.y);
        self.history.push(cmd);
        Ok(id)
    }

    /// Place a dropped bitmap with its top-left under the drop point.
    pub fn drop_image(&mut self, pixels: RgbaImage, screen_position: Point) -> Result<ItemId, IngestError> {
        let position = self.camera.screen_to_world(screen_position);
        self.insert_image(pixels, position)
    }

    /// Place a pasted bitmap with its top-left at the viewport centre.
    pub fn paste_image(&mut self, pixels: RgbaImage) -> Result<ItemId, IngestError> {
        let position = self.camera.screen_to_world(self.viewport_center());
        self.insert_image(pixels, position)
    }

    // --- Actions ---

    /// Run a named action.
    pub fn trigger(&mut self, action: CanvasAction) {
        log::debug!("Action {action:?}");
        match action {
            CanvasAction::Undo => {
                self.undo();
            }
            CanvasAction::Redo => {
                self.redo();
            }
            CanvasAction::DeleteSelected => self.delete_selected(),
            CanvasAction::SnapToGrid => self.snap_all_to_grid(),
            CanvasAction::ZoomIn => self.zoom_in(),
            CanvasAction::ZoomOut => self.zoom_out(),
            CanvasAction::EnterResizeMode => {
                self.enter_resize_mode();
            }
            CanvasAction::ExitResizeMode => self.exit_resize_mode(),
            CanvasAction::RotateLeft => self.rotate_left(),
            CanvasAction::RotateRight => self.rotate_right(),
        }
    }

    /// Dispatch a key press. Returns true if it was bound to an action.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match ShortcutRegistry::lookup(key, modifiers) {
            Some(action) => {
                self.trigger(action);
                true
            }
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.is_dragging() {
            log::debug!("Ignoring undo during a drag");
            return false;
        }
        self.history.undo(&mut self.scene)
    }

    pub fn redo(&mut self) -> bool {
        if self.is_dragging() {
            log::debug!("Ignoring redo during a drag");
            return false;
        }
        self.history.redo(&mut self.scene)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    /// Undo/redo availability if it changed since the last call.
    pub fn take_availability_change(&mut self) -> Option<Availability> {
        self.history.take_availability_change()
    }

    /// Remove every selected item as one undoable step.
    pub fn delete_selected(&mut self) {
        if self.is_dragging() {
            return;
        }
        let ids = self.scene.selected_items();
        if ids.is_empty() {
            return;
        }
        if let Some(cmd) = RemoveCommand::execute(&ids, &mut self.scene) {
            log::debug!("Deleted {} items", ids.len());
            self.history.push(cmd);
        }
    }

    /// Round every item's position to the grid. Not recorded in the history.
    pub fn snap_all_to_grid(&mut self) {
        if self.is_dragging() {
            return;
        }
        let grid = f64::from(self.settings.grid_size);
        let ids = self.scene.all_items().to_vec();
        for id in &ids {
            self.scene
                .update_item(*id, |item| item.set_position(snap_to_grid(item.position(), grid)));
        }
        log::info!("Snapped {} items to a {grid} grid", ids.len());
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_STEP, self.viewport_center());
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / ZOOM_STEP, self.viewport_center());
    }

    fn zoom_by(&mut self, factor: f64, screen_anchor: Point) {
        self.camera.zoom_at(screen_anchor, factor);
        self.scene.invalidate_all();
    }

    /// Show handles on the selected item. Needs exactly one selected item.
    pub fn enter_resize_mode(&mut self) -> bool {
        if self.is_dragging() {
            return false;
        }
        let selected = self.scene.selected_items();
        let [id] = selected.as_slice() else {
            log::debug!("Resize mode needs exactly one selected item, have {}", selected.len());
            return false;
        };
        self.scene.update_item(*id, |item| item.set_resize_mode(true)).is_some()
    }

    /// Leave resize mode on every item.
    ///
    /// A handle drag in progress ends here with its current geometry, which is
    /// recorded like a normal release.
    pub fn exit_resize_mode(&mut self) {
        if let Gesture::ResizingItem { id } = self.gesture {
            self.finish_resize(id);
            self.gesture = Gesture::Idle;
        }
        let ids = self.scene.all_items().to_vec();
        for id in ids {
            if self.scene.item(id).is_some_and(CanvasItem::is_resize_mode) {
                self.scene.update_item(id, |item| item.set_resize_mode(false));
            }
        }
        self.cursor = CursorShape::Arrow;
    }

    pub fn rotate_left(&mut self) {
        self.rotate_selected(-ROTATE_STEP_DEGREES);
    }

    pub fn rotate_right(&mut self) {
        self.rotate_selected(ROTATE_STEP_DEGREES);
    }

    fn rotate_selected(&mut self, delta_degrees: f64) {
        if self.is_dragging() {
            return;
        }
        let ids = self.scene.selected_items();
        if ids.is_empty() {
            return;
        }
        let grouped = ids.len() > 1;
        if grouped {
            self.history.begin_macro(format!("Rotate {} items", ids.len()));
        }
        for id in ids {
            if let Some(cmd) = RotateCommand::execute(id, delta_degrees, &mut self.scene) {
                self.history.push(cmd);
            }
        }
        if grouped {
            self.history.end_macro();
        }
    }

    // --- Pointer ---

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position, modifiers } => self.pointer_move(position, modifiers),
            PointerEvent::Up { position, button, .. } => self.pointer_up(position, button),
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => self.scroll(position, delta, modifiers),
        }
    }

    fn pointer_down(&mut self, screen: Point, button: MouseButton, modifiers: Modifiers) {
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }
        match button {
            MouseButton::Middle => {
                self.gesture = Gesture::Panning { last: screen };
                self.cursor = CursorShape::ClosedHand;
            }
            MouseButton::Left => {
                let point = self.camera.screen_to_world(screen);
                match self.scene.top_item_at(point) {
                    Some(id) => self.press_item(id, point, modifiers),
                    None => self.press_empty(point, modifiers),
                }
            }
            MouseButton::Right => {}
        }
    }

    fn press_item(&mut self, id: ItemId, point: Point, modifiers: Modifiers) {
        if self.scene.item(id).is_some_and(CanvasItem::is_resize_mode) {
            if let Some(Some(handle)) = self.scene.update_item(id, |item| item.begin_handle_drag(point)) {
                log::debug!("Resizing {id} by {handle:?}");
                self.gesture = Gesture::ResizingItem { id };
                self.cursor = cursor_for_handle(Some(handle));
            }
            return;
        }

        if modifiers.command() {
            self.scene.toggle_selection(id);
            if !self.scene.is_selected(id) {
                return;
            }
        } else if !self.scene.is_selected(id) {
            self.scene.select(id);
        }

        let items: Vec<ItemId> = self
            .scene
            .selected_items()
            .into_iter()
            .filter(|&selected| self.scene.update_item(selected, CanvasItem::begin_move).unwrap_or(false))
            .collect();
        if !items.is_empty() {
            self.gesture = Gesture::MovingItems { origin: point, items };
        }
    }

    fn press_empty(&mut self, point: Point, modifiers: Modifiers) {
        for id in self.scene.selected_items() {
            self.scene.update_item(id, |item| item.set_resize_mode(false));
        }
        let base = if modifiers.command() {
            self.scene.selected_items()
        } else {
            self.scene.clear_selection();
            Vec::new()
        };
        self.gesture = Gesture::RubberBand {
            origin: point,
            current: point,
            base,
        };
    }

    fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        let point = self.camera.screen_to_world(screen);
        if matches!(self.gesture, Gesture::Idle) {
            self.update_hover(point);
            return;
        }
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.camera.pan(delta);
                self.scene.invalidate_all();
            }
            Gesture::MovingItems { origin, items } => {
                let delta = point - *origin;
                for &id in items.iter() {
                    self.scene.update_item(id, |item| item.drag_move_by(delta));
                }
            }
            Gesture::ResizingItem { id } => {
                let id = *id;
                self.scene
                    .update_item(id, |item| item.drag_handle_to(point, modifiers.shift));
            }
            Gesture::RubberBand { origin, current, base } => {
                let previous = Rect::from_points(*origin, *current);
                *current = point;
                let band = Rect::from_points(*origin, point);
                let mut selection = base.clone();
                selection.extend(self.scene.items_in_rect(band));
                self.scene.set_selection(selection);
                self.scene.invalidate_region(previous.union(band));
            }
        }
    }

    fn update_hover(&mut self, point: Point) {
        let hovered = self.scene.top_item_at(point);
        self.scene.set_hovered(hovered);
        self.cursor = hovered
            .and_then(|id| self.scene.item(id))
            .map_or(CursorShape::Arrow, |item| item.cursor_at(point));
    }

    fn pointer_up(&mut self, screen: Point, button: MouseButton) {
        let gesture = std::mem::take(&mut self.gesture);
        match (button, gesture) {
            (MouseButton::Middle, Gesture::Panning { .. }) => {
                self.cursor = CursorShape::Arrow;
            }
            (MouseButton::Left, Gesture::MovingItems { items, .. }) => {
                let edits: Vec<MoveEdit> = items
                    .into_iter()
                    .filter_map(|id| self.scene.update_item(id, CanvasItem::finish_move).flatten())
                    .collect();
                self.record_moves(edits);
            }
            (MouseButton::Left, Gesture::ResizingItem { id }) => {
                self.finish_resize(id);
                let point = self.camera.screen_to_world(screen);
                self.update_hover(point);
            }
            (MouseButton::Left, Gesture::RubberBand { origin, current, .. }) => {
                self.scene.invalidate_region(Rect::from_points(origin, current));
            }
            (_, gesture) => self.gesture = gesture,
        }
    }

    fn finish_resize(&mut self, id: ItemId) {
        if let Some(edit) = self.scene.update_item(id, CanvasItem::finish_handle_drag).flatten() {
            log::debug!(
                "Resized {id} to {:.0}x{:.0}",
                edit.after.bounds.width(),
                edit.after.bounds.height()
            );
            self.history.push(ResizeCommand::from(edit));
        }
    }

    fn record_moves(&mut self, edits: Vec<MoveEdit>) {
        let grouped = edits.len() > 1;
        if grouped {
            self.history.begin_macro(format!("Move {} items", edits.len()));
        }
        for edit in edits {
            self.history.push(MoveCommand::from(edit));
        }
        if grouped {
            self.history.end_macro();
        }
    }

    /// Ctrl+wheel zooms under the pointer; a plain wheel pans.
    fn scroll(&mut self, screen: Point, delta: Vec2, modifiers: Modifiers) {
        if modifiers.command() {
            if delta.y > 0.0 {
                self.zoom_by(ZOOM_STEP, screen);
            } else if delta.y < 0.0 {
                self.zoom_by(1.0 / ZOOM_STEP, screen);
            }
        } else if delta != Vec2::ZERO {
            self.camera.pan(delta);
            self.scene.invalidate_all();
        }
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    // --- Painting ---

    /// Everything to draw, in scene coordinates. Apply `camera().transform()`
    /// to map it onto the viewport.
    pub fn display_list(&self) -> DisplayList<'_> {
        let mut list = DisplayList::new();
        list.push(DrawOp::Grid {
            area: self.camera.visible_rect(self.viewport),
            spacing: f64::from(self.settings.grid_size),
            color: self.theme.palette().grid,
            dot_size: GRID_DOT_SIZE,
        });
        self.scene.paint(&mut list);
        if let Gesture::RubberBand { origin, current, .. } = &self.gesture {
            list.push(DrawOp::RubberBand {
                rect: Rect::from_points(*origin, *current),
            });
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::SceneItem;

    fn pixels(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([10, 120, 200, 255]))
    }

    fn down(controller: &mut CanvasController, x: f64, y: f64, modifiers: Modifiers) {
        controller.handle_pointer_event(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers,
        });
    }

    fn drag_to(controller: &mut CanvasController, x: f64, y: f64, modifiers: Modifiers) {
        controller.handle_pointer_event(PointerEvent::Move {
            position: Point::new(x, y),
            modifiers,
        });
    }

    fn up(controller: &mut CanvasController, x: f64, y: f64) {
        controller.handle_pointer_event(PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        });
    }

    fn drag(controller: &mut CanvasController, from: (f64, f64), to: (f64, f64), modifiers: Modifiers) {
        down(controller, from.0, from.1, modifiers);
        drag_to(controller, to.0, to.1, modifiers);
        up(controller, to.0, to.1);
    }

    fn geometry(controller: &CanvasController, id: ItemId) -> Option<(Rect, Point)> {
        controller.scene().item(id).map(|item| (item.bounds(), item.position()))
    }

    #[test]
    fn test_resize_delete_scenario() {
        let mut c = CanvasController::default();
        let id = c.drop_image(pixels(200, 100), Point::ZERO).unwrap();

        down(&mut c, 50.0, 50.0, Modifiers::NONE);
        up(&mut c, 50.0, 50.0);
        assert!(c.enter_resize_mode());

        drag(&mut c, (200.0, 100.0), (250.0, 150.0), Modifiers::NONE);
        assert_eq!(geometry(&c, id), Some((Rect::new(0.0, 0.0, 250.0, 150.0), Point::ZERO)));
        assert_eq!(c.undo_label(), Some("Resize item"));

        assert!(c.undo());
        assert_eq!(geometry(&c, id), Some((Rect::new(0.0, 0.0, 200.0, 100.0), Point::ZERO)));

        c.handle_key(Key::Delete, Modifiers::NONE);
        assert!(c.scene().is_empty());

        assert!(c.undo());
        assert_eq!(geometry(&c, id), Some((Rect::new(0.0, 0.0, 200.0, 100.0), Point::ZERO)));
        assert_eq!(
            c.scene().item(id).map(|item| item.display_pixels().dimensions()),
            Some((200, 100))
        );
    }

    #[test]
    fn test_rotate_two_items_is_one_step() {
        let mut c = CanvasController::default();
        let a = c.insert_image(pixels(40, 40), Point::new(0.0, 0.0)).unwrap();
        let b = c.insert_image(pixels(40, 40), Point::new(100.0, 0.0)).unwrap();

        // Rubber band over both
        drag(&mut c, (-10.0, -10.0), (200.0, 50.0), Modifiers::NONE);
        assert_eq!(c.scene().selected_items(), vec![a, b]);

        let before = c.history().len();
        c.trigger(CanvasAction::RotateRight);
        assert_eq!(c.history().len(), before + 1);
        assert_eq!(c.undo_label(), Some("Rotate 2 items"));

        c.undo();
        for id in [a, b] {
            assert_eq!(c.scene().item(id).map(|item| item.rotation()), Some(0.0));
        }
        c.redo();
        for id in [a, b] {
            assert_eq!(c.scene().item(id).map(|item| item.rotation()), Some(90.0));
        }
    }

    #[test]
    fn test_single_rotate_has_no_macro() {
        let mut c = CanvasController::default();
        let id = c.insert_image(pixels(10, 10), Point::ZERO).unwrap();
        c.scene.select(id);
        c.rotate_left();
        assert_eq!(c.undo_label(), Some("Rotate item"));
        assert_eq!(c.scene().item(id).map(|item| item.rotation()), Some(-90.0));

        c.scene.clear_selection();
        let len = c.history().len();
        c.rotate_right();
        assert_eq!(c.history().len(), len);
    }

    #[test]
    fn test_drag_move_multiple_records_macro() {
        let mut c = CanvasController::default();
        let a = c.insert_image(pixels(20, 20), Point::new(0.0, 0.0)).unwrap();
        let b = c.insert_image(pixels(20, 20), Point::new(50.0, 0.0)).unwrap();
        c.scene.set_selection([a, b]);

        drag(&mut c, (10.0, 10.0), (40.0, 25.0), Modifiers::NONE);
        assert_eq!(geometry(&c, a).map(|g| g.1), Some(Point::new(30.0, 15.0)));
        assert_eq!(geometry(&c, b).map(|g| g.1), Some(Point::new(80.0, 15.0)));
        assert_eq!(c.undo_label(), Some("Move 2 items"));

        c.undo();
        assert_eq!(geometry(&c, a).map(|g| g.1), Some(Point::new(0.0, 0.0)));
        assert_eq!(geometry(&c, b).map(|g| g.1), Some(Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_click_without_motion_records_nothing() {
        let mut c = CanvasController::default();
        c.insert_image(pixels(20, 20), Point::ZERO).unwrap();
        let len = c.history().len();
        down(&mut c, 5.0, 5.0, Modifiers::NONE);
        up(&mut c, 5.0, 5.0);
        assert_eq!(c.history().len(), len);
        assert_eq!(c.scene().selection_len(), 1);
    }

    #[test]
    fn test_resize_mode_item_does_not_move() {
        let mut c = CanvasController::default();
        let id = c.insert_image(pixels(100, 100), Point::ZERO).unwrap();
        c.scene.select(id);
        assert!(c.enter_resize_mode());

        drag(&mut c, (50.0, 50.0), (80.0, 80.0), Modifiers::NONE);
        assert_eq!(geometry(&c, id), Some((Rect::new(0.0, 0.0, 100.0, 100.0), Point::ZERO)));
    }

    #[test]
    fn test_enter_resize_mode_needs_one_selected() {
        let mut c = CanvasController::default();
        let a = c.insert_image(pixels(10, 10), Point::ZERO).unwrap();
        let b = c.insert_image(pixels(10, 10), Point::new(20.0, 0.0)).unwrap();
        assert!(!c.enter_resize_mode());
        c.scene.set_selection([a, b]);
        assert!(!c.enter_resize_mode());
        c.scene.select(b);
        assert!(c.enter_resize_mode());
        assert!(c.scene().item(b).is_some_and(|item| item.is_resize_mode()));
    }

    #[test]
    fn test_click_empty_canvas_leaves_resize_mode() {
        let mut c = CanvasController::default();
        let id = c.insert_image(pixels(10, 10), Point::ZERO).unwrap();
        c.scene.select(id);
        c.enter_resize_mode();
        down(&mut c, 500.0, 500.0, Modifiers::NONE);
        up(&mut c, 500.0, 500.0);
        assert!(c.scene().item(id).is_some_and(|item| !item.is_resize_mode()));
        assert_eq!(c.scene().selection_len(), 0);
    }

    #[test]
    fn test_escape_mid_drag_keeps_and_records_geometry() {
        let mut c = CanvasController::default();
        let id = c.insert_image(pixels(100, 100), Point::ZERO).unwrap();
        c.scene.select(id);
        c.enter_resize_mode();

        down(&mut c, 100.0, 100.0, Modifiers::NONE);
        drag_to(&mut c, 130.0, 120.0, Modifiers::NONE);
        c.handle_key(Key::Escape, Modifiers::NONE);
        assert!(!c.is_dragging());
        assert!(c.scene().item(id).is_some_and(|item| !item.is_resize_mode()));
        assert_eq!(geometry(&c, id), Some((Rect::new(0.0, 0.0, 130.0, 120.0), Point::ZERO)));

        // Release after escape is a no-op
        up(&mut c, 130.0, 120.0);
        c.undo();
        assert_eq!(geometry(&c, id), Some((Rect::new(0.0, 0.0, 100.0, 100.0), Point::ZERO)));
    }

    #[test]
    fn test_aspect_locked_handle_drag() {
        let mut c = CanvasController::default();
        let id = c.insert_image(pixels(200, 100), Point::ZERO).unwrap();
        c.scene.select(id);
        c.enter_resize_mode();
        drag(&mut c, (200.0, 100.0), (300.0, 120.0), Modifiers::SHIFT);
        let (bounds, _) = geometry(&c, id).unwrap();
        assert!((bounds.width() - 300.0).abs() < 1e-9);
        assert!((bounds.height() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_ctrl_click_toggles() {
        let mut c = CanvasController::default();
        let a = c.insert_image(pixels(10, 10), Point::ZERO).unwrap();
        let b = c.insert_image(pixels(10, 10), Point::new(20.0, 0.0)).unwrap();
        down(&mut c, 5.0, 5.0, Modifiers::NONE);
        up(&mut c, 5.0, 5.0);
        down(&mut c, 25.0, 5.0, Modifiers::CTRL);
        up(&mut c, 25.0, 5.0);
        assert_eq!(c.scene().selected_items(), vec![a, b]);
        down(&mut c, 5.0, 5.0, Modifiers::CTRL);
        up(&mut c, 5.0, 5.0);
        assert_eq!(c.scene().selected_items(), vec![b]);
    }

    #[test]
    fn test_ctrl_rubber_band_adds() {
        let mut c = CanvasController::default();
        let a = c.insert_image(pixels(10, 10), Point::ZERO).unwrap();
        let b = c.insert_image(pixels(10, 10), Point::new(100.0, 0.0)).unwrap();
        c.scene.select(a);
        drag(&mut c, (90.0, -5.0), (120.0, 20.0), Modifiers::CTRL);
        assert_eq!(c.scene().selected_items(), vec![a, b]);
    }

    #[test]
    fn test_snap_all_to_grid_not_recorded() {
        let mut c = CanvasController::default();
        let id = c.insert_image(pixels(10, 10), Point::new(13.0, 38.0)).unwrap();
        let len = c.history().len();
        c.handle_key(Key::Char('g'), Modifiers::CTRL);
        assert_eq!(geometry(&c, id).map(|g| g.1), Some(Point::new(25.0, 50.0)));
        assert_eq!(c.history().len(), len);
        c.snap_all_to_grid();
        assert_eq!(geometry(&c, id).map(|g| g.1), Some(Point::new(25.0, 50.0)));
    }

    #[test]
    fn test_zoom_and_pan_do_not_touch_history() {
        let mut c = CanvasController::default();
        c.zoom_in();
        assert!((c.camera().zoom - ZOOM_STEP).abs() < 1e-12);
        c.handle_pointer_event(PointerEvent::Scroll {
            position: Point::new(10.0, 10.0),
            delta: Vec2::new(0.0, -1.0),
            modifiers: Modifiers::CTRL,
        });
        assert!((c.camera().zoom - 1.0).abs() < 1e-9);

        c.handle_pointer_event(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Middle,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(c.cursor(), CursorShape::ClosedHand);
        drag_to(&mut c, 30.0, 40.0, Modifiers::NONE);
        c.handle_pointer_event(PointerEvent::Up {
            position: Point::new(30.0, 40.0),
            button: MouseButton::Middle,
            modifiers: Modifiers::NONE,
        });
        assert!(c.history().is_empty());
        assert_eq!(c.cursor(), CursorShape::Arrow);
    }

    #[test]
    fn test_drop_maps_through_camera() {
        let mut c = CanvasController::default();
        c.camera.zoom = 2.0;
        c.camera.offset = Vec2::new(100.0, 0.0);
        let id = c.drop_image(pixels(10, 10), Point::new(120.0, 40.0)).unwrap();
        assert_eq!(geometry(&c, id).map(|g| g.1), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_paste_at_viewport_center() {
        let mut c = CanvasController::default();
        c.set_viewport_size(Size::new(400.0, 300.0));
        let id = c.paste_image(pixels(10, 10)).unwrap();
        assert_eq!(geometry(&c, id).map(|g| g.1), Some(Point::new(200.0, 150.0)));
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut c = CanvasController::default();
        assert!(matches!(
            c.paste_image(RgbaImage::new(0, 0)),
            Err(IngestError::EmptyImage { .. })
        ));
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection_is_noop() {
        let mut c = CanvasController::default();
        c.insert_image(pixels(10, 10), Point::ZERO).unwrap();
        c.delete_selected();
        assert_eq!(c.scene().len(), 1);
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_hover_cursor_over_handle() {
        let mut c = CanvasController::default();
        let id = c.insert_image(pixels(100, 50), Point::ZERO).unwrap();
        drag_to(&mut c, 40.0, 20.0, Modifiers::NONE);
        assert_eq!(c.scene().hovered(), Some(id));
        assert_eq!(c.cursor(), CursorShape::Arrow);

        c.scene.select(id);
        c.enter_resize_mode();
        drag_to(&mut c, 0.0, 0.0, Modifiers::NONE);
        assert_eq!(c.cursor(), CursorShape::ResizeForwardDiagonal);
        drag_to(&mut c, 500.0, 500.0, Modifiers::NONE);
        assert_eq!(c.scene().hovered(), None);
    }

    #[test]
    fn test_display_list_layers() {
        let mut c = CanvasController::default();
        let a = c.insert_image(pixels(10, 10), Point::ZERO).unwrap();
        let b = c.insert_image(pixels(10, 10), Point::new(50.0, 50.0)).unwrap();
        down(&mut c, 200.0, 200.0, Modifiers::NONE);
        drag_to(&mut c, 300.0, 300.0, Modifiers::NONE);

        let list = c.display_list();
        assert!(matches!(list.ops().first(), Some(DrawOp::Grid { spacing, .. }) if *spacing == 25.0));
        assert!(matches!(list.ops().last(), Some(DrawOp::RubberBand { .. })));
        assert_eq!(list.image_order(), vec![a, b]);
    }

    #[test]
    fn test_settings_application() {
        let mut c = CanvasController::default();
        assert!(c.set_grid_size(0).is_err());
        c.set_grid_size(40).unwrap();
        c.set_theme(Theme::Light);
        assert_eq!(c.settings().theme, "light");

        let mut settings = Settings::default();
        settings.history_limit = 1;
        c.apply_settings(settings).unwrap();
        c.insert_image(pixels(4, 4), Point::ZERO).unwrap();
        c.insert_image(pixels(4, 4), Point::ZERO).unwrap();
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.theme(), Theme::Dark);
    }

    #[test]
    fn test_availability_changes() {
        let mut c = CanvasController::default();
        assert_eq!(c.take_availability_change(), None);
        let id = c.insert_image(pixels(4, 4), Point::ZERO).unwrap();
        assert!(c.scene().item(id).is_some_and(|item| item.id() == id));
        assert_eq!(
            c.take_availability_change(),
            Some(Availability { can_undo: true, can_redo: false })
        );
        c.trigger(CanvasAction::Undo);
        assert!(c.can_redo());
        assert!(!c.can_undo());
    }
}
