//! ImagoRef Core Library
//!
//! Platform-agnostic model and interaction logic for the ImagoRef image board:
//! canvas items, the scene that owns them, command-based undo/redo and the
//! controller that turns pointer gestures into recorded edits.

pub mod actions;
pub mod camera;
pub mod command;
pub mod controller;
pub mod history;
pub mod input;
pub mod item;
pub mod paint;
pub mod resize;
pub mod scene;
pub mod settings;
pub mod snap;
pub mod widget;

pub use actions::{CanvasAction, Shortcut, ShortcutRegistry};
pub use camera::Camera;
pub use command::{AddCommand, Command, MoveCommand, RemoveCommand, ResizeCommand, RotateCommand};
pub use controller::CanvasController;
pub use history::{Availability, HistoryEntry, HistoryStack};
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use item::{CanvasItem, Geometry, IngestError, ItemId, SceneItem};
pub use paint::{DisplayList, DrawOp};
pub use scene::{Redraw, Scene};
pub use settings::{Settings, SettingsError, Theme, ThemePalette};
pub use snap::snap_to_grid;
pub use widget::{CursorShape, HandleKind, HandleSet, ItemState, HANDLE_SIZE};
