//! Headless application shell around the canvas controller.

use crate::ingest::{self, IngestError};
use imagoref_core::{CanvasController, ItemId, Settings};
use kurbo::{Point, Rect, Size, Vec2};
use std::path::{Path, PathBuf};

/// Screen position of the first file dropped from the command line.
const FIRST_DROP: Point = Point::new(40.0, 40.0);
/// Offset between consecutive dropped files.
const DROP_CASCADE: Vec2 = Vec2::new(30.0, 30.0);

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "ImagoRef".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

/// Summary of the board after a batch of drops.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSummary {
    pub items: usize,
    pub bounds: Option<Rect>,
    pub can_undo: bool,
}

/// The application: one canvas, fed from files.
pub struct App {
    config: AppConfig,
    controller: CanvasController,
}

impl App {
    pub fn new(config: AppConfig, settings: Settings) -> Self {
        let mut controller = CanvasController::new(settings);
        controller.set_viewport_size(Size::new(f64::from(config.width), f64::from(config.height)));
        Self { config, controller }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn controller(&self) -> &CanvasController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CanvasController {
        &mut self.controller
    }

    /// Decode a file and drop it with its top-left at a screen point.
    pub fn open_file(&mut self, path: &Path, screen_position: Point) -> Result<ItemId, IngestError> {
        let pixels = ingest::load_image(path)?;
        let id = self.controller.drop_image(pixels, screen_position)?;
        log::info!("Dropped {}", path.display());
        Ok(id)
    }

    /// Drop several files, cascading them. Failures are logged and skipped.
    pub fn open_files(&mut self, paths: &[PathBuf]) -> Vec<ItemId> {
        let mut position = FIRST_DROP;
        let mut opened = Vec::new();
        for path in paths {
            match self.open_file(path, position) {
                Ok(id) => {
                    opened.push(id);
                    position += DROP_CASCADE;
                }
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        opened
    }

    pub fn summary(&self) -> BoardSummary {
        let scene = self.controller.scene();
        BoardSummary {
            items: scene.len(),
            bounds: scene.items_bounding_rect(),
            can_undo: self.controller.can_undo(),
        }
    }
}
