//! Undoable scene mutations.
//!
//! Commands are recorded after their forward effect has already happened.
//! `apply` replays the forward step, `revert` the inverse. Both are no-ops for
//! items that are no longer in the scene.

use crate::item::{CanvasItem, Geometry, ItemId, MoveEdit, ResizeEdit};
use crate::scene::Scene;
use kurbo::Point;

/// A recorded, reversible change to the scene.
#[derive(Debug)]
pub enum Command {
    Add(AddCommand),
    Remove(RemoveCommand),
    Move(MoveCommand),
    Resize(ResizeCommand),
    Rotate(RotateCommand),
}

impl Command {
    /// Menu text for the change.
    pub fn label(&self) -> String {
        match self {
            Command::Add(_) => "Add image".to_string(),
            Command::Remove(cmd) => match cmd.entries.len() {
                1 => "Delete item".to_string(),
                n => format!("Delete {n} items"),
            },
            Command::Move(_) => "Move item".to_string(),
            Command::Resize(_) => "Resize item".to_string(),
            Command::Rotate(_) => "Rotate item".to_string(),
        }
    }

    /// Redo the change.
    pub fn apply(&mut self, scene: &mut Scene) {
        match self {
            Command::Add(cmd) => cmd.apply(scene),
            Command::Remove(cmd) => cmd.apply(scene),
            Command::Move(cmd) => cmd.apply(scene),
            Command::Resize(cmd) => cmd.apply(scene),
            Command::Rotate(cmd) => cmd.apply(scene),
        }
    }

    /// Undo the change.
    pub fn revert(&mut self, scene: &mut Scene) {
        match self {
            Command::Add(cmd) => cmd.revert(scene),
            Command::Remove(cmd) => cmd.revert(scene),
            Command::Move(cmd) => cmd.revert(scene),
            Command::Resize(cmd) => cmd.revert(scene),
            Command::Rotate(cmd) => cmd.revert(scene),
        }
    }
}

/// An item added to the scene. Parks the item while undone.
#[derive(Debug)]
pub struct AddCommand {
    id: ItemId,
    z_index: usize,
    parked: Option<CanvasItem>,
}

impl AddCommand {
    /// Add `item` on top of the scene and record it.
    pub fn execute(item: CanvasItem, scene: &mut Scene) -> Self {
        let id = scene.add_item(item);
        let z_index = scene.z_index(id).unwrap_or(0);
        Self {
            id,
            z_index,
            parked: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    fn apply(&mut self, scene: &mut Scene) {
        if let Some(item) = self.parked.take() {
            scene.insert_item_at(self.z_index, item);
        }
    }

    fn revert(&mut self, scene: &mut Scene) {
        if let Some((item, index)) = scene.remove_item(self.id) {
            self.z_index = index;
            self.parked = Some(item);
        }
    }
}

#[derive(Debug)]
struct RemovedEntry {
    id: ItemId,
    z_index: usize,
    parked: Option<CanvasItem>,
}

/// One or more items removed from the scene. Owns them while applied.
#[derive(Debug)]
pub struct RemoveCommand {
    /// In detach order. Reattached in reverse so every z index is valid again.
    entries: Vec<RemovedEntry>,
}

impl RemoveCommand {
    /// Detach `ids` and record them. `None` if none of them was live.
    pub fn execute(ids: &[ItemId], scene: &mut Scene) -> Option<Self> {
        let mut cmd = Self {
            entries: ids
                .iter()
                .map(|&id| RemovedEntry {
                    id,
                    z_index: 0,
                    parked: None,
                })
                .collect(),
        };
        cmd.apply(scene);
        cmd.entries.retain(|entry| entry.parked.is_some());
        (!cmd.entries.is_empty()).then_some(cmd)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    fn apply(&mut self, scene: &mut Scene) {
        for entry in &mut self.entries {
            if let Some((item, index)) = scene.remove_item(entry.id) {
                entry.z_index = index;
                entry.parked = Some(item);
            }
        }
    }

    fn revert(&mut self, scene: &mut Scene) {
        for entry in self.entries.iter_mut().rev() {
            if let Some(item) = entry.parked.take() {
                scene.insert_item_at(entry.z_index, item);
            }
        }
    }
}

/// Position change of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCommand {
    pub id: ItemId,
    pub from: Point,
    pub to: Point,
}

impl MoveCommand {
    fn apply(&mut self, scene: &mut Scene) {
        scene.update_item(self.id, |item| item.set_position(self.to));
    }

    fn revert(&mut self, scene: &mut Scene) {
        scene.update_item(self.id, |item| item.set_position(self.from));
    }
}

impl From<MoveEdit> for MoveCommand {
    fn from(edit: MoveEdit) -> Self {
        Self {
            id: edit.id,
            from: edit.from,
            to: edit.to,
        }
    }
}

/// Bounds and position change of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeCommand {
    pub id: ItemId,
    pub before: Geometry,
    pub after: Geometry,
}

impl ResizeCommand {
    fn apply(&mut self, scene: &mut Scene) {
        let after = self.after;
        scene.update_item(self.id, |item| item.set_geometry(after.bounds, after.position));
    }

    fn revert(&mut self, scene: &mut Scene) {
        let before = self.before;
        scene.update_item(self.id, |item| item.set_geometry(before.bounds, before.position));
    }
}

impl From<ResizeEdit> for ResizeCommand {
    fn from(edit: ResizeEdit) -> Self {
        Self {
            id: edit.id,
            before: edit.before,
            after: edit.after,
        }
    }
}

/// Signed rotation of one item, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateCommand {
    pub id: ItemId,
    pub delta_degrees: f64,
}

impl RotateCommand {
    /// Rotate the item now and record it.
    pub fn execute(id: ItemId, delta_degrees: f64, scene: &mut Scene) -> Option<Self> {
        scene.update_item(id, |item| item.rotate_by(delta_degrees))?;
        Some(Self { id, delta_degrees })
    }

    fn apply(&mut self, scene: &mut Scene) {
        scene.update_item(self.id, |item| item.rotate_by(self.delta_degrees));
    }

    fn revert(&mut self, scene: &mut Scene) {
        scene.update_item(self.id, |item| item.rotate_by(-self.delta_degrees));
    }
}

impl From<AddCommand> for Command {
    fn from(cmd: AddCommand) -> Self {
        Command::Add(cmd)
    }
}

impl From<RemoveCommand> for Command {
    fn from(cmd: RemoveCommand) -> Self {
        Command::Remove(cmd)
    }
}

impl From<MoveCommand> for Command {
    fn from(cmd: MoveCommand) -> Self {
        Command::Move(cmd)
    }
}

impl From<ResizeCommand> for Command {
    fn from(cmd: ResizeCommand) -> Self {
        Command::Resize(cmd)
    }
}

impl From<RotateCommand> for Command {
    fn from(cmd: RotateCommand) -> Self {
        Command::Rotate(cmd)
    }
}
