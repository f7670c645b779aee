//! Scene: ownership of live items, z-order, selection and hover.

use crate::item::{CanvasItem, ItemId, SceneItem};
use crate::paint::DisplayList;
use kurbo::{Point, Rect};
use std::collections::{HashMap, HashSet};

/// Area of the scene that needs repainting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Redraw {
    #[default]
    None,
    Region(Rect),
    Full,
}

impl Redraw {
    fn merge(self, rect: Rect) -> Self {
        match self {
            Redraw::None => Redraw::Region(rect),
            Redraw::Region(existing) => Redraw::Region(existing.union(rect)),
            Redraw::Full => Redraw::Full,
        }
    }
}

/// Container owning every live canvas item.
///
/// An item is live iff it is in the arena. Items are drawn in `z_order`,
/// back to front.
#[derive(Debug, Default)]
pub struct Scene {
    items: HashMap<ItemId, CanvasItem>,
    z_order: Vec<ItemId>,
    selected: HashSet<ItemId>,
    hovered: Option<ItemId>,
    redraw: Redraw,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item on top of every other item.
    pub fn add_item(&mut self, item: CanvasItem) -> ItemId {
        let index = self.z_order.len();
        self.insert_item_at(index, item)
    }

    /// Attach an item at a z index (clamped to the top).
    pub fn insert_item_at(&mut self, index: usize, mut item: CanvasItem) -> ItemId {
        let id = item.id();
        if self.items.contains_key(&id) {
            log::warn!("Item {id} is already in the scene");
            return id;
        }
        item.reset_interaction();
        self.invalidate_region(item.scene_bounds());
        let index = index.min(self.z_order.len());
        self.z_order.insert(index, id);
        self.items.insert(id, item);
        id
    }

    /// Detach an item. Returns it with its former z index.
    pub fn remove_item(&mut self, id: ItemId) -> Option<(CanvasItem, usize)> {
        let mut item = self.items.remove(&id)?;
        let index = self.z_order.iter().position(|&z| z == id).unwrap_or(self.z_order.len());
        self.z_order.retain(|&z| z != id);
        self.selected.remove(&id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.invalidate_region(item.scene_bounds());
        item.reset_interaction();
        Some((item, index))
    }

    pub fn item(&self, id: ItemId) -> Option<&CanvasItem> {
        self.items.get(&id)
    }

    /// Mutable access without invalidation. Prefer [`Scene::update_item`].
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut CanvasItem> {
        self.items.get_mut(&id)
    }

    /// Mutate an item and repaint both its old and new footprint.
    pub fn update_item<R>(&mut self, id: ItemId, f: impl FnOnce(&mut CanvasItem) -> R) -> Option<R> {
        let item = self.item_mut(id)?;
        let before = item.scene_bounds();
        let result = f(item);
        let after = item.scene_bounds();
        self.invalidate_region(before.union(after));
        Some(result)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All item ids, back to front.
    pub fn all_items(&self) -> &[ItemId] {
        &self.z_order
    }

    /// Items in z-order, back to front.
    pub fn items_ordered(&self) -> impl Iterator<Item = &CanvasItem> {
        self.z_order.iter().filter_map(|id| self.items.get(id))
    }

    /// Z index of an item.
    pub fn z_index(&self, id: ItemId) -> Option<usize> {
        self.z_order.iter().position(|&z| z == id)
    }

    /// Selected ids in z-order.
    pub fn selected_items(&self) -> Vec<ItemId> {
        self.z_order
            .iter()
            .copied()
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.hovered
    }

    /// Items under a scene point, front to back.
    pub fn items_at(&self, point: Point) -> Vec<ItemId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .filter(|id| self.items.get(id).is_some_and(|item| item.hit_test(point)))
            .collect()
    }

    /// Topmost item under a scene point.
    pub fn top_item_at(&self, point: Point) -> Option<ItemId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.items.get(id).is_some_and(|item| item.hit_test(point)))
    }

    /// Items whose scene bounds overlap `rect`, in z-order.
    pub fn items_in_rect(&self, rect: Rect) -> Vec<ItemId> {
        self.z_order
            .iter()
            .copied()
            .filter(|id| {
                self.items.get(id).is_some_and(|item| {
                    let overlap = item.scene_bounds().intersect(rect);
                    overlap.width() > 0.0 && overlap.height() > 0.0
                })
            })
            .collect()
    }

    /// Replace the selection with a single item.
    pub fn select(&mut self, id: ItemId) {
        self.set_selection([id]);
    }

    pub fn add_to_selection(&mut self, id: ItemId) {
        if let Some(item) = self.items.get_mut(&id) {
            if self.selected.insert(id) {
                item.set_selected(true);
                let bounds = item.scene_bounds();
                self.invalidate_region(bounds);
            }
        }
    }

    /// Deselect an item. Leaving the selection also leaves resize mode.
    pub fn deselect(&mut self, id: ItemId) {
        if !self.selected.remove(&id) {
            return;
        }
        if let Some(item) = self.items.get_mut(&id) {
            item.set_selected(false);
            let bounds = item.scene_bounds();
            self.invalidate_region(bounds);
        }
    }

    pub fn toggle_selection(&mut self, id: ItemId) {
        if self.selected.contains(&id) {
            self.deselect(id);
        } else {
            self.add_to_selection(id);
        }
    }

    pub fn clear_selection(&mut self) {
        for id in self.selected_items() {
            self.deselect(id);
        }
    }

    /// Replace the selection. Unknown ids are skipped.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        let wanted: HashSet<ItemId> = ids.into_iter().filter(|id| self.items.contains_key(id)).collect();
        let dropped: Vec<ItemId> = self.selected.difference(&wanted).copied().collect();
        for id in dropped {
            self.deselect(id);
        }
        for id in wanted {
            self.add_to_selection(id);
        }
    }

    /// Move the hover highlight. `None` clears it.
    pub fn set_hovered(&mut self, id: Option<ItemId>) {
        let id = id.filter(|id| self.items.contains_key(id));
        if self.hovered == id {
            return;
        }
        if let Some(old) = self.hovered.take() {
            self.update_item(old, |item| item.set_hovered(false));
        }
        if let Some(new) = id {
            self.update_item(new, |item| item.set_hovered(true));
        }
        self.hovered = id;
    }

    /// Union of every item's scene bounds.
    pub fn items_bounding_rect(&self) -> Option<Rect> {
        self.items_ordered()
            .map(|item| item.scene_bounds())
            .reduce(|acc, rect| acc.union(rect))
    }

    pub fn invalidate_region(&mut self, rect: Rect) {
        self.redraw = self.redraw.merge(rect);
    }

    pub fn invalidate_all(&mut self) {
        self.redraw = Redraw::Full;
    }

    /// Take the pending repaint area, leaving none.
    pub fn take_redraw(&mut self) -> Redraw {
        std::mem::take(&mut self.redraw)
    }

    /// Paint every item back to front.
    pub fn paint<'a>(&'a self, out: &mut DisplayList<'a>) {
        for item in self.items_ordered() {
            item.paint(out);
        }
    }
}
