//! Interaction state of a canvas item.

use super::handles::HandleKind;

/// The interaction state of an item, as seen by the canvas.
///
/// Hover and selection are orthogonal flags on the item; this enum reports the
/// most specific one, with an active drag taking precedence over everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    /// No interaction.
    #[default]
    Idle,
    /// Pointer is over the item.
    Hovered,
    /// Item is selected and movable.
    Selected,
    /// Item shows its resize handles and is not movable.
    ResizeMode,
    /// A resize handle is being dragged.
    DraggingHandle(HandleKind),
    /// The item is being dragged to a new position.
    DraggingMove,
}

impl ItemState {
    /// Check if a pointer drag is in progress on the item.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::DraggingHandle(_) | Self::DraggingMove)
    }

    /// Check if the item is in resize mode (idle or dragging a handle).
    pub fn is_resize_mode(&self) -> bool {
        matches!(self, Self::ResizeMode | Self::DraggingHandle(_))
    }
}
