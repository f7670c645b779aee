//! Interaction affordances for canvas items.
//!
//! Items carry their own hover/selection/resize flags; this module holds the
//! pieces derived from them:
//! - the eight resize handles and their hit regions
//! - cursor shapes for handles
//! - the combined interaction state

mod handles;
mod state;

pub use handles::{CursorShape, Handle, HandleKind, HandleSet, Side, HANDLE_SIZE, cursor_for_handle};
pub use state::ItemState;
