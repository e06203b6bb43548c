mod drag;
pub mod engine;
mod error;
pub mod graph;
pub mod layout;
pub mod node;

pub use drag::{DragItem, DragState, DropTarget};
pub use engine::LayoutEngine;
pub use error::LayoutError;
pub use graph::{DropPosition, NodeKind, Orientation, PaneKind};
pub use layout::{LayoutTree, NodeRef, ParentLookup};
pub use node::{LayoutNode, PaneId, ensure_ids};
