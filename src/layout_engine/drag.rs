use serde::{Deserialize, Serialize};

use super::graph::{DropPosition, PaneKind};
use super::node::PaneId;

/// What is being dragged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum DragItem {
    /// A new pane of this kind, dragged in from a palette.
    Add {
        #[serde(rename = "paneType")]
        pane_type: PaneKind,
    },
    /// An existing node, dragged by its header.
    Move {
        #[serde(rename = "nodeId")]
        node_id: PaneId,
    },
}

/// The pane under the pointer and which part of it the pointer is over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    pub node_id: PaneId,
    pub position: DropPosition,
}

impl DropTarget {
    pub fn new(node_id: impl Into<PaneId>, position: DropPosition) -> Self {
        DropTarget { node_id: node_id.into(), position }
    }
}

/// The drag in progress, if any. Set when a drag starts and cleared when it
/// ends, whether or not it ended on a valid target.
#[derive(Clone, Debug, Default)]
pub struct DragState {
    current: Option<DragItem>,
}

impl DragState {
    pub fn start(&mut self, item: DragItem) { self.current = Some(item) }

    pub fn current(&self) -> Option<&DragItem> { self.current.as_ref() }

    pub fn is_dragging(&self) -> bool { self.current.is_some() }

    /// Clears the drag, returning what was being dragged.
    pub fn end(&mut self) -> Option<DragItem> { self.current.take() }
}
