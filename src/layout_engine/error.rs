use thiserror::Error;

use super::node::PaneId;

/// Why a layout operation was not applied.
///
/// The infallible engine entry points swallow these and hand back the input
/// layout unchanged; the `try_*` variants surface them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("no node with id {0}")]
    NotFound(PaneId),
    #[error("the root node cannot be removed")]
    RootRemoval,
    #[error("cannot move {0} relative to itself")]
    SelfMove(PaneId),
    #[error("cannot move {moving} into its own subtree at {target}")]
    CyclicMove { moving: PaneId, target: PaneId },
    #[error("pane kind {0:?} is reserved for containers")]
    ReservedKind(String),
    #[error("duplicate node id {0}")]
    DuplicateId(PaneId),
    #[error("leaf {0} has children")]
    LeafWithChildren(PaneId),
    #[error("container {id} has {count} children, at least two are required")]
    UndersizedContainer { id: PaneId, count: usize },
}
