//! Drop policy on top of [`LayoutTree`].
//!
//! Every entry point takes a layout by reference and returns the next layout.
//! The infallible forms hand back an unchanged copy when the request cannot be
//! honoured (unknown id, moving a node into its own subtree, removing the
//! root); the `try_*` forms return the reason instead.

use tracing::{debug, instrument, trace};

use super::drag::{DragItem, DropTarget};
use super::error::LayoutError;
use super::graph::{DropPosition, Orientation, PaneKind};
use super::layout::LayoutTree;
use super::node::LayoutNode;
use crate::common::config::LayoutSettings;
use crate::model::tree::NodeKey;

/// Share stamped on a new pane before placement evens out its container.
const NEW_PANE_SIZE: f64 = 50.0;

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    settings: LayoutSettings,
}

impl LayoutEngine {
    pub fn new(settings: LayoutSettings) -> Self { LayoutEngine { settings } }

    pub fn settings(&self) -> &LayoutSettings { &self.settings }

    /// Adds a new pane of `kind` next to, or inside a split with, `target`.
    pub fn insert_pane(
        &self,
        layout: &LayoutTree,
        target: &str,
        kind: PaneKind,
        position: DropPosition,
    ) -> LayoutTree {
        self.try_insert_pane(layout, target, kind, position)
            .unwrap_or_else(|err| rejected(layout, err))
    }

    #[instrument(level = "debug", skip(self, layout))]
    pub fn try_insert_pane(
        &self,
        layout: &LayoutTree,
        target: &str,
        kind: PaneKind,
        position: DropPosition,
    ) -> Result<LayoutTree, LayoutError> {
        if kind.is_reserved() {
            return Err(LayoutError::ReservedKind(kind.to_string()));
        }
        let mut next = layout.clone();
        let target_key = next.key_of(target).ok_or_else(|| LayoutError::NotFound(target.into()))?;
        let pane = next.mk_pane(
            kind,
            Some(NEW_PANE_SIZE),
            Some(self.settings.new_pane_min_size),
        );
        self.place(&mut next, target_key, pane, position);
        trace!(id = %next.data(pane).id, "inserted pane");
        Ok(next)
    }

    /// Inserts a whole subtree given in document form. Nodes without ids get
    /// fresh ones; ids already present in `layout` are refused.
    pub fn insert_subtree(
        &self,
        layout: &LayoutTree,
        target: &str,
        node: LayoutNode,
        position: DropPosition,
    ) -> LayoutTree {
        self.try_insert_subtree(layout, target, node, position)
            .unwrap_or_else(|err| rejected(layout, err))
    }

    #[instrument(level = "debug", skip(self, layout, node))]
    pub fn try_insert_subtree(
        &self,
        layout: &LayoutTree,
        target: &str,
        node: LayoutNode,
        position: DropPosition,
    ) -> Result<LayoutTree, LayoutError> {
        let mut next = layout.clone();
        let target_key = next.key_of(target).ok_or_else(|| LayoutError::NotFound(target.into()))?;
        let subtree = next.graft(node)?;
        self.place(&mut next, target_key, subtree, position);
        Ok(next)
    }

    /// Removes `target` and its subtree, collapsing containers left with a
    /// single child.
    pub fn remove_pane(&self, layout: &LayoutTree, target: &str) -> LayoutTree {
        self.try_remove_pane(layout, target).unwrap_or_else(|err| rejected(layout, err))
    }

    #[instrument(level = "debug", skip(self, layout))]
    pub fn try_remove_pane(
        &self,
        layout: &LayoutTree,
        target: &str,
    ) -> Result<LayoutTree, LayoutError> {
        let mut next = layout.clone();
        let key = next.key_of(target).ok_or_else(|| LayoutError::NotFound(target.into()))?;
        next.detach(key)?;
        next.discard(key);
        trace!("removed pane");
        Ok(next)
    }

    /// Relocates the subtree rooted at `source` to `position` relative to
    /// `target`. The subtree keeps its ids, kinds and inner sizes.
    pub fn move_pane(
        &self,
        layout: &LayoutTree,
        source: &str,
        target: &str,
        position: DropPosition,
    ) -> LayoutTree {
        self.try_move_pane(layout, source, target, position)
            .unwrap_or_else(|err| rejected(layout, err))
    }

    #[instrument(level = "debug", skip(self, layout))]
    pub fn try_move_pane(
        &self,
        layout: &LayoutTree,
        source: &str,
        target: &str,
        position: DropPosition,
    ) -> Result<LayoutTree, LayoutError> {
        if source == target {
            return Err(LayoutError::SelfMove(source.into()));
        }
        if layout.is_descendant(source, target) {
            return Err(LayoutError::CyclicMove {
                moving: source.into(),
                target: target.into(),
            });
        }
        let mut next = layout.clone();
        let source_key = next.key_of(source).ok_or_else(|| LayoutError::NotFound(source.into()))?;
        if !next.contains(target) {
            return Err(LayoutError::NotFound(target.into()));
        }

        next.detach(source_key)?;
        match next.key_of(target) {
            Some(target_key) => self.place(&mut next, target_key, source_key, position),
            None => {
                // The target was the container that collapsed when the source
                // left it. Pair the source with everything that remains.
                let orientation = position.orientation().unwrap_or(Orientation::Horizontal);
                let root = next.root_key();
                next.wrap(root, source_key, orientation, position.is_before());
            }
        }
        trace!("moved pane");
        Ok(next)
    }

    /// Applies a finished drag: adds a pane or moves one, depending on what
    /// was being dragged.
    pub fn apply_drop(
        &self,
        layout: &LayoutTree,
        item: &DragItem,
        target: &DropTarget,
    ) -> LayoutTree {
        self.try_apply_drop(layout, item, target).unwrap_or_else(|err| rejected(layout, err))
    }

    pub fn try_apply_drop(
        &self,
        layout: &LayoutTree,
        item: &DragItem,
        target: &DropTarget,
    ) -> Result<LayoutTree, LayoutError> {
        match item {
            DragItem::Add { pane_type } => {
                self.try_insert_pane(layout, &target.node_id, pane_type.clone(), target.position)
            }
            DragItem::Move { node_id } => {
                self.try_move_pane(layout, node_id, &target.node_id, target.position)
            }
        }
    }

    fn place(
        &self,
        layout: &mut LayoutTree,
        target: NodeKey,
        node: NodeKey,
        position: DropPosition,
    ) {
        let enclosing = layout.parent_of(target).and_then(|p| layout.data(p).kind.orientation());
        match position.orientation() {
            None => {
                let orientation = self.settings.center_split.resolve(enclosing);
                layout.wrap(target, node, orientation, false);
            }
            Some(required) if enclosing == Some(required) => {
                layout.splice(target, node, position.is_before());
            }
            Some(required) => {
                layout.wrap(target, node, required, position.is_before());
            }
        }
    }
}

fn rejected(layout: &LayoutTree, err: LayoutError) -> LayoutTree {
    debug!(%err, "layout operation rejected");
    layout.clone()
}
