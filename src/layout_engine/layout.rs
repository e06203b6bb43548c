use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::LayoutError;
use super::graph::{NodeKind, Orientation, PaneKind};
use super::node::{LayoutNode, PaneId};
use crate::common::collections::HashSet;
use crate::model::tree::{NodeKey, Tree};

/// Per-node payload stored in the arena.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NodeData {
    pub(crate) id: PaneId,
    pub(crate) kind: NodeKind,
    pub(crate) default_size: Option<f64>,
    pub(crate) min_size: Option<f64>,
}

/// A complete, valid layout snapshot.
///
/// Every engine operation reads one of these and produces a new one; a
/// `LayoutTree` is never edited in place by the engine. Internally the nodes
/// live in an arena, so producing the next snapshot is a single flat copy
/// followed by edits along the affected path.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "LayoutNode", into = "LayoutNode")]
pub struct LayoutTree {
    tree: Tree<NodeData>,
    root: NodeKey,
}

static_assertions::assert_impl_all!(LayoutTree: Send, Sync, Clone);

/// Result of [`LayoutTree::find_parent`].
#[derive(Debug, Clone, Copy)]
pub enum ParentLookup<'a> {
    NotFound,
    /// The id names the root, which has no parent.
    Root,
    Child {
        parent: NodeRef<'a>,
        index: usize,
    },
}

impl LayoutTree {
    /// A layout holding a single pane.
    pub fn single(kind: impl Into<PaneKind>) -> Self {
        let mut tree = Tree::new();
        let root = tree.mk_node(NodeData {
            id: PaneId::generate(),
            kind: NodeKind::Pane(kind.into()),
            default_size: None,
            min_size: None,
        });
        LayoutTree { tree, root }
    }

    /// Builds a layout from its document form, assigning ids where missing.
    pub fn from_node(node: LayoutNode) -> Result<Self, LayoutError> {
        let mut tree = Tree::new();
        let mut seen = HashSet::default();
        let root = build(&mut tree, node.ensure_ids(), &mut seen)?;
        Ok(LayoutTree { tree, root })
    }

    pub fn to_node(&self) -> LayoutNode { self.root().to_node() }

    pub fn root(&self) -> NodeRef<'_> { NodeRef { layout: self, key: self.root } }

    /// Number of nodes, containers included.
    pub fn len(&self) -> usize { self.tree.len() }

    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    pub fn contains(&self, id: &str) -> bool { self.key_of(id).is_some() }

    /// All nodes in depth-first pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.root.traverse_preorder(&self.tree).map(|key| NodeRef { layout: self, key })
    }

    /// Depth-first pre-order search for `id`.
    pub fn find_node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.key_of(id).map(|key| NodeRef { layout: self, key })
    }

    pub fn find_parent(&self, id: &str) -> ParentLookup<'_> {
        let Some(key) = self.key_of(id) else {
            return ParentLookup::NotFound;
        };
        match (key.parent(&self.tree), key.index_in_parent(&self.tree)) {
            (Some(parent), Some(index)) => ParentLookup::Child {
                parent: NodeRef { layout: self, key: parent },
                index,
            },
            _ => ParentLookup::Root,
        }
    }

    /// Whether `candidate` lies in the subtree rooted at `ancestor`, inclusive.
    pub fn is_descendant(&self, ancestor: &str, candidate: &str) -> bool {
        let (Some(ancestor), Some(candidate)) = (self.key_of(ancestor), self.key_of(candidate))
        else {
            return false;
        };
        candidate.ancestors(&self.tree).any(|key| key == ancestor)
    }

    /// Lists every broken structural invariant. An empty list means the
    /// layout is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = HashSet::default();
        let mut reachable = 0;

        if self.root.parent(&self.tree).is_some() {
            issues.push("root node has a parent".to_owned());
        }

        for key in self.root.traverse_preorder(&self.tree) {
            reachable += 1;
            let data = &self.tree[key];
            if !seen.insert(&data.id) {
                issues.push(format!("duplicate node id {}", data.id));
            }
            let count = key.child_count(&self.tree);
            match data.kind {
                NodeKind::Container(_) if count < 2 => {
                    issues.push(format!("container {} has {count} children", data.id));
                }
                NodeKind::Pane(_) if count > 0 => {
                    issues.push(format!("leaf {} has {count} children", data.id));
                }
                _ => {}
            }
        }

        if reachable != self.tree.len() {
            issues.push(format!(
                "{} nodes are not reachable from the root",
                self.tree.len() - reachable
            ));
        }

        issues
    }

    pub fn draw_tree(&self) -> String {
        let tree = self.ascii_tree(self.root);
        let mut out = String::new();
        ascii_tree::write_tree(&mut out, &tree).map(|()| out).unwrap_or_default()
    }

    fn ascii_tree(&self, key: NodeKey) -> ascii_tree::Tree {
        let data = &self.tree[key];
        let mut desc = format!("{} {}", data.kind, data.id);
        if let Some(size) = data.default_size {
            let _ = write!(desc, " {size:.1}%");
        }
        let children: Vec<_> = key.children(&self.tree).map(|c| self.ascii_tree(c)).collect();
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }

    /// Reads a layout document. `.ron` files are parsed as RON, anything else
    /// as JSON.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let buf = fs::read_to_string(path)?;
        let node: LayoutNode = if is_ron(path) {
            ron::from_str(&buf)?
        } else {
            serde_json::from_str(&buf)?
        };
        Ok(Self::from_node(node)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let node = self.to_node();
        let buf = if is_ron(path) {
            ron::ser::to_string_pretty(&node, ron::ser::PrettyConfig::default())?
        } else {
            serde_json::to_string_pretty(&node)?
        };
        fs::write(path, buf)?;
        Ok(())
    }
}

fn is_ron(path: &Path) -> bool { path.extension().is_some_and(|ext| ext == "ron") }

fn build(
    tree: &mut Tree<NodeData>,
    node: LayoutNode,
    seen: &mut HashSet<PaneId>,
) -> Result<NodeKey, LayoutError> {
    let LayoutNode { kind, id, panes, default_size, min_size } = node;
    let id = id.unwrap_or_else(PaneId::generate);
    if !seen.insert(id.clone()) {
        return Err(LayoutError::DuplicateId(id));
    }
    let children = panes.unwrap_or_default();
    match kind {
        NodeKind::Pane(_) if !children.is_empty() => {
            return Err(LayoutError::LeafWithChildren(id));
        }
        NodeKind::Container(_) if children.len() < 2 => {
            return Err(LayoutError::UndersizedContainer { id, count: children.len() });
        }
        _ => {}
    }

    let key = tree.mk_node(NodeData { id, kind, default_size, min_size });
    for child in children {
        let child = build(tree, child, seen)?;
        tree.push_back(child, key);
    }
    Ok(key)
}

/// Structural edits. These keep the arena consistent but leave policy (which
/// edit to make for a drop) to the engine.
impl LayoutTree {
    pub(crate) fn root_key(&self) -> NodeKey { self.root }

    pub(crate) fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.root.traverse_preorder(&self.tree).find(|&key| self.tree[key].id.as_str() == id)
    }

    pub(crate) fn data(&self, key: NodeKey) -> &NodeData { &self.tree[key] }

    pub(crate) fn parent_of(&self, key: NodeKey) -> Option<NodeKey> { key.parent(&self.tree) }

    /// Generates an id that is not yet used in this layout.
    pub(crate) fn fresh_id(&self) -> PaneId {
        loop {
            let id = PaneId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Creates an unattached leaf.
    pub(crate) fn mk_pane(
        &mut self,
        kind: PaneKind,
        default_size: Option<f64>,
        min_size: Option<f64>,
    ) -> NodeKey {
        let id = self.fresh_id();
        self.tree.mk_node(NodeData {
            id,
            kind: NodeKind::Pane(kind),
            default_size,
            min_size,
        })
    }

    /// Builds an unattached subtree from a document, rejecting ids that
    /// collide with nodes already in the layout.
    pub(crate) fn graft(&mut self, node: LayoutNode) -> Result<NodeKey, LayoutError> {
        let mut seen: HashSet<PaneId> = self.nodes().map(|n| n.id().clone()).collect();
        build(&mut self.tree, node.ensure_ids(), &mut seen)
    }

    /// Replaces `target` with a new `orientation` container holding `target`
    /// and `node`, split evenly. The container takes over the target's size.
    pub(crate) fn wrap(
        &mut self,
        target: NodeKey,
        node: NodeKey,
        orientation: Orientation,
        node_first: bool,
    ) -> NodeKey {
        let id = self.fresh_id();
        let default_size = self.tree[target].default_size;
        let container = self.tree.mk_node(NodeData {
            id,
            kind: NodeKind::Container(orientation),
            default_size,
            min_size: None,
        });
        if target == self.root {
            self.root = container;
        } else {
            self.tree.replace(target, container);
        }
        let (first, second) = if node_first { (node, target) } else { (target, node) };
        self.tree.push_back(first, container);
        self.tree.push_back(second, container);
        self.reset_sizes(container);
        container
    }

    /// Links `node` next to `target` inside the target's parent and evens out
    /// the parent's children.
    pub(crate) fn splice(&mut self, target: NodeKey, node: NodeKey, before: bool) {
        let Some(parent) = target.parent(&self.tree) else {
            return;
        };
        if before {
            self.tree.insert_before(node, target);
        } else {
            self.tree.insert_after(node, target);
        }
        self.reset_sizes(parent);
    }

    pub(crate) fn reset_sizes(&mut self, parent: NodeKey) {
        let children: Vec<_> = parent.children(&self.tree).collect();
        let share = 100.0 / children.len() as f64;
        for child in children {
            self.tree[child].default_size = Some(share);
        }
    }

    /// Unlinks `key` from the layout, collapsing whatever container that
    /// leaves with a single child. The detached subtree stays in the arena
    /// for the caller to reattach or [`discard`](Self::discard).
    pub(crate) fn detach(&mut self, key: NodeKey) -> Result<(), LayoutError> {
        let Some(parent) = key.parent(&self.tree) else {
            return Err(LayoutError::RootRemoval);
        };
        self.tree.unlink(key);
        self.settle(parent);
        Ok(())
    }

    pub(crate) fn discard(&mut self, key: NodeKey) { self.tree.remove(key) }

    fn settle(&mut self, container: NodeKey) {
        match container.child_count(&self.tree) {
            0 => {
                if container == self.root {
                    warn!(id = %self.tree[container].id, "root container left without children");
                    return;
                }
                if self.detach(container).is_ok() {
                    self.discard(container);
                }
            }
            1 => {
                let Some(only) = container.first_child(&self.tree) else {
                    return;
                };
                self.tree.unlink(only);
                self.tree[only].default_size = self.tree[container].default_size;
                if container == self.root {
                    self.root = only;
                } else {
                    self.tree.replace(container, only);
                }
                self.discard(container);
            }
            _ => self.reset_sizes(container),
        }
    }
}

impl PartialEq for LayoutTree {
    fn eq(&self, other: &Self) -> bool { self.to_node() == other.to_node() }
}

impl TryFrom<LayoutNode> for LayoutTree {
    type Error = LayoutError;

    fn try_from(node: LayoutNode) -> Result<Self, Self::Error> { LayoutTree::from_node(node) }
}

impl From<LayoutTree> for LayoutNode {
    fn from(layout: LayoutTree) -> Self { layout.to_node() }
}

/// Read-only view of one node inside a [`LayoutTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    layout: &'a LayoutTree,
    key: NodeKey,
}

impl<'a> NodeRef<'a> {
    fn data(&self) -> &'a NodeData { &self.layout.tree[self.key] }

    pub fn id(&self) -> &'a PaneId { &self.data().id }

    pub fn kind(&self) -> &'a NodeKind { &self.data().kind }

    pub fn is_container(&self) -> bool { self.data().kind.is_container() }

    pub fn orientation(&self) -> Option<Orientation> { self.data().kind.orientation() }

    pub fn default_size(&self) -> Option<f64> { self.data().default_size }

    pub fn min_size(&self) -> Option<f64> { self.data().min_size }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let layout = self.layout;
        self.key.parent(&layout.tree).map(|key| NodeRef { layout, key })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let layout = self.layout;
        self.key.children(&layout.tree).map(move |key| NodeRef { layout, key })
    }

    pub fn child_count(&self) -> usize { self.key.child_count(&self.layout.tree) }

    /// Snapshot of the subtree rooted here in document form.
    pub fn to_node(&self) -> LayoutNode {
        let data = self.data();
        LayoutNode {
            kind: data.kind.clone(),
            id: Some(data.id.clone()),
            panes: self.is_container().then(|| self.children().map(|c| c.to_node()).collect()),
            default_size: data.default_size,
            min_size: data.min_size,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", self.id())
            .field("kind", self.kind())
            .field("default_size", &self.default_size())
            .finish()
    }
}
