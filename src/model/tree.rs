use std::ops::{Index, IndexMut};

use slotmap::SlotMap;

/// N-ary tree stored in a slotmap arena.
///
/// Structure (parent and sibling links) lives next to each node's value.
/// Several detached subtrees may share one arena, which makes it cheap to move
/// branches around: a branch is unlinked and relinked, never copied.
#[derive(Clone, Debug)]
pub struct Tree<T> {
    map: SlotMap<NodeKey, Node<T>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self { Tree { map: SlotMap::default() } }
}

impl<T> Tree<T> {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn contains(&self, key: NodeKey) -> bool { self.map.contains_key(key) }

    /// Creates a node that is not attached to anything yet.
    pub fn mk_node(&mut self, value: T) -> NodeKey {
        self.map.insert(Node {
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            value,
        })
    }

    /// Appends `node` as the last child of `parent`, unlinking it first if
    /// it is attached elsewhere.
    pub fn push_back(&mut self, node: NodeKey, parent: NodeKey) {
        if node == parent || !self.contains(node) || !self.contains(parent) {
            return;
        }
        self.unlink(node);

        let prev_child = {
            let parent_node = &mut self.map[parent];
            parent_node.first_child.get_or_insert(node);
            parent_node.last_child.replace(node)
        };
        self.map[node].parent = Some(parent);
        if let Some(prev) = prev_child {
            self.hlink_after(node, prev);
        }
    }

    /// Links `node` into `next`'s parent directly before `next`.
    ///
    /// Does nothing if `next` is a root.
    pub fn insert_before(&mut self, node: NodeKey, next: NodeKey) {
        if node == next || !self.contains(node) {
            return;
        }
        let Some(parent) = next.parent(self) else {
            return;
        };
        self.unlink(node);

        self.map[node].parent = Some(parent);
        let parent_node = &mut self.map[parent];
        if parent_node.first_child == Some(next) {
            parent_node.first_child = Some(node);
        }
        self.hlink_before(node, next);
    }

    /// Links `node` into `prev`'s parent directly after `prev`.
    ///
    /// Does nothing if `prev` is a root.
    pub fn insert_after(&mut self, node: NodeKey, prev: NodeKey) {
        if node == prev || !self.contains(node) {
            return;
        }
        let Some(parent) = prev.parent(self) else {
            return;
        };
        self.unlink(node);

        self.map[node].parent = Some(parent);
        let parent_node = &mut self.map[parent];
        if parent_node.last_child == Some(prev) {
            parent_node.last_child = Some(node);
        }
        self.hlink_after(node, prev);
    }

    /// Puts the unattached `new` where `old` is, leaving `old` unattached with
    /// its own subtree intact.
    pub fn replace(&mut self, old: NodeKey, new: NodeKey) {
        if old == new || old.parent(self).is_none() {
            return;
        }
        self.insert_before(new, old);
        self.unlink(old);
    }

    /// Detaches `key` from its parent and siblings. Its children stay attached to it.
    pub fn unlink(&mut self, key: NodeKey) {
        let Some((prev_sibling, next_sibling, parent)) =
            self.map.get(key).map(|n| (n.prev_sibling, n.next_sibling, n.parent))
        else {
            return;
        };
        if let Some(prev) = prev_sibling {
            self.map[prev].next_sibling = next_sibling;
        }
        if let Some(next) = next_sibling {
            self.map[next].prev_sibling = prev_sibling;
        }
        if let Some(parent) = parent {
            let parent_node = &mut self.map[parent];
            if parent_node.first_child == Some(key) {
                parent_node.first_child = next_sibling;
            }
            if parent_node.last_child == Some(key) {
                parent_node.last_child = prev_sibling;
            }
        }
        let node = &mut self.map[key];
        node.prev_sibling = None;
        node.next_sibling = None;
        node.parent = None;
    }

    /// Unlinks `key` and frees it together with its whole subtree.
    pub fn remove(&mut self, key: NodeKey) {
        self.unlink(key);
        let doomed: Vec<_> = key.traverse_postorder(self).collect();
        for node in doomed {
            self.map.remove(node);
        }
    }

    fn hlink_after(&mut self, node: NodeKey, prev: NodeKey) {
        debug_assert_eq!(self.map[node].prev_sibling, None);
        self.map[node].prev_sibling = Some(prev);
        if let Some(next) = self.map[prev].next_sibling.replace(node) {
            self.map[next].prev_sibling = Some(node);
            self.map[node].next_sibling = Some(next);
        }
    }

    fn hlink_before(&mut self, node: NodeKey, next: NodeKey) {
        debug_assert_eq!(self.map[node].next_sibling, None);
        self.map[node].next_sibling = Some(next);
        if let Some(prev) = self.map[next].prev_sibling.replace(node) {
            self.map[prev].next_sibling = Some(node);
            self.map[node].prev_sibling = Some(prev);
        }
    }
}

impl<T> Index<NodeKey> for Tree<T> {
    type Output = T;

    fn index(&self, key: NodeKey) -> &Self::Output { &self.map[key].value }
}

impl<T> IndexMut<NodeKey> for Tree<T> {
    fn index_mut(&mut self, key: NodeKey) -> &mut Self::Output { &mut self.map[key].value }
}

#[derive(Clone, Debug, PartialEq)]
struct Node<T> {
    parent: Option<NodeKey>,
    prev_sibling: Option<NodeKey>,
    next_sibling: Option<NodeKey>,
    first_child: Option<NodeKey>,
    last_child: Option<NodeKey>,
    value: T,
}

slotmap::new_key_type! {
    /// Arena slot of a node. Only meaningful together with the tree that issued it.
    pub struct NodeKey;
}

impl NodeKey {
    pub fn parent<T>(self, tree: &Tree<T>) -> Option<NodeKey> {
        tree.map.get(self).and_then(|n| n.parent)
    }

    pub fn children<T>(self, tree: &Tree<T>) -> impl Iterator<Item = NodeKey> + '_ {
        let mut cur = tree.map.get(self).and_then(|n| n.first_child);
        std::iter::from_fn(move || {
            let key = cur?;
            cur = tree.map.get(key).and_then(|n| n.next_sibling);
            Some(key)
        })
    }

    pub fn child_count<T>(self, tree: &Tree<T>) -> usize { self.children(tree).count() }

    /// Position of this node among its parent's children.
    pub fn index_in_parent<T>(self, tree: &Tree<T>) -> Option<usize> {
        let parent = self.parent(tree)?;
        parent.children(tree).position(|c| c == self)
    }

    pub fn next_sibling<T>(self, tree: &Tree<T>) -> Option<NodeKey> {
        tree.map.get(self).and_then(|n| n.next_sibling)
    }

    pub fn first_child<T>(self, tree: &Tree<T>) -> Option<NodeKey> {
        tree.map.get(self).and_then(|n| n.first_child)
    }

    /// Returns an iterator over all ancestors of the current node, including itself.
    pub fn ancestors<T>(self, tree: &Tree<T>) -> impl Iterator<Item = NodeKey> + '_ {
        let mut next = tree.contains(self).then_some(self);
        std::iter::from_fn(move || {
            let node = next;
            next = node.and_then(|n| n.parent(tree));
            node
        })
    }

    pub fn traverse_preorder<T>(self, tree: &Tree<T>) -> impl Iterator<Item = NodeKey> + '_ {
        PreorderTraversal {
            top: self,
            cur: tree.contains(self).then_some(self),
            tree,
        }
    }

    pub fn traverse_postorder<T>(self, tree: &Tree<T>) -> impl Iterator<Item = NodeKey> + '_ {
        PostorderTraversal {
            top: self,
            cur: tree.contains(self).then(|| PostorderTraversal::descend_left(self, tree)),
            tree,
        }
    }
}

struct PreorderTraversal<'a, T> {
    top: NodeKey,
    cur: Option<NodeKey>,
    tree: &'a Tree<T>,
}

impl<'a, T> Iterator for PreorderTraversal<'a, T> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        if let Some(child) = node.first_child(self.tree) {
            self.cur = Some(child);
        } else {
            self.cur = None;
            for ancestor in node.ancestors(self.tree) {
                if ancestor == self.top {
                    break;
                }
                if let Some(sibling) = ancestor.next_sibling(self.tree) {
                    self.cur = Some(sibling);
                    break;
                }
            }
        }
        Some(node)
    }
}

struct PostorderTraversal<'a, T> {
    top: NodeKey,
    cur: Option<NodeKey>,
    tree: &'a Tree<T>,
}

impl<'a, T> PostorderTraversal<'a, T> {
    fn descend_left(mut node: NodeKey, tree: &Tree<T>) -> NodeKey {
        while let Some(child) = node.first_child(tree) {
            node = child;
        }
        node
    }
}

impl<'a, T> Iterator for PostorderTraversal<'a, T> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = None;
        if node != self.top {
            if let Some(next) = node.next_sibling(self.tree) {
                self.cur = Some(Self::descend_left(next, self.tree));
            } else {
                self.cur = node.parent(self.tree);
            }
        }
        Some(node)
    }
}
