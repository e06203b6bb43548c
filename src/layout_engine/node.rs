//! The nested, serializable form of a layout.
//!
//! [`LayoutNode`] is what gets stored and exchanged with other collaborators.
//! The engine itself works on [`LayoutTree`](super::LayoutTree), which is built
//! from and converted back to this shape.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::graph::{NodeKind, Orientation, PaneKind};

/// Opaque identifier of a layout node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(String);

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

impl PaneId {
    pub fn new(id: impl Into<String>) -> Self { PaneId(id.into()) }

    /// Returns an id of the form `node-{millis}-{sequence}`.
    ///
    /// Unique within the process; the timestamp keeps ids from separate
    /// sessions apart when saved layouts are merged.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        PaneId(format!("node-{millis}-{}", to_base36(seq)))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut buf = Vec::new();
    loop {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

impl Deref for PaneId {
    type Target = str;

    fn deref(&self) -> &str { &self.0 }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for PaneId {
    fn from(s: &str) -> Self { PaneId(s.to_owned()) }
}

impl From<String> for PaneId {
    fn from(s: String) -> Self { PaneId(s) }
}

/// One node of a layout document.
///
/// Containers list their children in `panes`; leaves leave it out. Sizes are
/// percentages of the parent's extent along its split axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PaneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panes: Option<Vec<LayoutNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
}

impl LayoutNode {
    pub fn pane(kind: impl Into<PaneKind>) -> Self {
        LayoutNode {
            kind: NodeKind::Pane(kind.into()),
            id: None,
            panes: None,
            default_size: None,
            min_size: None,
        }
    }

    pub fn container(orientation: Orientation, panes: Vec<LayoutNode>) -> Self {
        LayoutNode {
            kind: NodeKind::Container(orientation),
            id: None,
            panes: Some(panes),
            default_size: None,
            min_size: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<PaneId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_size(mut self, default_size: f64) -> Self {
        self.default_size = Some(default_size);
        self
    }

    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn children(&self) -> &[LayoutNode] { self.panes.as_deref().unwrap_or_default() }

    /// Assigns a fresh id to every node in this subtree that lacks one. An
    /// empty id counts as missing.
    pub fn ensure_ids(mut self) -> Self {
        self.ensure_ids_in_place();
        self
    }

    pub(crate) fn ensure_ids_in_place(&mut self) {
        if self.id.as_ref().is_none_or(|id| id.is_empty()) {
            self.id = Some(PaneId::generate());
        }
        for child in self.panes.iter_mut().flatten() {
            child.ensure_ids_in_place();
        }
    }
}

/// Returns `node` with an id on every node, keeping the ids already present.
pub fn ensure_ids(node: LayoutNode) -> LayoutNode { node.ensure_ids() }
