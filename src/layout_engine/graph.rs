use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn perpendicular(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Where a dragged pane lands relative to the pane under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DropPosition {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl DropPosition {
    /// Split axis implied by an edge drop. A center drop carries no axis.
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            DropPosition::Top | DropPosition::Bottom => Some(Orientation::Vertical),
            DropPosition::Left | DropPosition::Right => Some(Orientation::Horizontal),
            DropPosition::Center => None,
        }
    }

    /// Whether the dropped node goes before the target in split order.
    pub fn is_before(self) -> bool { matches!(self, DropPosition::Top | DropPosition::Left) }
}

/// Content kind of a leaf pane.
///
/// The engine never interprets these; unknown kinds round-trip through
/// [`PaneKind::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaneKind {
    Leaf,
    Graph,
    Map,
    Table,
    Gauge,
    Custom(String),
}

impl PaneKind {
    pub fn as_str(&self) -> &str {
        match self {
            PaneKind::Leaf => "leaf",
            PaneKind::Graph => "graph",
            PaneKind::Map => "map",
            PaneKind::Table => "table",
            PaneKind::Gauge => "gauge",
            PaneKind::Custom(name) => name,
        }
    }

    /// Names claimed by container kinds cannot label a pane.
    pub fn is_reserved(&self) -> bool {
        matches!(self.as_str(), "horizontal" | "vertical")
    }
}

impl From<&str> for PaneKind {
    fn from(s: &str) -> Self {
        match s {
            "leaf" => PaneKind::Leaf,
            "graph" => PaneKind::Graph,
            "map" => PaneKind::Map,
            "table" => PaneKind::Table,
            "gauge" => PaneKind::Gauge,
            other => PaneKind::Custom(other.to_owned()),
        }
    }
}

impl From<String> for PaneKind {
    fn from(s: String) -> Self {
        match PaneKind::from(s.as_str()) {
            PaneKind::Custom(_) => PaneKind::Custom(s),
            known => known,
        }
    }
}

impl From<PaneKind> for String {
    fn from(kind: PaneKind) -> Self {
        match kind {
            PaneKind::Custom(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for PaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// What a layout node is: a split container or a content pane.
///
/// Serialized as a single string, `"horizontal"`/`"vertical"` for containers
/// and the pane kind otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Container(Orientation),
    Pane(PaneKind),
}

impl NodeKind {
    pub fn is_container(&self) -> bool { matches!(self, NodeKind::Container(_)) }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            NodeKind::Container(orientation) => Some(*orientation),
            NodeKind::Pane(_) => None,
        }
    }

    pub fn pane_kind(&self) -> Option<&PaneKind> {
        match self {
            NodeKind::Pane(kind) => Some(kind),
            NodeKind::Container(_) => None,
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "horizontal" => NodeKind::Container(Orientation::Horizontal),
            "vertical" => NodeKind::Container(Orientation::Vertical),
            _ => NodeKind::Pane(PaneKind::from(s)),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self { kind.to_string() }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Container(orientation) => write!(f, "{orientation}"),
            NodeKind::Pane(kind) => write!(f, "{kind}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    mod drop_position {
        use super::*;

        #[test]
        fn edge_orientation() {
            assert_eq!(DropPosition::Top.orientation(), Some(Orientation::Vertical));
            assert_eq!(DropPosition::Bottom.orientation(), Some(Orientation::Vertical));
            assert_eq!(DropPosition::Left.orientation(), Some(Orientation::Horizontal));
            assert_eq!(DropPosition::Right.orientation(), Some(Orientation::Horizontal));
            assert_eq!(DropPosition::Center.orientation(), None);
        }

        #[test]
        fn before_positions() {
            assert!(DropPosition::Top.is_before());
            assert!(DropPosition::Left.is_before());
            assert!(!DropPosition::Bottom.is_before());
            assert!(!DropPosition::Right.is_before());
            assert!(!DropPosition::Center.is_before());
        }

        #[test]
        fn parses_lowercase_names() {
            assert_eq!(DropPosition::from_str("center"), Ok(DropPosition::Center));
            assert_eq!(DropPosition::Left.to_string(), "left");
            assert!(DropPosition::from_str("middle").is_err());
        }
    }

    mod node_kind {
        use super::*;

        #[test]
        fn container_names() {
            assert_eq!(
                NodeKind::from("horizontal".to_owned()),
                NodeKind::Container(Orientation::Horizontal)
            );
            assert_eq!(
                NodeKind::from("vertical".to_owned()),
                NodeKind::Container(Orientation::Vertical)
            );
        }

        #[test]
        fn unknown_pane_kinds_are_kept() {
            let kind = NodeKind::from("spectrogram".to_owned());
            assert_eq!(kind, NodeKind::Pane(PaneKind::Custom("spectrogram".into())));
            assert_eq!(String::from(kind), "spectrogram");
        }

        #[test]
        fn known_pane_kinds() {
            assert_eq!(NodeKind::from("map".to_owned()), NodeKind::Pane(PaneKind::Map));
            assert_eq!(PaneKind::from("graph".to_owned()), PaneKind::Graph);
            assert_eq!(PaneKind::Gauge.to_string(), "gauge");
        }

        #[test]
        fn reserved_names() {
            assert!(PaneKind::from("vertical").is_reserved());
            assert!(!PaneKind::Table.is_reserved());
        }

        #[test]
        fn orientation_flip() {
            assert_eq!(Orientation::Horizontal.perpendicular(), Orientation::Vertical);
            assert_eq!(Orientation::Vertical.perpendicular(), Orientation::Horizontal);
        }
    }
}
