//! The serialized board: `{"nodes": {id: {"value", "neighbors", "position"}}}`.
//!
//! This is both the format custom boards are loaded from and the shape clients render, so nodes keep board order on the way out and document order on the way in.

use std::fmt::Formatter;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::board::BoardGraph;
use crate::error::{GameError, Result};
use crate::location::Position;
use crate::phase::Phase;

/// One node of a [`BoardLayout`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    /// The phase on this node; `null` while unplayed.
    #[serde(default)]
    pub value: Option<Phase>,
    /// Names of adjacent nodes.
    #[serde(default)]
    pub neighbors: Vec<String>,
    /// Display position as `[x, y]`.
    #[serde(default)]
    pub position: Position,
}

/// A whole board in wire form.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Nodes in board order.
    #[serde(with = "ordered_nodes")]
    pub nodes: Vec<(String, NodeLayout)>,
}

impl BoardLayout {
    /// The layout entry for `name`, if present.
    pub fn node(&self, name: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }
}

mod ordered_nodes {
    use super::*;

    pub(super) fn serialize<S: Serializer>(nodes: &[(String, NodeLayout)], serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(nodes.len()))?;
        for (name, node) in nodes {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<(String, NodeLayout)>, D::Error> {
        deserializer.deserialize_map(NodesVisitor)
    }

    struct NodesVisitor;

    impl<'de> Visitor<'de> for NodesVisitor {
        type Value = Vec<(String, NodeLayout)>;

        fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
            f.write_str("a map of node names to nodes")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
            let mut nodes = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry::<String, NodeLayout>()? {
                nodes.push(entry);
            }
            Ok(nodes)
        }
    }
}

impl BoardGraph {
    /// Serialize this board into its wire form.
    pub fn to_layout(&self) -> BoardLayout {
        BoardLayout {
            nodes: self.cells()
                .map(|(id, cell)| (cell.name().to_owned(), NodeLayout {
                    value: cell.value(),
                    neighbors: self.neighbors(id).map(|n| self.name(n).to_owned()).collect(),
                    position: cell.position().clone(),
                }))
                .collect(),
        }
    }

    /// Rebuild a board from its wire form.
    ///
    /// Neighbor references to names not present in the layout are ignored, as are repeated node names after the first.
    /// Adjacency only needs to be listed on one side; it is made symmetric regardless.
    pub fn from_layout(layout: &BoardLayout) -> Result<Self> {
        let mut board = Self::new();
        for (name, node) in &layout.nodes {
            board.add_node(name.as_str(), node.position.clone());
        }

        for (name, node) in &layout.nodes {
            let id = board.id_of(name)?;
            for neighbor in &node.neighbors {
                let Ok(other) = board.id_of(neighbor) else {
                    debug!(node = %name, neighbor = %neighbor, "skipping unknown neighbor");
                    continue;
                };
                if other == id {
                    return Err(GameError::InvalidLayout(format!("node {name:?} lists itself as a neighbor")));
                }
                board.connect(id, other)?;
            }
        }

        for (name, node) in &layout.nodes {
            if let Some(phase) = node.value {
                let id = board.id_of(name)?;
                // a repeated name may carry a second value for the same cell
                if board.value(id).is_none() {
                    board.set_value(id, phase)?;
                }
            }
        }

        Ok(board)
    }

    /// [`Self::from_layout`] on a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: BoardLayout = serde_json::from_str(json)
            .map_err(|e| GameError::InvalidLayout(e.to_string()))?;
        Self::from_layout(&layout)
    }
}
