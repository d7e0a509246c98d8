use std::ops::Index;
use std::slice::Iter;

use crate::common::{HeaderId, Level, NodeId};

/// The trait for non-terminal node.
pub trait NonTerminal: Index<usize> {
    /// Returns the unique identifier of the node.
    fn id(&self) -> NodeId;

    /// Returns the header ID associated with the node.
    fn headerid(&self) -> HeaderId;

    /// Returns an iterator over the children of the non-terminal node.
    fn iter(&self) -> Iter<NodeId>;
}

#[derive(Debug)]
pub struct NodeHeader {
    id: HeaderId,
    level: Level,
    label: String,
    edge_num: usize,
}

impl NodeHeader {
    pub fn new(id: HeaderId, level: Level, label: &str, edge_num: usize) -> Self {
        Self {
            id,
            level,
            label: label.to_string(),
            edge_num,
        }
    }

    #[inline]
    pub fn id(&self) -> HeaderId {
        self.id
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn edge_num(&self) -> usize {
        self.edge_num
    }
}

/// The trait for a decision diagram forest.
pub trait DDForest {
    type Node;
    type NodeHeader;

    /// Returns the node associated with the given ID, or `None` if the ID
    /// is invalid.
    fn get_node(&self, id: NodeId) -> Option<&Self::Node>;

    /// Returns the header associated with the given ID, or `None` if the ID
    /// is invalid.
    fn get_header(&self, id: HeaderId) -> Option<&Self::NodeHeader>;

    /// Returns the label of the node's variable, or `None` for terminals.
    fn label(&self, id: NodeId) -> Option<&str>;

    /// Returns the level of the node's variable, or `None` for terminals.
    fn level(&self, id: NodeId) -> Option<Level>;
}
