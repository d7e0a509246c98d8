/// ZDD (Zero-suppressed Binary Decision Diagram)
///
/// Description:
///
/// A ZDD is a rooted directed acyclic graph (DAG) with two terminal nodes,
/// 0 and 1. Each non-terminal node has a level and two edges, low and high.
/// The level is an integer that represents the variable of the node; the
/// family members that contain the variable continue through the high edge,
/// the members that do not continue through the low edge.
///
/// The manager keeps a unique table that maps (header, low, high) to the
/// non-terminal node carrying that triple, so structurally equal nodes share
/// identity, and a cache that maps (operation, f, g) to the result node.
/// Creating a node whose high edge is the 0 terminal returns the low edge
/// instead (zero-suppression rule), so every stored node is reduced.
use common::prelude::*;

use crate::nodes::*;
use crate::zdd_ops::ZddOperation;

pub struct ZddManager {
    headers: Vec<NodeHeader>,
    nodes: Vec<Node>,
    zero: NodeId,
    one: NodeId,
    undet: NodeId,
    utable: DdHashMap<(HeaderId, NodeId, NodeId), NodeId>,
    cache: DdHashMap<(ZddOperation, NodeId, NodeId), NodeId>,
}

impl DDForest for ZddManager {
    type Node = Node;
    type NodeHeader = NodeHeader;

    #[inline]
    fn get_node(&self, id: NodeId) -> Option<&Self::Node> {
        self.nodes.get(id)
    }

    #[inline]
    fn get_header(&self, id: HeaderId) -> Option<&NodeHeader> {
        self.headers.get(id)
    }

    fn level(&self, id: NodeId) -> Option<Level> {
        self.get_node(id).and_then(|node| match node {
            Node::NonTerminal(fnode) => self.get_header(fnode.headerid()).map(|x| x.level()),
            Node::Zero | Node::One | Node::Undet => None,
        })
    }

    fn label(&self, id: NodeId) -> Option<&str> {
        self.get_node(id).and_then(|node| match node {
            Node::NonTerminal(fnode) => self.get_header(fnode.headerid()).map(|x| x.label()),
            Node::Zero | Node::One | Node::Undet => None,
        })
    }
}

impl Default for ZddManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ZddManager {
    pub fn new() -> Self {
        let headers = Vec::default();
        let mut nodes = Vec::default();
        nodes.push(Node::Zero);
        nodes.push(Node::One);
        nodes.push(Node::Undet);
        let zero = nodes[0].id();
        let one = nodes[1].id();
        let undet = nodes[2].id();
        let utable = DdHashMap::default();
        let cache = DdHashMap::default();
        Self {
            headers,
            nodes,
            zero,
            one,
            undet,
            utable,
            cache,
        }
    }

    fn new_nonterminal(&mut self, headerid: HeaderId, low: NodeId, high: NodeId) -> NodeId {
        let id = self.nodes.len();
        let node = Node::NonTerminal(NonTerminalZdd::new(id, headerid, [low, high]));
        self.nodes.push(node);
        debug_assert!(id == self.nodes[id].id());
        id
    }

    pub fn create_header(&mut self, level: Level, label: &str) -> HeaderId {
        let id = self.headers.len();
        let tmp = NodeHeader::new(id, level, label, 2);
        self.headers.push(tmp);
        debug_assert!(id == self.headers[id].id());
        id
    }

    pub fn create_node(&mut self, header: HeaderId, low: NodeId, high: NodeId) -> NodeId {
        if high == self.zero {
            return low;
        }
        let key = (header, low, high);
        if let Some(nodeid) = self.utable.get(&key) {
            return *nodeid;
        }
        let node = self.new_nonterminal(header, low, high);
        self.utable.insert(key, node);
        node
    }

    pub fn size(&self) -> (usize, usize, usize) {
        (self.headers.len(), self.nodes.len(), self.cache.len())
    }

    #[inline]
    pub fn zero(&self) -> NodeId {
        self.zero
    }

    #[inline]
    pub fn one(&self) -> NodeId {
        self.one
    }

    #[inline]
    pub fn undet(&self) -> NodeId {
        self.undet
    }

    #[inline]
    pub fn get_cache(&self) -> &DdHashMap<(ZddOperation, NodeId, NodeId), NodeId> {
        &self.cache
    }

    #[inline]
    pub fn get_mut_cache(&mut self) -> &mut DdHashMap<(ZddOperation, NodeId, NodeId), NodeId> {
        &mut self.cache
    }

    #[inline]
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Level of the header, used to order recursion on element operations.
    #[inline]
    pub fn header_level(&self, h: HeaderId) -> Level {
        self.headers[h].level()
    }

    /// True when the family rooted at `f` contains the empty set, i.e. the
    /// chain of low edges from `f` ends in the 1 terminal.
    pub fn includes_empty(&self, f: NodeId) -> bool {
        let mut cur = f;
        loop {
            match self.get_node(cur).unwrap() {
                Node::One => return true,
                Node::Zero | Node::Undet => return false,
                Node::NonTerminal(fnode) => cur = fnode[0],
            }
        }
    }

    /// Number of nodes reachable from `f`, terminals included.
    pub fn count(&self, f: NodeId) -> usize {
        let mut visited = DdHashSet::default();
        self.count_impl(f, &mut visited);
        visited.len()
    }

    fn count_impl(&self, f: NodeId, visited: &mut DdHashSet<NodeId>) {
        if visited.contains(&f) {
            return;
        }
        if let Node::NonTerminal(fnode) = self.get_node(f).unwrap() {
            let (f0, f1) = (fnode[0], fnode[1]);
            self.count_impl(f0, visited);
            self.count_impl(f1, visited);
        }
        visited.insert(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_header() {
        let h = NodeHeader::new(0, 1, "test", 2);
        println!("{:?}", h);
        println!("{:?}", h.level());
    }

    #[test]
    fn new_terminal() {
        let zero = Node::Zero;
        let one = Node::One;
        println!("{:?}", zero);
        println!("{:?}", one);
    }

    #[test]
    fn create_single() {
        let mut dd = ZddManager::new();
        let h1 = dd.create_header(1, "x");
        let h2 = dd.create_header(2, "y");
        let x = dd.create_node(h1, dd.zero(), dd.one());
        println!("{:?}", dd.get_node(x));
        let y = dd.create_node(h2, dd.zero(), dd.one());
        println!("{:?}", dd.get_node(y));
        assert_ne!(x, y);
    }

    #[test]
    fn suppression_rule() {
        let mut dd = ZddManager::new();
        let h1 = dd.create_header(1, "x");
        let f = dd.create_node(h1, dd.one(), dd.zero());
        assert_eq!(f, dd.one());
    }

    #[test]
    fn hash_cons() {
        let mut dd = ZddManager::new();
        let h1 = dd.create_header(1, "x");
        let f = dd.create_node(h1, dd.zero(), dd.one());
        let g = dd.create_node(h1, dd.zero(), dd.one());
        assert_eq!(f, g);
    }

    #[test]
    fn includes_empty() {
        let mut dd = ZddManager::new();
        let h1 = dd.create_header(1, "x");
        let x = dd.create_node(h1, dd.zero(), dd.one());
        assert!(!dd.includes_empty(x));
        let f = dd.create_node(h1, dd.one(), dd.one());
        assert!(dd.includes_empty(f));
    }
}
