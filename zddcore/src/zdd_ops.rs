use common::prelude::*;

use crate::nodes::*;
use crate::zdd::*;

#[derive(Debug, PartialEq, Eq, Hash)]
pub enum ZddOperation {
    Intersect,
    Union,
    Setdiff,
    Product,
    Division,
    Change,
    Onset,
    Offset,
    NonSubsets,
    NonSupersets,
    Minimal,
    Maximal,
    Hitting,
    Meet,
    PermitSym,
}

impl ZddManager {
    pub fn intersect(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::Intersect, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => g,
            (_, Node::Undet) => f,
            (Node::Zero, _) => self.zero(),
            (_, Node::Zero) => self.zero(),
            (Node::One, _) => {
                if self.includes_empty(g) {
                    self.one()
                } else {
                    self.zero()
                }
            }
            (_, Node::One) => {
                if self.includes_empty(f) {
                    self.one()
                } else {
                    self.zero()
                }
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) if fnode.id() == gnode.id() => f,
            (Node::NonTerminal(fnode), Node::NonTerminal(_gnode))
                if self.level(f) > self.level(g) =>
            {
                let f0 = fnode[0];
                self.intersect(f0, g)
            }
            (Node::NonTerminal(_fnode), Node::NonTerminal(gnode))
                if self.level(f) < self.level(g) =>
            {
                let g0 = gnode[0];
                self.intersect(f, g0)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = fnode.headerid();
                let low = self.intersect(f0, g0);
                let high = self.intersect(f1, g1);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    pub fn union(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::Union, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => g,
            (_, Node::Undet) => f,
            (Node::Zero, _) => g,
            (_, Node::Zero) => f,
            (Node::One, Node::One) => self.one(),
            (Node::NonTerminal(fnode), Node::One) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.union(f0, self.one());
                let high = f1;
                self.create_node(headerid, low, high)
            }
            (Node::One, Node::NonTerminal(gnode)) => {
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = gnode.headerid();
                let low = self.union(self.one(), g0);
                let high = g1;
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) if fnode.id() == gnode.id() => f,
            (Node::NonTerminal(fnode), Node::NonTerminal(_gnode))
                if self.level(f) > self.level(g) =>
            {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.union(f0, g);
                let high = f1;
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(_fnode), Node::NonTerminal(gnode))
                if self.level(f) < self.level(g) =>
            {
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = gnode.headerid();
                let low = self.union(f, g0);
                let high = g1;
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = fnode.headerid();
                let low = self.union(f0, g0);
                let high = self.union(f1, g1);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    pub fn setdiff(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::Setdiff, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => self.undet(),
            (_, Node::Undet) => f,
            (Node::Zero, _) => self.zero(),
            (_, Node::Zero) => f,
            (Node::One, Node::One) => self.zero(),
            (Node::NonTerminal(fnode), Node::One) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.setdiff(f0, self.one());
                let high = f1;
                self.create_node(headerid, low, high)
            }
            (Node::One, Node::NonTerminal(gnode)) => {
                let g0 = gnode[0];
                self.setdiff(self.one(), g0)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) if fnode.id() == gnode.id() => {
                self.zero()
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(_gnode))
                if self.level(f) > self.level(g) =>
            {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.setdiff(f0, g);
                let high = f1;
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(_fnode), Node::NonTerminal(gnode))
                if self.level(f) < self.level(g) =>
            {
                let g0 = gnode[0];
                self.setdiff(f, g0)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = fnode.headerid();
                let low = self.setdiff(f0, g0);
                let high = self.setdiff(f1, g1);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// Unate product, i.e. the join `{A ∪ B : A ∈ f, B ∈ g}`.
    pub fn product(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::Product, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => self.undet(),
            (_, Node::Undet) => self.undet(),
            (Node::Zero, _) => self.zero(),
            (_, Node::Zero) => self.zero(),
            (_, Node::One) => f,
            (Node::One, _) => g,
            (Node::NonTerminal(fnode), Node::NonTerminal(_gnode))
                if self.level(f) > self.level(g) =>
            {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.product(f0, g);
                let high = self.product(f1, g);
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(_fnode), Node::NonTerminal(gnode))
                if self.level(f) < self.level(g) =>
            {
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = gnode.headerid();
                let low = self.product(f, g0);
                let high = self.product(f, g1);
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = fnode.headerid();
                let low = self.product(f0, g0);
                let high = self.product(f1, g1);
                let tmp = self.product(f1, g0);
                let high = self.union(high, tmp);
                let tmp = self.product(f0, g1);
                let high = self.union(high, tmp);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// Weak division: the largest family `q` over the variables of `f` such
    /// that `q` contains no variable of `g`, every `X ∈ q` and `Y ∈ g` are
    /// disjoint, and `X ∪ Y ∈ f`. Division by the 0 terminal yields the
    /// undetermined node; callers guard against it.
    pub fn divide(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::Division, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => self.undet(),
            (_, Node::Undet) => self.undet(),
            (_, Node::Zero) => self.undet(),
            (_, Node::One) => f,
            (Node::Zero, _) => self.zero(),
            (Node::One, _) => self.zero(),
            (Node::NonTerminal(_), Node::NonTerminal(gnode)) => {
                // The recursion is driven by the top variable of g; members
                // of f above it restrict through onset/offset.
                let (g0, g1) = (gnode[0], gnode[1]);
                let h = gnode.headerid();
                if self.level(f) < self.level(g) {
                    self.zero()
                } else {
                    let f1 = self.onset0(f, h);
                    let f0 = self.offset(f, h);
                    let q = self.divide(f1, g1);
                    if q == self.zero() || g0 == self.zero() {
                        q
                    } else {
                        let q0 = self.divide(f0, g0);
                        self.intersect(q, q0)
                    }
                }
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// Remainder of the weak division, `f − (f / g) * g`.
    pub fn remainder(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let q = self.divide(f, g);
        let p = self.product(q, g);
        self.setdiff(f, p)
    }

    /// The singleton family `{{v}}` for the variable of header `h`.
    pub fn single(&mut self, h: HeaderId) -> NodeId {
        let zero = self.zero();
        let one = self.one();
        self.create_node(h, zero, one)
    }

    /// Toggles the variable of header `h` in every member of `f`, i.e. the
    /// XOR with the singleton family of that variable.
    pub fn change(&mut self, f: NodeId, h: HeaderId) -> NodeId {
        let key = (ZddOperation::Change, f, h);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let v = self.header_level(h);
        let result = match self.get_node(f).unwrap() {
            Node::Undet => self.undet(),
            Node::Zero => self.zero(),
            Node::One => {
                let zero = self.zero();
                let one = self.one();
                self.create_node(h, zero, one)
            }
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                match self.level(f).unwrap() {
                    lf if lf < v => {
                        let zero = self.zero();
                        self.create_node(h, zero, f)
                    }
                    lf if lf == v => self.create_node(headerid, f1, f0),
                    _ => {
                        let low = self.change(f0, h);
                        let high = self.change(f1, h);
                        self.create_node(headerid, low, high)
                    }
                }
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// The subfamily of members containing the variable of `h`, with that
    /// variable removed.
    pub fn onset0(&mut self, f: NodeId, h: HeaderId) -> NodeId {
        let key = (ZddOperation::Onset, f, h);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let v = self.header_level(h);
        let result = match self.get_node(f).unwrap() {
            Node::Undet => self.undet(),
            Node::Zero | Node::One => self.zero(),
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                match self.level(f).unwrap() {
                    lf if lf < v => self.zero(),
                    lf if lf == v => f1,
                    _ => {
                        let low = self.onset0(f0, h);
                        let high = self.onset0(f1, h);
                        self.create_node(headerid, low, high)
                    }
                }
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// The subfamily of members not containing the variable of `h`.
    pub fn offset(&mut self, f: NodeId, h: HeaderId) -> NodeId {
        let key = (ZddOperation::Offset, f, h);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let v = self.header_level(h);
        let result = match self.get_node(f).unwrap() {
            Node::Undet => self.undet(),
            Node::Zero => self.zero(),
            Node::One => self.one(),
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                match self.level(f).unwrap() {
                    lf if lf < v => f,
                    lf if lf == v => f0,
                    _ => {
                        let low = self.offset(f0, h);
                        let high = self.offset(f1, h);
                        self.create_node(headerid, low, high)
                    }
                }
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }
}
