/// Family-level filters over ZDDs: the subset/superset sieves, the
/// inclusion-wise minimal and maximal members, minimal hitting sets, the
/// meet, and the cardinality filter. All recursions are keyed in the
/// manager's operation cache; node identity makes the memoization sound.
use common::prelude::*;

use crate::nodes::*;
use crate::zdd::*;
use crate::zdd_ops::ZddOperation;

impl ZddManager {
    /// Members of `f` that are not a subset of any member of `g`.
    pub fn non_subsets(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::NonSubsets, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => self.undet(),
            (_, Node::Undet) => f,
            (_, Node::Zero) => f,
            (Node::Zero, _) => self.zero(),
            (Node::One, _) => self.zero(),
            (Node::NonTerminal(fnode), Node::One) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.non_subsets(f0, self.one());
                let high = f1;
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(_gnode))
                if self.level(f) > self.level(g) =>
            {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.non_subsets(f0, g);
                let high = f1;
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(_fnode), Node::NonTerminal(gnode))
                if self.level(f) < self.level(g) =>
            {
                let (g0, g1) = (gnode[0], gnode[1]);
                let gu = self.union(g0, g1);
                self.non_subsets(f, gu)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = fnode.headerid();
                let gu = self.union(g0, g1);
                let low = self.non_subsets(f0, gu);
                let high = self.non_subsets(f1, g1);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// Members of `f` that are not a superset of any member of `g`.
    pub fn non_supersets(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::NonSupersets, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => self.undet(),
            (_, Node::Undet) => f,
            (_, Node::Zero) => f,
            (_, Node::One) => self.zero(),
            (Node::Zero, _) => self.zero(),
            (Node::One, _) => {
                if self.includes_empty(g) {
                    self.zero()
                } else {
                    self.one()
                }
            }
            (Node::NonTerminal(_fnode), Node::NonTerminal(gnode))
                if self.level(f) < self.level(g) =>
            {
                let g0 = gnode[0];
                self.non_supersets(f, g0)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(_gnode))
                if self.level(f) > self.level(g) =>
            {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.non_supersets(f0, g);
                let high = self.non_supersets(f1, g);
                self.create_node(headerid, low, high)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = fnode.headerid();
                let low = self.non_supersets(f0, g0);
                let ha = self.non_supersets(f1, g0);
                let hb = self.non_supersets(f1, g1);
                let high = self.intersect(ha, hb);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// Members of `f` that are a subset of some member of `g`.
    pub fn permit(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let tmp = self.non_subsets(f, g);
        self.setdiff(f, tmp)
    }

    /// Members of `f` that are a superset of some member of `g`.
    pub fn restrict(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let tmp = self.non_supersets(f, g);
        self.setdiff(f, tmp)
    }

    /// The inclusion-wise minimal members of `f`.
    pub fn minimal(&mut self, f: NodeId) -> NodeId {
        let key = (ZddOperation::Minimal, f, 0);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match self.get_node(f).unwrap() {
            Node::Zero | Node::One | Node::Undet => f,
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let low = self.minimal(f0);
                let rh = self.minimal(f1);
                let high = self.non_supersets(rh, low);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// The inclusion-wise maximal members of `f`.
    pub fn maximal(&mut self, f: NodeId) -> NodeId {
        let key = (ZddOperation::Maximal, f, 0);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match self.get_node(f).unwrap() {
            Node::Zero | Node::One | Node::Undet => f,
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let high = self.maximal(f1);
                let rl = self.maximal(f0);
                let low = self.non_subsets(rl, high);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// The family of minimal hitting sets of `f`: minimal sets intersecting
    /// every member. Decomposing `f = f0 ∪ v·f1` on the top variable `v`, a
    /// hitting set either avoids `v` and hits `f0 ∪ f1`, or contains `v`
    /// and otherwise hits `f0`.
    pub fn hitting(&mut self, f: NodeId) -> NodeId {
        let key = (ZddOperation::Hitting, f, 0);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match self.get_node(f).unwrap() {
            Node::Undet => self.undet(),
            Node::Zero => self.one(),
            Node::One => self.zero(),
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                let fu = self.union(f0, f1);
                let without = self.hitting(fu);
                let hit0 = self.hitting(f0);
                let with = self.change(hit0, headerid);
                let all = self.union(without, with);
                self.minimal(all)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// The meet `{A ∩ B : A ∈ f, B ∈ g}`.
    pub fn meet(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let key = (ZddOperation::Meet, f, g);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match (self.get_node(f).unwrap(), self.get_node(g).unwrap()) {
            (Node::Undet, _) => self.undet(),
            (_, Node::Undet) => self.undet(),
            (Node::Zero, _) => self.zero(),
            (_, Node::Zero) => self.zero(),
            (Node::One, _) => self.one(),
            (_, Node::One) => self.one(),
            (Node::NonTerminal(fnode), Node::NonTerminal(_gnode))
                if self.level(f) > self.level(g) =>
            {
                let (f0, f1) = (fnode[0], fnode[1]);
                let fu = self.union(f0, f1);
                self.meet(fu, g)
            }
            (Node::NonTerminal(_fnode), Node::NonTerminal(gnode))
                if self.level(f) < self.level(g) =>
            {
                let (g0, g1) = (gnode[0], gnode[1]);
                let gu = self.union(g0, g1);
                self.meet(f, gu)
            }
            (Node::NonTerminal(fnode), Node::NonTerminal(gnode)) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let (g0, g1) = (gnode[0], gnode[1]);
                let headerid = fnode.headerid();
                let a = self.meet(f0, g0);
                let b = self.meet(f0, g1);
                let c = self.meet(f1, g0);
                let low = self.union(a, b);
                let low = self.union(low, c);
                let high = self.meet(f1, g1);
                self.create_node(headerid, low, high)
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// Members of `f` with at most `k` elements.
    pub fn permit_sym(&mut self, f: NodeId, k: usize) -> NodeId {
        let key = (ZddOperation::PermitSym, f, k);
        if let Some(id) = self.get_cache().get(&key) {
            return *id;
        }
        let result = match self.get_node(f).unwrap() {
            Node::Undet => self.undet(),
            Node::Zero => self.zero(),
            Node::One => self.one(),
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let headerid = fnode.headerid();
                if k == 0 {
                    if self.includes_empty(f) {
                        self.one()
                    } else {
                        self.zero()
                    }
                } else {
                    let low = self.permit_sym(f0, k);
                    let high = self.permit_sym(f1, k - 1);
                    self.create_node(headerid, low, high)
                }
            }
        };
        self.get_mut_cache().insert(key, result);
        result
    }

    /// The family of all subsets of the variables named by `headers`, which
    /// must be given in ascending level order.
    pub fn power_set(&mut self, headers: &[HeaderId]) -> NodeId {
        let mut f = self.one();
        for &h in headers {
            f = self.create_node(h, f, f);
        }
        f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles(dd: &mut ZddManager, n: usize) -> Vec<NodeId> {
        (1..=n)
            .map(|e| {
                let h = dd.create_header(e, &format!("x{}", e));
                dd.single(h)
            })
            .collect()
    }

    #[test]
    fn minimal_drops_supersets() {
        let mut dd = ZddManager::new();
        let xs = singles(&mut dd, 3);
        let ab = dd.product(xs[0], xs[1]);
        let f = dd.union(ab, xs[0]);
        let f = dd.union(f, xs[2]);
        let m = dd.minimal(f);
        // {a} and {c} survive, {a,b} does not
        let expect = dd.union(xs[0], xs[2]);
        assert_eq!(m, expect);
    }

    #[test]
    fn maximal_drops_subsets() {
        let mut dd = ZddManager::new();
        let xs = singles(&mut dd, 3);
        let ab = dd.product(xs[0], xs[1]);
        let f = dd.union(ab, xs[0]);
        let f = dd.union(f, xs[2]);
        let m = dd.maximal(f);
        let expect = dd.union(ab, xs[2]);
        assert_eq!(m, expect);
    }

    #[test]
    fn hitting_two_singletons() {
        let mut dd = ZddManager::new();
        let xs = singles(&mut dd, 2);
        // F = {{a},{b}}; the only minimal hitting set is {a,b}
        let f = dd.union(xs[0], xs[1]);
        let h = dd.hitting(f);
        let ab = dd.product(xs[0], xs[1]);
        assert_eq!(h, ab);
    }

    #[test]
    fn permit_sym_filters_cardinality() {
        let mut dd = ZddManager::new();
        let xs = singles(&mut dd, 2);
        let ab = dd.product(xs[0], xs[1]);
        let f = dd.union(ab, xs[0]);
        let f = dd.union(f, dd.one());
        let le1 = dd.permit_sym(f, 1);
        let expect = dd.union(xs[0], dd.one());
        assert_eq!(le1, expect);
        let le0 = dd.permit_sym(f, 0);
        assert_eq!(le0, dd.one());
    }

    #[test]
    fn power_set_counts() {
        let mut dd = ZddManager::new();
        let hs: Vec<_> = (1..=3).map(|e| dd.create_header(e, &format!("x{}", e))).collect();
        let p = dd.power_set(&hs);
        assert_eq!(dd.count(p), 5); // 3 nodes + 2 terminals
    }
}
