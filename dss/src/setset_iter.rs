use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use common::prelude::*;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::rngs::ThreadRng;
use rand::Rng;
use zddcore::prelude::*;
use zddcore::zdd_count;

use crate::setset::UniverseCore;

enum Kind {
    Dead,
    Member,
    Inner(ElemId, NodeId, NodeId),
}

fn classify(core: &Rc<RefCell<UniverseCore>>, id: NodeId) -> Kind {
    let c = core.borrow();
    match c.mgr.get_node(id).unwrap() {
        Node::Zero | Node::Undet => Kind::Dead,
        Node::One => Kind::Member,
        Node::NonTerminal(x) => Kind::Inner(c.mgr.level(id).unwrap(), x[0], x[1]),
    }
}

/// Deterministic member iteration: a depth-first walk taking high branches
/// first, so members appear in descending order of their largest elements.
/// The root is captured at creation; later mutation of the source family
/// does not affect the iterator.
pub struct SetSetIter {
    core: Rc<RefCell<UniverseCore>>,
    stack: Vec<(NodeId, Vec<ElemId>)>,
}

impl SetSetIter {
    pub(crate) fn new(core: Rc<RefCell<UniverseCore>>, root: NodeId) -> Self {
        Self {
            core,
            stack: vec![(root, Vec::new())],
        }
    }
}

impl Iterator for SetSetIter {
    type Item = BTreeSet<ElemId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, prefix) = self.stack.pop()?;
            match classify(&self.core, id) {
                Kind::Dead => {}
                Kind::Member => return Some(prefix.into_iter().collect()),
                Kind::Inner(e, lo, hi) => {
                    self.stack.push((lo, prefix.clone()));
                    let mut with = prefix;
                    with.push(e);
                    self.stack.push((hi, with));
                }
            }
        }
    }
}

/// Uniform random member draws. While the family holds at most 10^17
/// members each drawn member is removed from the iterator's working copy,
/// so the iterator terminates; above that bound removal is skipped and the
/// draws are with replacement.
pub struct RandomIter {
    core: Rc<RefCell<UniverseCore>>,
    root: NodeId,
    counts: DdHashMap<NodeId, BigUint>,
    replace: bool,
    rng: ThreadRng,
}

impl RandomIter {
    pub(crate) fn new(core: Rc<RefCell<UniverseCore>>, root: NodeId) -> Self {
        let mut counts = DdHashMap::default();
        let total = {
            let c = core.borrow();
            zdd_count::algo_c(&c.mgr, root, &mut counts)
        };
        let replace = total > BigUint::from(10u64).pow(17);
        Self {
            core,
            root,
            counts,
            replace,
            rng: rand::thread_rng(),
        }
    }
}

impl Iterator for RandomIter {
    type Item = BTreeSet<ElemId>;

    fn next(&mut self) -> Option<Self::Item> {
        {
            let c = self.core.borrow();
            if self.root == c.mgr.zero() {
                return None;
            }
        }
        let mut set: Vec<ElemId> = Vec::new();
        let mut cur = self.root;
        loop {
            match classify(&self.core, cur) {
                Kind::Dead => unreachable!("sampling walked into a dead branch"),
                Kind::Member => break,
                Kind::Inner(e, lo, hi) => {
                    let (c1, total) = {
                        let c = self.core.borrow();
                        let c0 = zdd_count::algo_c(&c.mgr, lo, &mut self.counts);
                        let c1 = zdd_count::algo_c(&c.mgr, hi, &mut self.counts);
                        (c1.clone(), c0 + c1)
                    };
                    let p = c1.to_f64().unwrap_or(0.5) / total.to_f64().unwrap_or(1.0);
                    if self.rng.gen::<f64>() < p {
                        set.push(e);
                        cur = hi;
                    } else {
                        cur = lo;
                    }
                }
            }
        }
        if !self.replace {
            let mut c = self.core.borrow_mut();
            let zero = c.mgr.zero();
            let mut z = c.mgr.one();
            for &e in set.iter().rev() {
                let h = c.elems[e - 1];
                z = c.mgr.create_node(h, zero, z);
            }
            self.root = c.mgr.setdiff(self.root, z);
        }
        Some(set.into_iter().collect())
    }
}

/// Weight-ordered member iteration driven by repeated best-member
/// extraction and subtraction.
pub struct WeightedIter {
    core: Rc<RefCell<UniverseCore>>,
    root: NodeId,
    weights: Vec<f64>,
}

impl WeightedIter {
    pub(crate) fn new(
        core: Rc<RefCell<UniverseCore>>,
        root: NodeId,
        weights: &[f64],
        maximize: bool,
    ) -> Self {
        let weights = if maximize {
            weights.to_vec()
        } else {
            weights.iter().map(|w| -w).collect()
        };
        Self {
            core,
            root,
            weights,
        }
    }
}

impl Iterator for WeightedIter {
    type Item = BTreeSet<ElemId>;

    fn next(&mut self) -> Option<Self::Item> {
        let best = {
            let c = self.core.borrow();
            zdd_count::algo_b(&c.mgr, self.root, &self.weights)?
        };
        let mut c = self.core.borrow_mut();
        let zero = c.mgr.zero();
        let mut z = c.mgr.one();
        for &e in &best {
            let h = c.elems[e - 1];
            z = c.mgr.create_node(h, zero, z);
        }
        self.root = c.mgr.setdiff(self.root, z);
        Some(best.into_iter().collect())
    }
}
