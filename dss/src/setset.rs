use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::rc::{Rc, Weak};

use common::prelude::*;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use zddcore::prelude::*;
use zddcore::{zdd_count, zdd_io};

use crate::error::{Error, Result};
use crate::setset_iter::{RandomIter, SetSetIter, WeightedIter};

/// Upper bound on the number of elements a universe may hold.
pub const ELEM_LIMIT: usize = 1 << 20;

pub(crate) struct UniverseCore {
    pub(crate) mgr: ZddManager,
    pub(crate) elems: Vec<HeaderId>,
}

/// The kernel context shared by every family built over one element
/// universe: the node manager and one variable header per element. The
/// number of elements is fixed at creation; build a new universe to change
/// it.
pub struct Universe {
    core: Rc<RefCell<UniverseCore>>,
}

impl Universe {
    pub fn new(num_elems: usize) -> Result<Self> {
        if num_elems > ELEM_LIMIT {
            return Err(Error::KernelExhausted(format!(
                "cannot allocate {} elements (limit {})",
                num_elems, ELEM_LIMIT
            )));
        }
        let mut mgr = ZddManager::new();
        let elems = (1..=num_elems)
            .map(|e| mgr.create_header(e, &format!("e{}", e)))
            .collect();
        Ok(Self {
            core: Rc::new(RefCell::new(UniverseCore { mgr, elems })),
        })
    }

    pub fn num_elems(&self) -> usize {
        self.core.borrow().elems.len()
    }

    pub(crate) fn core(&self) -> Rc<RefCell<UniverseCore>> {
        Rc::clone(&self.core)
    }

    pub(crate) fn wrap(&self, root: NodeId) -> SetSet {
        SetSet {
            parent: Rc::downgrade(&self.core),
            root,
        }
    }

    /// The empty family.
    pub fn empty(&self) -> SetSet {
        let root = self.core.borrow().mgr.zero();
        self.wrap(root)
    }

    /// The family containing only the empty set.
    pub fn unit(&self) -> SetSet {
        let root = self.core.borrow().mgr.one();
        self.wrap(root)
    }

    /// The family of all subsets of the universe.
    pub fn power(&self) -> SetSet {
        let mut core = self.core.borrow_mut();
        let elems = core.elems.clone();
        let root = core.mgr.power_set(&elems);
        drop(core);
        self.wrap(root)
    }

    fn check_elem(&self, e: ElemId) -> Result<()> {
        if e == 0 || e > self.num_elems() {
            return Err(Error::InvalidArgument(format!(
                "element {} out of range",
                e
            )));
        }
        Ok(())
    }

    fn set_root(&self, s: &BTreeSet<ElemId>) -> Result<NodeId> {
        for &e in s {
            self.check_elem(e)?;
        }
        let mut core = self.core.borrow_mut();
        let zero = core.mgr.zero();
        let mut root = core.mgr.one();
        for &e in s {
            let h = core.elems[e - 1];
            root = core.mgr.create_node(h, zero, root);
        }
        Ok(root)
    }

    /// The family holding the listed sets.
    pub fn from_sets(&self, sets: &[BTreeSet<ElemId>]) -> Result<SetSet> {
        let mut root = self.core.borrow().mgr.zero();
        for s in sets {
            let z = self.set_root(s)?;
            root = self.core.borrow_mut().mgr.union(root, z);
        }
        Ok(self.wrap(root))
    }

    /// The family of every superset of `include` that is disjoint from
    /// `exclude`.
    pub fn from_constraints(&self, include: &[ElemId], exclude: &[ElemId]) -> Result<SetSet> {
        for &e in include.iter().chain(exclude.iter()) {
            self.check_elem(e)?;
        }
        let inc: BTreeSet<ElemId> = include.iter().copied().collect();
        let exc: BTreeSet<ElemId> = exclude.iter().copied().collect();
        if !inc.is_disjoint(&exc) {
            return Err(Error::InvalidArgument(
                "include and exclude overlap".to_string(),
            ));
        }
        let mut core = self.core.borrow_mut();
        let n = core.elems.len();
        let zero = core.mgr.zero();
        let mut root = core.mgr.one();
        for e in 1..=n {
            let h = core.elems[e - 1];
            root = if inc.contains(&e) {
                core.mgr.create_node(h, zero, root)
            } else if exc.contains(&e) {
                root
            } else {
                core.mgr.create_node(h, root, root)
            };
        }
        drop(core);
        Ok(self.wrap(root))
    }

    /// Reads a family from its serialized form.
    pub fn load<R: BufRead>(&self, io: R) -> Result<SetSet> {
        let mut core = self.core.borrow_mut();
        let elems = core.elems.clone();
        let root = zdd_io::load(&mut core.mgr, io, &elems)?;
        drop(core);
        Ok(self.wrap(root))
    }
}

/// One family of sets over a universe: a shared handle to a ZDD root. The
/// universe must outlive every family built over it.
pub struct SetSet {
    parent: Weak<RefCell<UniverseCore>>,
    root: NodeId,
}

impl Clone for SetSet {
    fn clone(&self) -> Self {
        SetSet {
            parent: self.parent.clone(),
            root: self.root,
        }
    }
}

impl fmt::Debug for SetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetSet({})", self.root)
    }
}

impl PartialEq for SetSet {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.parent, &other.parent) && self.root == other.root
    }
}

impl Eq for SetSet {}

impl PartialOrd for SetSet {
    /// The subset order on families; unrelated families compare as `None`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !Weak::ptr_eq(&self.parent, &other.parent) {
            return None;
        }
        if self.root == other.root {
            return Some(Ordering::Equal);
        }
        if self.is_subset(other) {
            Some(Ordering::Less)
        } else if self.is_superset(other) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl SetSet {
    fn core(&self) -> Rc<RefCell<UniverseCore>> {
        self.parent.upgrade().unwrap()
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub fn num_elems(&self) -> usize {
        self.core().borrow().elems.len()
    }

    fn derived(&self, root: NodeId) -> SetSet {
        SetSet {
            parent: self.parent.clone(),
            root,
        }
    }

    fn binop(&self, other: &SetSet, f: impl FnOnce(&mut ZddManager, NodeId, NodeId) -> NodeId) -> SetSet {
        let core = self.core();
        let root = f(&mut core.borrow_mut().mgr, self.root, other.root);
        self.derived(root)
    }

    fn unop(&self, f: impl FnOnce(&mut ZddManager, NodeId) -> NodeId) -> SetSet {
        let core = self.core();
        let root = f(&mut core.borrow_mut().mgr, self.root);
        self.derived(root)
    }

    // --- Boolean algebra ---------------------------------------------------

    pub fn union(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.union(f, g))
    }

    pub fn intersect(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.intersect(f, g))
    }

    pub fn difference(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.setdiff(f, g))
    }

    pub fn symmetric_difference(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| {
            let a = m.setdiff(f, g);
            let b = m.setdiff(g, f);
            m.union(a, b)
        })
    }

    /// All subsets of the universe that are not members.
    pub fn complement(&self) -> SetSet {
        let core = self.core();
        let mut c = core.borrow_mut();
        let elems = c.elems.clone();
        let p = c.mgr.power_set(&elems);
        let root = c.mgr.setdiff(p, self.root);
        drop(c);
        self.derived(root)
    }

    pub fn union_with(&mut self, other: &SetSet) {
        self.root = self.union(other).root;
    }

    pub fn intersect_with(&mut self, other: &SetSet) {
        self.root = self.intersect(other).root;
    }

    pub fn difference_with(&mut self, other: &SetSet) {
        self.root = self.difference(other).root;
    }

    pub fn symmetric_difference_with(&mut self, other: &SetSet) {
        self.root = self.symmetric_difference(other).root;
    }

    /// The quotient: members `X` with `X ∪ Y ∈ self` and `X ∩ Y = ∅` for
    /// every member `Y` of `other`, which must not be empty.
    pub fn quotient(&self, other: &SetSet) -> Result<SetSet> {
        if other.is_empty() {
            if self.is_terminal() {
                return Ok(self.unop(|m, _| m.zero()));
            }
            return Err(Error::InvalidArgument(
                "quotient by the empty family".to_string(),
            ));
        }
        Ok(self.binop(other, |m, f, g| m.divide(f, g)))
    }

    /// The remainder `self − (self / other) · other`.
    pub fn remainder(&self, other: &SetSet) -> Result<SetSet> {
        if other.is_empty() {
            if self.is_terminal() {
                return Ok(self.clone());
            }
            return Err(Error::InvalidArgument(
                "remainder by the empty family".to_string(),
            ));
        }
        Ok(self.binop(other, |m, f, g| m.remainder(f, g)))
    }

    fn is_terminal(&self) -> bool {
        let core = self.core();
        let c = core.borrow();
        self.root == c.mgr.zero() || self.root == c.mgr.one()
    }

    // --- Structural filters ------------------------------------------------

    /// Members that are a subset of some member of `other`.
    pub fn subsets(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.permit(f, g))
    }

    /// Members that are a superset of some member of `other`.
    pub fn supersets(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.restrict(f, g))
    }

    /// Members containing element `e`.
    pub fn supersets_of_elem(&self, e: ElemId) -> Result<SetSet> {
        let core = self.core();
        let mut c = core.borrow_mut();
        let h = *c
            .elems
            .get(e.wrapping_sub(1))
            .ok_or_else(|| Error::InvalidArgument(format!("element {} out of range", e)))?;
        let s = c.mgr.single(h);
        let q = c.mgr.divide(self.root, s);
        let root = c.mgr.product(q, s);
        drop(c);
        Ok(self.derived(root))
    }

    pub fn non_subsets(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.non_subsets(f, g))
    }

    pub fn non_supersets(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.non_supersets(f, g))
    }

    /// Members not containing element `e`.
    pub fn non_supersets_of_elem(&self, e: ElemId) -> Result<SetSet> {
        let core = self.core();
        let mut c = core.borrow_mut();
        let h = *c
            .elems
            .get(e.wrapping_sub(1))
            .ok_or_else(|| Error::InvalidArgument(format!("element {} out of range", e)))?;
        let s = c.mgr.single(h);
        let root = c.mgr.remainder(self.root, s);
        drop(c);
        Ok(self.derived(root))
    }

    pub fn minimal(&self) -> SetSet {
        self.unop(|m, f| m.minimal(f))
    }

    pub fn maximal(&self) -> SetSet {
        self.unop(|m, f| m.maximal(f))
    }

    /// The family of minimal sets hitting every member.
    pub fn hitting(&self) -> SetSet {
        self.unop(|m, f| m.hitting(f))
    }

    /// Members with fewer than `k` elements.
    pub fn smaller(&self, k: usize) -> SetSet {
        if k == 0 {
            return self.unop(|m, _| m.zero());
        }
        self.unop(|m, f| m.permit_sym(f, k - 1))
    }

    /// Members with more than `k` elements.
    pub fn larger(&self, k: usize) -> SetSet {
        self.unop(|m, f| {
            let le = m.permit_sym(f, k);
            m.setdiff(f, le)
        })
    }

    /// Members with exactly `k` elements.
    pub fn set_size(&self, k: usize) -> SetSet {
        self.unop(|m, f| {
            let le = m.permit_sym(f, k);
            if k == 0 {
                le
            } else {
                let lt = m.permit_sym(f, k - 1);
                m.setdiff(le, lt)
            }
        })
    }

    /// `{A ∪ B : A ∈ self, B ∈ other}`.
    pub fn join(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.product(f, g))
    }

    /// `{A ∩ B : A ∈ self, B ∈ other}`.
    pub fn meet(&self, other: &SetSet) -> SetSet {
        self.binop(other, |m, f, g| m.meet(f, g))
    }

    // --- Predicates and size ----------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.root == self.core().borrow().mgr.zero()
    }

    pub fn is_disjoint(&self, other: &SetSet) -> bool {
        self.intersect(other).is_empty()
    }

    pub fn is_subset(&self, other: &SetSet) -> bool {
        self.difference(other).is_empty()
    }

    pub fn is_superset(&self, other: &SetSet) -> bool {
        other.is_subset(self)
    }

    fn count_big(&self) -> BigUint {
        let core = self.core();
        let c = core.borrow();
        let mut cache = DdHashMap::default();
        zdd_count::algo_c(&c.mgr, self.root, &mut cache)
    }

    /// The number of members as a `u64`; families of 2^63 members or more
    /// only report their size through `size`.
    pub fn len(&self) -> Result<u64> {
        self.count_big()
            .to_u64()
            .filter(|&x| x < 1u64 << 63)
            .ok_or(Error::Overflow)
    }

    /// The exact number of members in decimal.
    pub fn size(&self) -> String {
        self.count_big().to_string()
    }

    /// Whether `s` is a member.
    pub fn contains(&self, s: &BTreeSet<ElemId>) -> Result<bool> {
        let universe = Universe {
            core: self.core(),
        };
        let z = universe.set_root(s)?;
        let core = self.core();
        let mut c = core.borrow_mut();
        let both = c.mgr.intersect(self.root, z);
        Ok(both == z)
    }

    /// Whether some member contains element `e`.
    pub fn contains_elem(&self, e: ElemId) -> Result<bool> {
        let core = self.core();
        let mut c = core.borrow_mut();
        let h = *c
            .elems
            .get(e.wrapping_sub(1))
            .ok_or_else(|| Error::InvalidArgument(format!("element {} out of range", e)))?;
        let on = c.mgr.onset0(self.root, h);
        Ok(on != c.mgr.zero())
    }

    // --- Mutation ----------------------------------------------------------

    pub fn add(&mut self, s: &BTreeSet<ElemId>) -> Result<()> {
        let universe = Universe { core: self.core() };
        let z = universe.set_root(s)?;
        let core = self.core();
        self.root = core.borrow_mut().mgr.union(self.root, z);
        Ok(())
    }

    /// Removes `s`; it must be a member.
    pub fn remove(&mut self, s: &BTreeSet<ElemId>) -> Result<()> {
        if !self.contains(s)? {
            return Err(Error::NotFound);
        }
        self.discard(s).map(|_| ())
    }

    /// Removes `s` if present; reports whether it was.
    pub fn discard(&mut self, s: &BTreeSet<ElemId>) -> Result<bool> {
        let was = self.contains(s)?;
        let universe = Universe { core: self.core() };
        let z = universe.set_root(s)?;
        let core = self.core();
        self.root = core.borrow_mut().mgr.setdiff(self.root, z);
        Ok(was)
    }

    /// An arbitrary member, deterministically the first in iteration order.
    pub fn choice(&self) -> Result<BTreeSet<ElemId>> {
        self.iter().next().ok_or(Error::EmptyChoice)
    }

    /// Removes and returns an arbitrary member.
    pub fn pop(&mut self) -> Result<BTreeSet<ElemId>> {
        let s = self.choice()?;
        self.discard(&s)?;
        Ok(s)
    }

    /// Adds element `e` to every member.
    pub fn add_elem(&mut self, e: ElemId) -> Result<()> {
        let core = self.core();
        let mut c = core.borrow_mut();
        let h = *c
            .elems
            .get(e.wrapping_sub(1))
            .ok_or_else(|| Error::InvalidArgument(format!("element {} out of range", e)))?;
        let s = c.mgr.single(h);
        self.root = c.mgr.product(self.root, s);
        Ok(())
    }

    /// Removes element `e` from every member.
    pub fn remove_elem(&mut self, e: ElemId) -> Result<()> {
        let core = self.core();
        let mut c = core.borrow_mut();
        if e == 0 || e > c.elems.len() {
            return Err(Error::InvalidArgument(format!(
                "element {} out of range",
                e
            )));
        }
        let zero = c.mgr.zero();
        let mut rest = c.mgr.one();
        for i in 1..=c.elems.len() {
            if i == e {
                continue;
            }
            let h = c.elems[i - 1];
            rest = c.mgr.create_node(h, zero, rest);
        }
        self.root = c.mgr.meet(self.root, rest);
        Ok(())
    }

    /// Toggles element `e` in every member.
    pub fn flip_elem(&mut self, e: ElemId) -> Result<()> {
        let core = self.core();
        let mut c = core.borrow_mut();
        let h = *c
            .elems
            .get(e.wrapping_sub(1))
            .ok_or_else(|| Error::InvalidArgument(format!("element {} out of range", e)))?;
        self.root = c.mgr.change(self.root, h);
        Ok(())
    }

    /// Toggles every element of the universe in every member.
    pub fn flip_all(&mut self) {
        let core = self.core();
        let mut c = core.borrow_mut();
        for i in 0..c.elems.len() {
            let h = c.elems[i];
            self.root = c.mgr.change(self.root, h);
        }
    }

    pub fn clear(&mut self) {
        self.root = self.core().borrow().mgr.zero();
    }

    // --- Evaluation ---------------------------------------------------------

    /// The probability that a random subset, drawn with independent
    /// per-element probabilities, is a member.
    pub fn probability(&self, p: &[f64]) -> Result<f64> {
        let n = self.num_elems();
        if p.len() != n {
            return Err(Error::InvalidArgument(format!(
                "expected {} probabilities, got {}",
                n,
                p.len()
            )));
        }
        if p.iter().any(|&x| !(0.0..=1.0).contains(&x)) {
            return Err(Error::InvalidArgument(
                "probabilities must lie in [0, 1]".to_string(),
            ));
        }
        let core = self.core();
        let c = core.borrow();
        Ok(zdd_count::probability(&c.mgr, self.root, p, n))
    }

    // --- Iteration ----------------------------------------------------------

    /// Deterministic iteration over the members.
    pub fn iter(&self) -> SetSetIter {
        SetSetIter::new(self.core(), self.root)
    }

    /// Uniform random member draws; below 10^17 members every drawn member
    /// is removed from the iterator's snapshot, above that sampling is with
    /// replacement.
    pub fn rand_iter(&self) -> RandomIter {
        RandomIter::new(self.core(), self.root)
    }

    /// Members in non-increasing weight order.
    pub fn max_iter(&self, weights: &[f64]) -> Result<WeightedIter> {
        self.weighted(weights, true)
    }

    /// Members in non-decreasing weight order.
    pub fn min_iter(&self, weights: &[f64]) -> Result<WeightedIter> {
        self.weighted(weights, false)
    }

    fn weighted(&self, weights: &[f64], maximize: bool) -> Result<WeightedIter> {
        let n = self.num_elems();
        if weights.len() != n {
            return Err(Error::InvalidArgument(format!(
                "expected {} weights, got {}",
                n,
                weights.len()
            )));
        }
        Ok(WeightedIter::new(self.core(), self.root, weights, maximize))
    }

    // --- Serialization ------------------------------------------------------

    pub fn dump<W: Write>(&self, io: &mut W) -> Result<()> {
        let core = self.core();
        let c = core.borrow();
        zdd_io::dump(&c.mgr, self.root, io)?;
        Ok(())
    }

    /// Writes the family in a human-readable nested-braces form.
    pub fn enumerate<W: Write>(
        &self,
        io: &mut W,
        outer: (&str, &str),
        inner: (&str, &str),
    ) -> Result<()> {
        write!(io, "{}", outer.0)?;
        for (i, s) in self.iter().enumerate() {
            if i > 0 {
                write!(io, ",")?;
            }
            let elems: Vec<String> = s.iter().map(|e| e.to_string()).collect();
            write!(io, "{}{}{}", inner.0, elems.join(","), inner.1)?;
        }
        write!(io, "{}", outer.1)?;
        Ok(())
    }

    pub fn enumerate_string(&self, outer: (&str, &str), inner: (&str, &str)) -> String {
        let mut buf = vec![];
        self.enumerate(&mut buf, outer, inner)
            .expect("writing to a buffer cannot fail");
        String::from_utf8(buf).expect("enumeration is ASCII")
    }

    // --- Diagnostics --------------------------------------------------------

    /// Number of ZDD nodes backing the family, terminals included.
    pub fn node_count(&self) -> usize {
        self.core().borrow().mgr.count(self.root)
    }

    pub fn dot(&self) -> String {
        self.core().borrow().mgr.dot_string(self.root)
    }
}
