use common::prelude::*;

use crate::digraph::{Digraph, VertexNumber};
use crate::frontier::FrontierManager;
use crate::spec::{fresh_slots, FrontierSpec, Slots, Step, VertexData};

/// Edge subsets forming a forest of arborescences: in-degree at most 1 and
/// no directed cycle. With a root set, roots take no in-edge and every
/// touched tree must grow out of a root; the acyclic in-degree discipline
/// gives each component exactly one source, so checking the source suffices.
/// With an empty root set the sources are unconstrained. `is_spanning`
/// additionally requires every non-root vertex to be touched.
pub struct ForestSpec<'a> {
    graph: &'a Digraph,
    fm: FrontierManager,
    m: usize,
    is_root: Vec<bool>,
    has_roots: bool,
    spanning: bool,
}

impl<'a> ForestSpec<'a> {
    pub fn new(graph: &'a Digraph, roots: &[VertexNumber], spanning: bool) -> Self {
        let mut is_root = vec![false; graph.vertex_size() + 1];
        for &r in roots {
            is_root[r as usize] = true;
        }
        Self {
            graph,
            fm: FrontierManager::new(graph),
            m: graph.edge_size(),
            is_root,
            has_roots: !roots.is_empty(),
            spanning,
        }
    }
}

impl FrontierSpec for ForestSpec<'_> {
    type State = Slots;

    fn root(&self) -> (Slots, Level) {
        (fresh_slots(self.fm.max_frontier_size()), self.m)
    }

    fn child(&self, state: &mut Slots, level: Level, take: bool) -> Step {
        let e = self.m - level;
        let (u, v) = self.graph.edge(e);
        for &x in self.fm.entering(e) {
            state[self.fm.pos(x)] = VertexData::enter(x);
        }
        if take {
            if self.has_roots && self.is_root[v as usize] {
                return Step::Dead;
            }
            let pv = self.fm.pos(v);
            if state[pv].indeg + 1 > 1 {
                return Step::Dead;
            }
            state[pv].indeg += 1;
            let pu = self.fm.pos(u);
            state[pu].outdeg += 1;

            let cu = state[pu].comp;
            let cv = state[pv].comp;
            if cu == cv {
                return Step::Dead;
            }
            let cmin = cu.min(cv);
            let cmax = cu.max(cv);
            for &w in self.fm.active(e) {
                let s = &mut state[self.fm.pos(w)];
                if !s.is_free() && s.comp == cmin {
                    s.comp = cmax;
                }
            }
        }
        for &x in self.fm.leaving(e) {
            let px = self.fm.pos(x);
            let s = state[px];
            let root = self.is_root[x as usize];
            if self.has_roots && !root && s.indeg == 0 && s.outdeg > 0 {
                // a touched tree growing out of a non-root source
                return Step::Dead;
            }
            if self.spanning && !root && s.degree() == 0 {
                return Step::Dead;
            }
            state[px] = VertexData::FREE;
        }
        if level == 1 {
            Step::Accept
        } else {
            Step::Down(level - 1)
        }
    }
}

/// The forest constraint specialized to a single root: with one admissible
/// source there is at most one tree.
pub struct TreeSpec<'a>(ForestSpec<'a>);

impl<'a> TreeSpec<'a> {
    pub fn new(graph: &'a Digraph, root: VertexNumber, spanning: bool) -> Self {
        Self(ForestSpec::new(graph, &[root], spanning))
    }
}

impl FrontierSpec for TreeSpec<'_> {
    type State = Slots;

    fn root(&self) -> (Slots, Level) {
        self.0.root()
    }

    fn child(&self, state: &mut Slots, level: Level, take: bool) -> Step {
        self.0.child(state, level, take)
    }
}
