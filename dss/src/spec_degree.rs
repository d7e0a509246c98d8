use common::prelude::*;

use crate::digraph::{Digraph, VertexNumber};
use crate::frontier::FrontierManager;
use crate::range::Range;
use crate::spec::{fresh_slots, FrontierSpec, Slots, Step, VertexData};

/// Edge subsets in which every vertex keeps its in- and out-degree inside a
/// per-vertex range. Unconstrained vertices default to `[0, m]`.
pub struct DegreeSpec<'a> {
    graph: &'a Digraph,
    fm: FrontierManager,
    m: usize,
    in_ranges: Vec<Range>,
    out_ranges: Vec<Range>,
}

impl<'a> DegreeSpec<'a> {
    pub fn new(graph: &'a Digraph) -> Self {
        let m = graph.edge_size();
        let n = graph.vertex_size();
        let full = Range::full(m as i32);
        Self {
            graph,
            fm: FrontierManager::new(graph),
            m,
            in_ranges: vec![full.clone(); n],
            out_ranges: vec![full; n],
        }
    }

    pub fn set_in_constraint(&mut self, v: VertexNumber, r: Range) {
        self.in_ranges[v as usize - 1] = r;
    }

    pub fn set_out_constraint(&mut self, v: VertexNumber, r: Range) {
        self.out_ranges[v as usize - 1] = r;
    }
}

impl FrontierSpec for DegreeSpec<'_> {
    type State = Slots;

    fn root(&self) -> (Slots, Level) {
        (fresh_slots(self.fm.max_frontier_size()), self.m)
    }

    fn child(&self, state: &mut Slots, level: Level, take: bool) -> Step {
        let e = self.m - level;
        let (u, v) = self.graph.edge(e);
        for &x in self.fm.entering(e) {
            state[self.fm.pos(x)] = VertexData {
                indeg: 0,
                outdeg: 0,
                comp: 0,
            };
        }
        if take {
            // a degree above its upper bound can never recover; anything
            // below the lower bound still can
            let pu = self.fm.pos(u);
            let d = state[pu].outdeg + 1;
            if d as i32 > self.out_ranges[u as usize - 1].upper_bound() {
                return Step::Dead;
            }
            state[pu].outdeg = d;
            let pv = self.fm.pos(v);
            let d = state[pv].indeg + 1;
            if d as i32 > self.in_ranges[v as usize - 1].upper_bound() {
                return Step::Dead;
            }
            state[pv].indeg = d;
        }
        for &x in self.fm.leaving(e) {
            let s = state[self.fm.pos(x)];
            if !self.in_ranges[x as usize - 1].contains(s.indeg as i32)
                || !self.out_ranges[x as usize - 1].contains(s.outdeg as i32)
            {
                return Step::Dead;
            }
            state[self.fm.pos(x)] = VertexData::FREE;
        }
        if level == 1 {
            Step::Accept
        } else {
            Step::Down(level - 1)
        }
    }
}
