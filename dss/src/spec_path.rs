use common::prelude::*;

use crate::digraph::{Digraph, VertexNumber};
use crate::frontier::FrontierManager;
use crate::spec::{fresh_slots, FrontierSpec, Slots, Step, VertexData};

/// State of the s-t path constraint: the frontier block plus the component
/// labels carrying `s` and `t` and whether the path has been completed.
/// Component labels are vertex numbers and are never reused, so tracking
/// the two labels across merges is sound even after `s` or `t` has left
/// the frontier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathState {
    slots: Slots,
    s_comp: u16,
    t_comp: u16,
    done: bool,
}

/// Edge subsets forming one directed simple path from `s` to `t`,
/// optionally required to visit every vertex.
pub struct StPathSpec<'a> {
    graph: &'a Digraph,
    fm: FrontierManager,
    m: usize,
    s: VertexNumber,
    t: VertexNumber,
    hamiltonian: bool,
}

impl<'a> StPathSpec<'a> {
    pub fn new(graph: &'a Digraph, s: VertexNumber, t: VertexNumber, hamiltonian: bool) -> Self {
        Self {
            graph,
            fm: FrontierManager::new(graph),
            m: graph.edge_size(),
            s,
            t,
            hamiltonian,
        }
    }
}

impl FrontierSpec for StPathSpec<'_> {
    type State = PathState;

    fn root(&self) -> (PathState, Level) {
        let state = PathState {
            slots: fresh_slots(self.fm.max_frontier_size()),
            s_comp: self.s,
            t_comp: self.t,
            done: false,
        };
        (state, self.m)
    }

    fn child(&self, state: &mut PathState, level: Level, take: bool) -> Step {
        let e = self.m - level;
        let (u, v) = self.graph.edge(e);
        for &x in self.fm.entering(e) {
            state.slots[self.fm.pos(x)] = VertexData::enter(x);
        }
        if take {
            // a completed path admits no further edge
            if state.done {
                return Step::Dead;
            }
            // t emits nothing, s absorbs nothing
            if u == self.t || v == self.s {
                return Step::Dead;
            }
            let pu = self.fm.pos(u);
            if state.slots[pu].outdeg + 1 > 1 {
                return Step::Dead;
            }
            state.slots[pu].outdeg += 1;
            let pv = self.fm.pos(v);
            if state.slots[pv].indeg + 1 > 1 {
                return Step::Dead;
            }
            state.slots[pv].indeg += 1;

            let cu = state.slots[pu].comp;
            let cv = state.slots[pv].comp;
            if cu == cv {
                // any cycle is fatal, the path itself never closes one
                return Step::Dead;
            }
            let cmin = cu.min(cv);
            let cmax = cu.max(cv);
            for &w in self.fm.active(e) {
                let s = &mut state.slots[self.fm.pos(w)];
                if !s.is_free() && s.comp == cmin {
                    s.comp = cmax;
                }
            }
            if state.s_comp == cmin {
                state.s_comp = cmax;
            }
            if state.t_comp == cmin {
                state.t_comp = cmax;
            }
        }
        for &x in self.fm.leaving(e) {
            let px = self.fm.pos(x);
            let s = state.slots[px];
            if x == self.s {
                if s.outdeg != 1 {
                    return Step::Dead;
                }
            } else if x == self.t {
                if s.indeg != 1 {
                    return Step::Dead;
                }
            } else if s.indeg != s.outdeg {
                return Step::Dead;
            } else if s.degree() == 0 && self.hamiltonian {
                return Step::Dead;
            }
            if s.degree() > 0 {
                let mut witness = false;
                for &w in self.fm.active(e) {
                    if w == x {
                        continue;
                    }
                    let t = state.slots[self.fm.pos(w)];
                    if !t.is_free() && t.comp == s.comp {
                        witness = true;
                        break;
                    }
                }
                if !witness {
                    // the component is finished; it must be the s-t path
                    if s.comp == state.s_comp && s.comp == state.t_comp && !state.done {
                        state.done = true;
                    } else {
                        return Step::Dead;
                    }
                }
            }
            state.slots[px] = VertexData::FREE;
        }
        if level == 1 {
            if state.done {
                Step::Accept
            } else {
                Step::Dead
            }
        } else {
            Step::Down(level - 1)
        }
    }
}
