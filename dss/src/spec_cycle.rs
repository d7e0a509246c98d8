use common::prelude::*;

use crate::digraph::Digraph;
use crate::frontier::FrontierManager;
use crate::spec::{fresh_slots, FrontierSpec, Slots, Step, VertexData};

/// Edge subsets forming exactly one directed simple cycle, optionally
/// required to visit every vertex of the graph.
///
/// Each vertex keeps in- and out-degree at most 1, so every partial
/// component is a directed path; the component label is the largest vertex
/// number in it. Taking an edge inside one component closes the only cycle
/// the subset may contain, and the run is accepted on the spot when no
/// foreign component has touched vertices left.
pub struct CycleSpec<'a> {
    graph: &'a Digraph,
    fm: FrontierManager,
    m: usize,
    hamiltonian: bool,
}

impl<'a> CycleSpec<'a> {
    pub fn single(graph: &'a Digraph) -> Self {
        Self {
            graph,
            fm: FrontierManager::new(graph),
            m: graph.edge_size(),
            hamiltonian: false,
        }
    }

    pub fn hamiltonian(graph: &'a Digraph) -> Self {
        Self {
            hamiltonian: true,
            ..Self::single(graph)
        }
    }
}

impl FrontierSpec for CycleSpec<'_> {
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
            let pu = self.fm.pos(u);
            if state[pu].outdeg + 1 > 1 {
                return Step::Dead;
            }
            state[pu].outdeg += 1;
            let pv = self.fm.pos(v);
            if state[pv].indeg + 1 > 1 {
                return Step::Dead;
            }
            state[pv].indeg += 1;

            let cu = state[pu].comp;
            let cv = state[pv].comp;
            if cu == cv {
                // the cycle closes; no other touched component may remain,
                // and a Hamiltonian cycle leaves no vertex outside it
                for &w in self.fm.active(e) {
                    if w == u || w == v {
                        continue;
                    }
                    let s = state[self.fm.pos(w)];
                    if s.is_free() {
                        continue;
                    }
                    if s.degree() == 0 {
                        if self.hamiltonian {
                            return Step::Dead;
                        }
                    } else if s.comp != cu {
                        return Step::Dead;
                    }
                }
                if self.hamiltonian && self.fm.entering_after(e) > 0 {
                    return Step::Dead;
                }
                return Step::Accept;
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
            if s.indeg != s.outdeg {
                return Step::Dead;
            }
            if s.degree() > 0 {
                // the open path through x must stay reachable
                let mut witness = false;
                for &w in self.fm.active(e) {
                    if w == x {
                        continue;
                    }
                    let t = state[self.fm.pos(w)];
                    if !t.is_free() && t.comp == s.comp {
                        witness = true;
                        break;
                    }
                }
                if !witness {
                    return Step::Dead;
                }
            } else if self.hamiltonian {
                return Step::Dead;
            }
            state[px] = VertexData::FREE;
        }
        if level == 1 {
            Step::Dead
        } else {
            Step::Down(level - 1)
        }
    }
}
