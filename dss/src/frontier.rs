use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::digraph::{Digraph, VertexNumber};

/// Precomputed frontier metadata: for every edge index, which vertices
/// enter, which leave, and which are live while the edge is decided, plus a
/// stable slot for each vertex in the fixed-size state block.
#[derive(Debug)]
pub struct FrontierManager {
    entering: Vec<Vec<VertexNumber>>,
    leaving: Vec<Vec<VertexNumber>>,
    active: Vec<Vec<VertexNumber>>,
    pos: Vec<usize>,
    entering_after: Vec<usize>,
    max_frontier_size: usize,
}

impl FrontierManager {
    pub fn new(g: &Digraph) -> Self {
        let m = g.edge_size();
        let n = g.vertex_size();
        let mut first = vec![usize::MAX; n + 1];
        let mut last = vec![0usize; n + 1];
        for i in 0..m {
            let (u, v) = g.edge(i);
            for x in [u, v] {
                let x = x as usize;
                if first[x] == usize::MAX {
                    first[x] = i;
                }
                last[x] = i;
            }
        }

        let mut entering = vec![Vec::new(); m];
        let mut leaving = vec![Vec::new(); m];
        let mut active = vec![Vec::new(); m];
        let mut pos = vec![usize::MAX; n + 1];
        let mut live: Vec<VertexNumber> = Vec::new();
        let mut free: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
        let mut slots = 0usize;
        let mut max_frontier_size = 0usize;
        for i in 0..m {
            let (u, v) = g.edge(i);
            for x in [u, v] {
                if first[x as usize] == i && !entering[i].contains(&x) {
                    entering[i].push(x);
                    live.push(x);
                    let slot = match free.pop() {
                        Some(Reverse(s)) => s,
                        None => {
                            let s = slots;
                            slots += 1;
                            s
                        }
                    };
                    pos[x as usize] = slot;
                }
            }
            max_frontier_size = max_frontier_size.max(live.len());
            active[i] = live.clone();
            for x in [u, v] {
                if last[x as usize] == i && !leaving[i].contains(&x) {
                    leaving[i].push(x);
                    live.retain(|&w| w != x);
                    free.push(Reverse(pos[x as usize]));
                }
            }
        }

        let mut entering_after = vec![0usize; m];
        let mut suffix = 0usize;
        for i in (0..m).rev() {
            entering_after[i] = suffix;
            suffix += entering[i].len();
        }

        Self {
            entering,
            leaving,
            active,
            pos,
            entering_after,
            max_frontier_size,
        }
    }

    /// Vertices whose first occurrence is edge `e`.
    #[inline]
    pub fn entering(&self, e: usize) -> &[VertexNumber] {
        &self.entering[e]
    }

    /// Vertices whose last occurrence is edge `e`.
    #[inline]
    pub fn leaving(&self, e: usize) -> &[VertexNumber] {
        &self.leaving[e]
    }

    /// Vertices live while edge `e` is decided, the frontier joined with
    /// the entering vertices, in a stable order.
    #[inline]
    pub fn active(&self, e: usize) -> &[VertexNumber] {
        &self.active[e]
    }

    /// The state-block slot of vertex `v`, valid from entry to leave.
    #[inline]
    pub fn pos(&self, v: VertexNumber) -> usize {
        self.pos[v as usize]
    }

    /// Number of vertices whose first occurrence is after edge `e`.
    #[inline]
    pub fn entering_after(&self, e: usize) -> usize {
        self.entering_after[e]
    }

    #[inline]
    pub fn max_frontier_size(&self) -> usize {
        self.max_frontier_size
    }
}
