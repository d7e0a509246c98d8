use std::hash::Hash;

use common::prelude::Level;

use crate::digraph::VertexNumber;

/// Outcome of one transition of a frontier constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The branch cannot lead to a valid edge set.
    Dead,
    /// The edge set decided so far, with every remaining edge rejected, is
    /// valid.
    Accept,
    /// Continue to the next level with the mutated state.
    Down(Level),
}

/// A frontier constraint: a pure transition system the builder folds over
/// the edge levels, from the edge count `m` down to 1. Equal states at the
/// same level are merged by the builder, so the state must be a value with
/// canonical equality.
pub trait FrontierSpec {
    type State: Clone + Eq + Hash;

    /// The root state and the initial level (the edge count).
    fn root(&self) -> (Self::State, Level);

    /// Advances `state` over the decision at `level`; `take` selects the
    /// edge on the high branch.
    fn child(&self, state: &mut Self::State, level: Level, take: bool) -> Step;
}

/// Per-vertex bookkeeping carried while the vertex is on the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexData {
    pub indeg: i16,
    pub outdeg: i16,
    pub comp: u16,
}

impl VertexData {
    /// Marker for a slot whose vertex is not on the frontier.
    pub const FREE: VertexData = VertexData {
        indeg: -1,
        outdeg: -1,
        comp: 0,
    };

    /// Initial data for a vertex entering the frontier; the component label
    /// starts as the vertex number itself.
    pub fn enter(v: VertexNumber) -> Self {
        VertexData {
            indeg: 0,
            outdeg: 0,
            comp: v,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.indeg < 0
    }

    #[inline]
    pub fn degree(&self) -> i16 {
        self.indeg + self.outdeg
    }
}

/// The fixed-size state block shared by the graph constraints.
pub type Slots = Box<[VertexData]>;

pub fn fresh_slots(n: usize) -> Slots {
    vec![VertexData::FREE; n].into_boxed_slice()
}
