pub mod builder;
pub mod digraph;
pub mod error;
pub mod frontier;
pub mod graphset;
pub mod range;
pub mod setset;
pub mod setset_iter;
pub mod spec;
pub mod spec_cycle;
pub mod spec_degree;
pub mod spec_forest;
pub mod spec_path;

pub mod prelude {
    pub use crate::digraph::{Digraph, VertexNumber};
    pub use crate::error::{Error, Result};
    pub use crate::frontier::FrontierManager;
    pub use crate::graphset::{
        directed_cycles, directed_graphs, directed_hamiltonian_cycles, directed_st_path,
        rooted_forests, rooted_trees, show_messages,
    };
    pub use crate::range::Range;
    pub use crate::setset::{SetSet, Universe, ELEM_LIMIT};
    pub use crate::setset_iter::{RandomIter, SetSetIter, WeightedIter};
    pub use crate::spec::{FrontierSpec, Step};
}
