pub mod nodes;

pub mod zdd;
pub mod zdd_count;
pub mod zdd_dot;
pub mod zdd_family;
pub mod zdd_io;
pub mod zdd_ops;

pub mod prelude {
    pub use common::prelude::*;

    pub use crate::nodes::*;
    pub use crate::zdd::ZddManager;
    pub use crate::zdd_count::{algo_b, algo_c, probability};
    pub use crate::zdd_io::{dump, load};
    pub use crate::zdd_ops::ZddOperation;
}
