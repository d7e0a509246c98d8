use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("universe holds {universe} elements but the graph has {edges} edges")]
    UniverseMismatch { universe: usize, edges: usize },

    #[error("kernel exhausted: {0}")]
    KernelExhausted(String),

    #[error("choice from an empty family")]
    EmptyChoice,

    #[error("set is not a member of the family")]
    NotFound,

    #[error("family cardinality does not fit in 64 bits")]
    Overflow,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
