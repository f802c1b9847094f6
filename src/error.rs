use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerrikError {
    /// Too few joints for the requested operation. Building needs one, solving needs two.
    #[error("chain has {joints} joint(s), which is too few for this operation")]
    InvalidChain { joints: usize },

    #[error("solve tolerance must be a finite value greater than zero, got {0}")]
    InvalidTolerance(f32),

    #[error("the iteration budget must allow at least one iteration")]
    InvalidIterationBudget,

    #[error("chain has {expected} joints but {got} sources were given")]
    SourceCountMismatch { expected: usize, got: usize },

    #[error("joint {index} does not exist, the chain has {len} joints")]
    JointOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, FerrikError>;
