use thiserror::Error;

use crate::controller::Mode;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("a dataset needs at least one point")]
    EmptyDataset,
    #[error("point #{index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },
    #[error("b must be finite, got {0}")]
    NonFiniteB(f64),
    #[error("invalid animation parameters: {0}")]
    InvalidAnimation(&'static str),
    #[error("an animation is already in progress")]
    AnimationInProgress,
    #[error("cannot do that while {0}")]
    Busy(Mode),
    #[error("unknown difficulty {0:?}, expected easy, medium or hard")]
    UnknownDifficulty(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
