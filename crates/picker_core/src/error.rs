use shared::domain::Mode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    #[error("the {mode} needs at least {required} item(s) to draw, it holds {available}")]
    InsufficientItems {
        mode: Mode,
        required: usize,
        available: usize,
    },
    #[error("no item at position {index}, the collection holds {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("a draw is already in progress")]
    DrawInProgress,
    #[error("no draw is in progress")]
    NotDrawing,
    #[error("a result is waiting to be kept or removed")]
    ResultPending,
    #[error("no result is showing")]
    NoResult,
}
