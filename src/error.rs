use thiserror::Error;

use crate::shape::ShapeKind;

/// Errors raised when constructing a shape that violates its kind's
/// point-count contract.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("{kind:?} needs at least {need} point(s), got {got}")]
    NotEnoughPoints {
        kind: ShapeKind,
        got: usize,
        need: usize,
    },
}

/// Errors raised while importing or exporting the shape document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}
