//! Error types for expression composition and evaluation.

use thiserror::Error;

/// Errors produced while composing or evaluating matrix expressions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExprError {
    /// Operand dimensions disagreed at composition time.
    #[error("dimension mismatch: left operand is {left}x{left}, right operand is {right}x{right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A cell index fell outside `[0, size)`.
    #[error("index ({row}, {col}) out of range for {size}x{size} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        size: usize,
    },

    /// Matrix products are structural only and cannot be evaluated.
    #[error("matrix product evaluation is not implemented")]
    NotImplemented,
}
