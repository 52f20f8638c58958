//! lazymat: lazy matrix expression trees with a shape-driven rewriter.
//!
//! Expressions over named square matrices are built as binary trees:
//! [`LeafMatrix`] leaves hold dense storage, [`MatrixExpr::Sum`] and
//! [`MatrixExpr::Product`] nodes are lazy views composed in O(1). A
//! [`TreeOptimizer`] then restructures a tree through a fixed, ordered
//! rule set into a value-equivalent shape, and [`LeafMatrix::from_expr`]
//! or [`LeafMatrix::assign_from`] collapse a tree into concrete data.
//!
//! # Example
//!
//! ```
//! use lazymat::prelude::*;
//!
//! let a = MatrixExpr::leaf(LeafMatrix::random("a", 3));
//! let b = MatrixExpr::leaf(LeafMatrix::random("b", 3));
//! let c = MatrixExpr::leaf(LeafMatrix::random("c", 3));
//! let d = MatrixExpr::leaf(LeafMatrix::random("d", 3));
//!
//! // Composition is lazy: no elementwise work happens here.
//! let xpr = &a + &b * &c + &d + &c;
//! assert_eq!(xpr.name(), "(c + (d + ((c * b) + a)))");
//!
//! // Rewriting isolates the product and regroups the plain addends.
//! let optimized = TreeOptimizer::new().optimize(&xpr);
//! assert_eq!(optimized.name(), "((c * b) + (c + (d + a)))");
//! ```

pub mod error;
pub mod expr;
pub mod leaf;
pub mod ops;
pub mod optimizer;

pub use error::ExprError;
pub use expr::MatrixExpr;
pub use leaf::{LeafMatrix, Scalar};
pub use optimizer::{DEFAULT_MAX_PASSES, TreeOptimizer};

/// Prelude module with the commonly used types.
pub mod prelude {
    pub use crate::error::ExprError;
    pub use crate::expr::MatrixExpr;
    pub use crate::leaf::{LeafMatrix, Scalar};
    pub use crate::optimizer::TreeOptimizer;
}
