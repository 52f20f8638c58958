//! Lazy matrix expression trees.
//!
//! An expression is a finite binary tree with [`LeafMatrix`] at every leaf
//! position. Composing expressions does no elementwise work; values are
//! only computed when a cell is read through [`MatrixExpr::value_at`] or
//! the whole tree is materialized with [`LeafMatrix::from_expr`].

use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::error::ExprError;
use crate::leaf::{LeafMatrix, Scalar};

/// A lazily evaluated matrix expression.
///
/// Children are stored in construction order (left operand first). Leaf
/// slots hold an `Rc` share of the one persistent leaf, so a leaf used in
/// several places backs them all with identical storage. Composite slots
/// are owned: `Clone` deep-copies `Sum`/`Product` structure while leaf
/// storage stays shared.
#[derive(Debug, Clone)]
pub enum MatrixExpr {
    /// A named leaf matrix, shared wherever it appears.
    Leaf(Rc<LeafMatrix>),
    /// Elementwise sum of two subexpressions.
    Sum(Box<MatrixExpr>, Box<MatrixExpr>),
    /// Matrix product of two subexpressions. Structural only: building one
    /// is fine, evaluating it is not implemented.
    Product(Box<MatrixExpr>, Box<MatrixExpr>),
}

impl MatrixExpr {
    /// Wraps a leaf matrix as an expression.
    pub fn leaf(matrix: LeafMatrix) -> Self {
        Self::Leaf(Rc::new(matrix))
    }

    /// Composes the elementwise sum of two expressions in O(1) elementwise
    /// work. Fails with [`ExprError::DimensionMismatch`] when the operand
    /// sizes differ.
    pub fn sum(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        let (lhs, rhs) = (lhs.into(), rhs.into());
        check_sizes(&lhs, &rhs)?;
        trace!("compose sum of {} and {}", lhs.name(), rhs.name());
        Ok(Self::Sum(Box::new(lhs), Box::new(rhs)))
    }

    /// Composes the matrix product of two expressions in O(1) elementwise
    /// work. Fails with [`ExprError::DimensionMismatch`] when the operand
    /// sizes differ.
    pub fn product(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        let (lhs, rhs) = (lhs.into(), rhs.into());
        check_sizes(&lhs, &rhs)?;
        trace!("compose product of {} and {}", lhs.name(), rhs.name());
        Ok(Self::Product(Box::new(lhs), Box::new(rhs)))
    }

    /// The square dimension of the expression's value.
    pub fn size(&self) -> usize {
        match self {
            Self::Leaf(m) => m.size(),
            // Right-hand child; the checked constructors guarantee the
            // left one agrees.
            Self::Sum(_, rhs) | Self::Product(_, rhs) => rhs.size(),
        }
    }

    /// Evaluates the cell at `(row, col)`.
    ///
    /// Sums evaluate elementwise through their children; products refuse
    /// with [`ExprError::NotImplemented`] rather than produce a value.
    pub fn value_at(&self, row: usize, col: usize) -> Result<Scalar, ExprError> {
        let size = self.size();
        if row >= size || col >= size {
            return Err(ExprError::IndexOutOfRange { row, col, size });
        }
        match self {
            Self::Leaf(m) => m.get(row, col),
            Self::Sum(lhs, rhs) => Ok(lhs.value_at(row, col)? + rhs.value_at(row, col)?),
            Self::Product(_, _) => Err(ExprError::NotImplemented),
        }
    }

    /// Deterministic textual rendering of the tree's shape.
    ///
    /// A leaf renders its name. Composites render their operands swapped
    /// relative to construction order: `sum(a, b)` is `"(b + a)"` and
    /// `product(a, b)` is `"(b * a)"`. The swap is part of the observable
    /// contract.
    pub fn name(&self) -> String {
        match self {
            Self::Leaf(m) => m.name().to_string(),
            Self::Sum(lhs, rhs) => format!("({} + {})", rhs.name(), lhs.name()),
            Self::Product(lhs, rhs) => format!("({} * {})", rhs.name(), lhs.name()),
        }
    }

    /// The shared leaf behind this node, if it is one.
    pub fn as_leaf(&self) -> Option<&Rc<LeafMatrix>> {
        match self {
            Self::Leaf(m) => Some(m),
            _ => None,
        }
    }
}

fn check_sizes(lhs: &MatrixExpr, rhs: &MatrixExpr) -> Result<(), ExprError> {
    if lhs.size() != rhs.size() {
        return Err(ExprError::DimensionMismatch {
            left: lhs.size(),
            right: rhs.size(),
        });
    }
    Ok(())
}

impl From<LeafMatrix> for MatrixExpr {
    fn from(matrix: LeafMatrix) -> Self {
        Self::leaf(matrix)
    }
}

impl From<Rc<LeafMatrix>> for MatrixExpr {
    fn from(matrix: Rc<LeafMatrix>) -> Self {
        Self::Leaf(matrix)
    }
}

impl fmt::Display for MatrixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leaf(name: &str, n: usize) -> MatrixExpr {
        MatrixExpr::leaf(LeafMatrix::zeros(name, n))
    }

    #[rstest]
    #[case(MatrixExpr::sum, "(b + a)")]
    #[case(MatrixExpr::product, "(b * a)")]
    fn composites_render_operands_swapped(
        #[case] compose: fn(MatrixExpr, MatrixExpr) -> Result<MatrixExpr, ExprError>,
        #[case] expected: &str,
    ) {
        let expr = compose(leaf("a", 2), leaf("b", 2)).unwrap();
        assert_eq!(expr.name(), expected);
        assert_eq!(expr.to_string(), expected);
    }

    #[test]
    fn nested_composition_renders_recursively() {
        let p = MatrixExpr::product(leaf("b", 2), leaf("c", 2)).unwrap();
        let s = MatrixExpr::sum(leaf("a", 2), p).unwrap();
        assert_eq!(s.name(), "((c * b) + a)");
    }

    #[test]
    fn sum_evaluates_elementwise() {
        let a = MatrixExpr::leaf(LeafMatrix::full("a", 2, 3.0));
        let b = MatrixExpr::leaf(LeafMatrix::full("b", 2, 4.0));
        let s = MatrixExpr::sum(a, b).unwrap();
        assert_eq!(s.size(), 2);
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(s.value_at(i, j).unwrap(), 7.0);
            }
        }
    }

    #[test]
    fn product_refuses_evaluation() {
        let p = MatrixExpr::product(leaf("a", 2), leaf("b", 2)).unwrap();
        assert_eq!(p.value_at(0, 0), Err(ExprError::NotImplemented));
    }

    #[test]
    fn value_at_rejects_out_of_range_indices() {
        let s = MatrixExpr::sum(leaf("a", 2), leaf("b", 2)).unwrap();
        assert_eq!(
            s.value_at(2, 0),
            Err(ExprError::IndexOutOfRange {
                row: 2,
                col: 0,
                size: 2
            })
        );
    }

    #[rstest]
    #[case(MatrixExpr::sum)]
    #[case(MatrixExpr::product)]
    fn composition_rejects_mismatched_dimensions(
        #[case] compose: fn(MatrixExpr, MatrixExpr) -> Result<MatrixExpr, ExprError>,
    ) {
        let err = compose(leaf("a", 3), leaf("b", 4)).unwrap_err();
        assert_eq!(err, ExprError::DimensionMismatch { left: 3, right: 4 });
    }

    #[test]
    fn clone_shares_leaves_and_copies_structure() {
        let a = Rc::new(LeafMatrix::zeros("a", 2));
        let s = MatrixExpr::sum(a.clone(), a.clone()).unwrap();
        // The leaf itself is shared, not copied, when a tree is cloned.
        let before = Rc::strong_count(&a);
        let copy = s.clone();
        assert_eq!(Rc::strong_count(&a), before + 2);
        drop(copy);
        assert_eq!(Rc::strong_count(&a), before);
    }
}
