//! Named dense square matrices, the only expression nodes that hold values.

use std::cell::RefCell;
use std::fmt;

use log::debug;
use rand::Rng;

use crate::error::ExprError;
use crate::expr::MatrixExpr;

/// Scalar type stored in every matrix cell.
pub type Scalar = f64;

/// A named `n`×`n` matrix with dense row-major storage.
///
/// `LeafMatrix` is the only node kind that materializes values; every other
/// expression node is a lazy view over leaves. Storage sits behind a
/// `RefCell` so a leaf that has been shared into expression trees (via
/// `Rc`) can still be overwritten in place with [`assign_from`].
///
/// [`assign_from`]: LeafMatrix::assign_from
#[derive(Debug)]
pub struct LeafMatrix {
    name: String,
    size: usize,
    data: RefCell<Vec<Scalar>>,
}

impl LeafMatrix {
    fn with_data(name: impl Into<String>, size: usize, data: Vec<Scalar>) -> Self {
        let name = name.into();
        debug!("create matrix {name} ({size}x{size})");
        Self {
            name,
            size,
            data: RefCell::new(data),
        }
    }

    /// Creates an `n`×`n` matrix filled with pseudo-random values in
    /// `[0, 100)`.
    pub fn random(name: impl Into<String>, n: usize) -> Self {
        Self::random_with(name, n, &mut rand::thread_rng())
    }

    /// Creates an `n`×`n` matrix filled with values in `[0, 100)` drawn
    /// from the given generator. Useful for reproducible content from a
    /// seeded `StdRng`.
    pub fn random_with(name: impl Into<String>, n: usize, rng: &mut impl Rng) -> Self {
        let data = (0..n * n).map(|_| rng.gen_range(0.0..100.0)).collect();
        Self::with_data(name, n, data)
    }

    /// Creates an `n`×`n` matrix of zeros.
    pub fn zeros(name: impl Into<String>, n: usize) -> Self {
        Self::full(name, n, 0.0)
    }

    /// Creates an `n`×`n` matrix of ones.
    pub fn ones(name: impl Into<String>, n: usize) -> Self {
        Self::full(name, n, 1.0)
    }

    /// Creates an `n`×`n` matrix with every cell set to `value`.
    pub fn full(name: impl Into<String>, n: usize, value: Scalar) -> Self {
        Self::with_data(name, n, vec![value; n * n])
    }

    /// Creates an `n`×`n` matrix with each cell computed from its row and
    /// column index.
    pub fn from_fn(
        name: impl Into<String>,
        n: usize,
        mut f: impl FnMut(usize, usize) -> Scalar,
    ) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self::with_data(name, n, data)
    }

    /// Materializes an expression into a new leaf, evaluating `value_at`
    /// for every cell. This is the only place laziness collapses into
    /// concrete data. The new leaf takes the expression's rendered name.
    ///
    /// Fails if any cell of the expression cannot be evaluated, e.g. when
    /// the tree contains a product.
    pub fn from_expr(expr: &MatrixExpr) -> Result<Self, ExprError> {
        let n = expr.size();
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(expr.value_at(i, j)?);
            }
        }
        Ok(Self::with_data(expr.name(), n, data))
    }

    /// Overwrites this matrix's storage with the elementwise value of
    /// `expr`, keeping the matrix's name and identity. Every tree sharing
    /// this leaf observes the new values.
    ///
    /// The expression is evaluated into a scratch buffer before any cell
    /// is written, so this leaf may itself appear inside `expr`.
    pub fn assign_from(&self, expr: &MatrixExpr) -> Result<(), ExprError> {
        if expr.size() != self.size {
            return Err(ExprError::DimensionMismatch {
                left: self.size,
                right: expr.size(),
            });
        }
        let mut scratch = Vec::with_capacity(self.size * self.size);
        for i in 0..self.size {
            for j in 0..self.size {
                scratch.push(expr.value_at(i, j)?);
            }
        }
        *self.data.borrow_mut() = scratch;
        Ok(())
    }

    /// The matrix's name, as given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The square dimension `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reads the cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Scalar, ExprError> {
        if row >= self.size || col >= self.size {
            return Err(ExprError::IndexOutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        Ok(self.data.borrow()[row * self.size + col])
    }
}

impl fmt::Display for LeafMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        for i in 0..self.size {
            for j in 0..self.size {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", data[i * self.size + j])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::MatrixExpr;

    #[test]
    fn generators_fill_expected_values() {
        let z = LeafMatrix::zeros("z", 2);
        let o = LeafMatrix::ones("o", 2);
        let f = LeafMatrix::full("f", 2, 7.5);
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(z.get(i, j).unwrap(), 0.0);
                assert_eq!(o.get(i, j).unwrap(), 1.0);
                assert_eq!(f.get(i, j).unwrap(), 7.5);
            }
        }
    }

    #[test]
    fn from_fn_indexes_row_major() {
        let m = LeafMatrix::from_fn("m", 3, |i, j| (i * 10 + j) as Scalar);
        assert_eq!(m.get(0, 0).unwrap(), 0.0);
        assert_eq!(m.get(1, 2).unwrap(), 12.0);
        assert_eq!(m.get(2, 1).unwrap(), 21.0);
    }

    #[test]
    fn random_values_stay_in_range() {
        let m = LeafMatrix::random("m", 4);
        for i in 0..4 {
            for j in 0..4 {
                let v = m.get(i, j).unwrap();
                assert!((0.0..100.0).contains(&v), "cell ({i}, {j}) = {v}");
            }
        }
    }

    #[test]
    fn get_rejects_out_of_range_indices() {
        let m = LeafMatrix::zeros("m", 2);
        assert_eq!(
            m.get(2, 0),
            Err(ExprError::IndexOutOfRange {
                row: 2,
                col: 0,
                size: 2
            })
        );
        assert_eq!(
            m.get(0, 5),
            Err(ExprError::IndexOutOfRange {
                row: 0,
                col: 5,
                size: 2
            })
        );
    }

    #[test]
    fn from_expr_materializes_and_names_the_result() {
        let a = MatrixExpr::leaf(LeafMatrix::full("a", 2, 1.0));
        let b = MatrixExpr::leaf(LeafMatrix::full("b", 2, 2.0));
        let m = LeafMatrix::from_expr(&MatrixExpr::sum(a, b).unwrap()).unwrap();
        assert_eq!(m.name(), "(b + a)");
        assert_eq!(m.get(1, 1).unwrap(), 3.0);
    }

    #[test]
    fn assign_from_keeps_name_and_allows_self_on_the_right() {
        let d = std::rc::Rc::new(LeafMatrix::full("d", 2, 5.0));
        let d_expr = MatrixExpr::from(d.clone());
        let one = MatrixExpr::leaf(LeafMatrix::ones("one", 2));

        // d = d + 1, elementwise.
        d.assign_from(&MatrixExpr::sum(d_expr, one).unwrap()).unwrap();
        assert_eq!(d.name(), "d");
        assert_eq!(d.get(0, 0).unwrap(), 6.0);
        assert_eq!(d.get(1, 1).unwrap(), 6.0);
    }

    #[test]
    fn assign_from_rejects_size_mismatch() {
        let d = LeafMatrix::zeros("d", 3);
        let e = MatrixExpr::leaf(LeafMatrix::zeros("e", 4));
        assert_eq!(
            d.assign_from(&e),
            Err(ExprError::DimensionMismatch { left: 3, right: 4 })
        );
    }

    #[test]
    fn display_renders_rows() {
        let m = LeafMatrix::from_fn("m", 2, |i, j| (i * 2 + j) as Scalar);
        assert_eq!(m.to_string(), "0 1\n2 3\n");
    }
}
