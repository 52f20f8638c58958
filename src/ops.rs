//! `+` and `*` overloads for composing expressions.
//!
//! The operators delegate to the checked constructors on [`MatrixExpr`]
//! and panic on dimension mismatch, since the `std::ops` traits cannot
//! surface a `Result`. Use [`MatrixExpr::sum`] / [`MatrixExpr::product`]
//! directly to handle the error instead.

use std::ops::{Add, Mul};

use crate::expr::MatrixExpr;

impl Add for MatrixExpr {
    type Output = MatrixExpr;

    fn add(self, rhs: MatrixExpr) -> MatrixExpr {
        match MatrixExpr::sum(self, rhs) {
            Ok(expr) => expr,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Add<&MatrixExpr> for MatrixExpr {
    type Output = MatrixExpr;

    fn add(self, rhs: &MatrixExpr) -> MatrixExpr {
        self + rhs.clone()
    }
}

impl Add<MatrixExpr> for &MatrixExpr {
    type Output = MatrixExpr;

    fn add(self, rhs: MatrixExpr) -> MatrixExpr {
        self.clone() + rhs
    }
}

impl Add for &MatrixExpr {
    type Output = MatrixExpr;

    fn add(self, rhs: &MatrixExpr) -> MatrixExpr {
        self.clone() + rhs.clone()
    }
}

impl Mul for MatrixExpr {
    type Output = MatrixExpr;

    fn mul(self, rhs: MatrixExpr) -> MatrixExpr {
        match MatrixExpr::product(self, rhs) {
            Ok(expr) => expr,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul<&MatrixExpr> for MatrixExpr {
    type Output = MatrixExpr;

    fn mul(self, rhs: &MatrixExpr) -> MatrixExpr {
        self * rhs.clone()
    }
}

impl Mul<MatrixExpr> for &MatrixExpr {
    type Output = MatrixExpr;

    fn mul(self, rhs: MatrixExpr) -> MatrixExpr {
        self.clone() * rhs
    }
}

impl Mul for &MatrixExpr {
    type Output = MatrixExpr;

    fn mul(self, rhs: &MatrixExpr) -> MatrixExpr {
        self.clone() * rhs.clone()
    }
}
