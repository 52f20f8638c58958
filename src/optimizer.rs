//! Shape-driven rewriting of expression trees.
//!
//! A rewrite pass is a total function from tree shape to tree shape. At
//! each node the rules below are tried most-specific-first, and the first
//! match decides both the rebuilt shape and which children the pass
//! recurses into:
//!
//! 1. **Nested reassociation**: `Sum(Sum(c, Product(a, b)), d)` becomes
//!    `Sum(Sum(c', d'), Product(a, b))`, grouping the plain addends on one
//!    side and isolating the product on the other. Only `c` and `d` are
//!    recursed into; the product's operands pass through untouched.
//! 2. **Product deferral**: `Sum(Product(a, b), c)` becomes
//!    `Sum(c', Product(a, b))`: the product moves to the far side of the
//!    sum as an atomic unit, only `c` is recursed into.
//! 3. **Sum congruence**: any other `Sum(a, b)` becomes `Sum(a', b')`
//!    with both children rewritten.
//! 4. **Fallback**: a leaf is returned as a reference share; any other
//!    shape is returned as an independent structural copy.
//!
//! Matching is on nominal shape only, never on leaf values, and happens
//! once per pass rather than per cell. The input tree is never mutated,
//! and for every in-range cell whose value is defined, the rewritten tree
//! evaluates to the same value as the input.
//!
//! One pass is not a fixpoint in general: a rewritten shape can match a
//! different rule on the next pass. [`TreeOptimizer::optimize`] therefore
//! repeats passes, bounded by [`TreeOptimizer::max_passes`], comparing
//! rendered shapes between passes to stop early.

use log::{debug, trace};

use crate::expr::MatrixExpr;

/// Default bound on repeated rewrite passes.
pub const DEFAULT_MAX_PASSES: usize = 5;

/// Rewrites expression trees by shape.
#[derive(Debug, Clone)]
pub struct TreeOptimizer {
    max_passes: usize,
}

impl Default for TreeOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeOptimizer {
    /// Creates an optimizer with the default pass bound.
    pub fn new() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Creates an optimizer bounded to at most `max_passes` passes.
    pub fn with_max_passes(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// The bound on repeated passes.
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Applies a single rewrite pass, leaving the input untouched.
    pub fn pass(&self, expr: &MatrixExpr) -> MatrixExpr {
        rewrite(expr)
    }

    /// Repeatedly applies rewrite passes until the rendered shape stops
    /// changing or the pass bound is hit, returning the final tree.
    pub fn optimize(&self, expr: &MatrixExpr) -> MatrixExpr {
        self.optimize_with_history(expr).0
    }

    /// Like [`optimize`](TreeOptimizer::optimize), but also returns the
    /// rendered shape after each pass.
    pub fn optimize_with_history(&self, expr: &MatrixExpr) -> (MatrixExpr, Vec<String>) {
        let mut current = expr.clone();
        let mut shape = current.name();
        let mut history = Vec::new();
        for pass_no in 1..=self.max_passes {
            let next = rewrite(&current);
            let next_shape = next.name();
            debug!("pass {pass_no}: {shape} => {next_shape}");
            history.push(next_shape.clone());
            let stable = next_shape == shape;
            current = next;
            shape = next_shape;
            if stable {
                break;
            }
        }
        (current, history)
    }
}

/// One rewrite step over a whole tree. See the module docs for the rule
/// set and its priority order.
fn rewrite(expr: &MatrixExpr) -> MatrixExpr {
    match expr {
        MatrixExpr::Sum(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
            // Sum(Sum(c, Product(a, b)), d)
            (MatrixExpr::Sum(c, product), d)
                if matches!(product.as_ref(), MatrixExpr::Product(_, _)) =>
            {
                trace!("nested reassociation at {}", expr.name());
                MatrixExpr::Sum(
                    Box::new(MatrixExpr::Sum(Box::new(rewrite(c)), Box::new(rewrite(d)))),
                    product.clone(),
                )
            }
            // Sum(Product(a, b), c)
            (MatrixExpr::Product(_, _), addend) => {
                trace!("product deferral at {}", expr.name());
                MatrixExpr::Sum(Box::new(rewrite(addend)), lhs.clone())
            }
            _ => MatrixExpr::Sum(Box::new(rewrite(lhs)), Box::new(rewrite(rhs))),
        },
        // A leaf keeps sharing its storage; a product outside the sums
        // above is copied as-is, operands included.
        other => other.clone(),
    }
}
