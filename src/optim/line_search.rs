//! Line search strategies for batch optimizers.
//!
//! Given a descent direction, a line search picks a step size with a
//! guaranteed decrease of the objective.

use crate::primitives::Vector;

/// Trait for line search strategies.
///
/// Given objective `f`, gradient `grad`, current point `x` and search
/// direction `d` (with `grad(x) . d < 0`), returns a step size alpha > 0.
pub trait LineSearch {
    /// Finds a step size along `d` satisfying the strategy's conditions.
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f32>, d: &Vector<f32>) -> f32
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>;
}

fn step_along(x: &Vector<f32>, d: &Vector<f32>, alpha: f32) -> Vector<f32> {
    let mut x_new = Vector::zeros(x.len());
    for i in 0..x.len() {
        x_new[i] = x[i] + alpha * d[i];
    }
    x_new
}

/// Backtracking line search with the Armijo sufficient-decrease condition.
///
/// Starts at alpha = 1 and shrinks by `rho` until
/// `f(x + alpha d) <= f(x) + c1 * alpha * grad(x) . d`.
#[derive(Debug, Clone)]
pub struct BacktrackingLineSearch {
    /// Armijo constant, c1 in (0, 1)
    c1: f32,
    /// Shrink factor, rho in (0, 1)
    rho: f32,
    /// Maximum backtracking iterations
    max_iter: usize,
}

impl BacktrackingLineSearch {
    /// Creates a backtracking line search.
    #[must_use]
    pub fn new(c1: f32, rho: f32, max_iter: usize) -> Self {
        Self { c1, rho, max_iter }
    }
}

impl Default for BacktrackingLineSearch {
    fn default() -> Self {
        Self::new(1e-4, 0.5, 50)
    }
}

impl LineSearch for BacktrackingLineSearch {
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f32>, d: &Vector<f32>) -> f32
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>,
    {
        let fx = f(x);
        let dir_deriv = grad(x).dot(d);

        let mut alpha = 1.0;
        for _ in 0..self.max_iter {
            if f(&step_along(x, d, alpha)) <= fx + self.c1 * alpha * dir_deriv {
                return alpha;
            }
            alpha *= self.rho;
        }
        alpha
    }
}

/// Wolfe line search: Armijo plus the curvature condition.
///
/// ```text
/// Armijo:    f(x + a d) <= f(x) + c1 a grad(x).d
/// Curvature: |grad(x + a d).d| <= c2 |grad(x).d|
/// ```
///
/// The curvature condition keeps steps from being too small, which the
/// quasi-Newton update needs for a well-scaled curvature history.
#[derive(Debug, Clone)]
pub struct WolfeLineSearch {
    /// Armijo constant, 0 < c1 < c2
    c1: f32,
    /// Curvature constant, c1 < c2 < 1
    c2: f32,
    /// Maximum bisection iterations
    max_iter: usize,
}

impl WolfeLineSearch {
    /// Creates a Wolfe line search.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < c1 < c2 < 1`.
    #[must_use]
    pub fn new(c1: f32, c2: f32, max_iter: usize) -> Self {
        assert!(
            c1 > 0.0 && c1 < c2 && c2 < 1.0,
            "Wolfe conditions require 0 < c1 < c2 < 1"
        );
        Self { c1, c2, max_iter }
    }
}

impl Default for WolfeLineSearch {
    fn default() -> Self {
        Self::new(1e-4, 0.9, 50)
    }
}

impl LineSearch for WolfeLineSearch {
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f32>, d: &Vector<f32>) -> f32
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>,
    {
        let fx = f(x);
        let dir_deriv = grad(x).dot(d);

        let mut alpha = 1.0;
        let mut alpha_lo = 0.0;
        let mut alpha_hi = f32::INFINITY;

        for _ in 0..self.max_iter {
            let x_new = step_along(x, d, alpha);
            let fx_new = f(&x_new);
            let dir_deriv_new = grad(&x_new).dot(d);

            if fx_new > fx + self.c1 * alpha * dir_deriv {
                // Step too long for sufficient decrease.
                alpha_hi = alpha;
                alpha = (alpha_lo + alpha_hi) / 2.0;
                continue;
            }

            if dir_deriv_new.abs() <= self.c2 * dir_deriv.abs() {
                return alpha;
            }

            if dir_deriv_new > 0.0 {
                alpha_hi = alpha;
            } else {
                alpha_lo = alpha;
            }

            if alpha_hi.is_finite() {
                alpha = (alpha_lo + alpha_hi) / 2.0;
            } else {
                alpha *= 2.0;
            }
        }

        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtracking_finds_decrease() {
        let ls = BacktrackingLineSearch::default();
        let f = |x: &Vector<f32>| x[0] * x[0] + x[1] * x[1];
        let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * x[0], 2.0 * x[1]]);

        let x = Vector::from_slice(&[1.0, 1.0]);
        let d = Vector::from_slice(&[-2.0, -2.0]);

        let alpha = ls.search(&f, &grad, &x, &d);
        assert!(alpha > 0.0);
        assert!(f(&step_along(&x, &d, alpha)) < f(&x));
    }

    #[test]
    fn test_wolfe_finds_decrease() {
        let ls = WolfeLineSearch::default();
        let f = |x: &Vector<f32>| x[0] * x[0];
        let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * x[0]]);

        let x = Vector::from_slice(&[5.0]);
        let d = Vector::from_slice(&[-10.0]);

        let alpha = ls.search(&f, &grad, &x, &d);
        assert!(alpha > 0.0);
        assert!(f(&step_along(&x, &d, alpha)) < f(&x));
    }

    #[test]
    #[should_panic(expected = "Wolfe conditions")]
    fn test_wolfe_rejects_bad_constants() {
        let _ = WolfeLineSearch::new(0.9, 0.1, 50);
    }
}
