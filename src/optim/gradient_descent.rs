//! Batch gradient descent with backtracking line search.

use crate::primitives::Vector;

use super::line_search::{BacktrackingLineSearch, LineSearch};
use super::{ConvergenceStatus, OptimizationResult, Optimizer};

/// Steepest-descent minimization with an Armijo backtracking line search.
///
/// The slowest of the batch strategies but the most robust baseline:
/// every iteration moves along the negative gradient, so rank-deficient
/// problems merely converge slowly instead of failing.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    max_iter: usize,
    tol: f32,
    line_search: BacktrackingLineSearch,
}

impl GradientDescent {
    /// Creates a new gradient descent optimizer.
    ///
    /// # Arguments
    ///
    /// * `max_iter` - Iteration budget (typical: 1000)
    /// * `tol` - Convergence tolerance on the gradient norm (typical: 1e-4)
    #[must_use]
    pub fn new(max_iter: usize, tol: f32) -> Self {
        Self {
            max_iter,
            tol,
            line_search: BacktrackingLineSearch::default(),
        }
    }
}

impl Optimizer for GradientDescent {
    fn step(&mut self, _params: &mut Vector<f32>, _gradients: &Vector<f32>) {
        unimplemented!("GradientDescent is a batch strategy; use minimize()")
    }

    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f32>) -> OptimizationResult
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>,
    {
        let n = x0.len();
        let mut x = x0;
        let mut fx = objective(&x);
        let mut grad = gradient(&x);
        let mut grad_norm = grad.norm();

        for iter in 0..self.max_iter {
            if grad_norm < self.tol {
                return OptimizationResult {
                    solution: x,
                    objective_value: fx,
                    iterations: iter,
                    status: ConvergenceStatus::Converged,
                    gradient_norm: grad_norm,
                };
            }

            let d = grad.scale(-1.0);
            let alpha = self.line_search.search(&objective, &gradient, &x, &d);

            if alpha < 1e-12 {
                return OptimizationResult {
                    solution: x,
                    objective_value: fx,
                    iterations: iter,
                    status: ConvergenceStatus::Stalled,
                    gradient_norm: grad_norm,
                };
            }

            let mut x_new = Vector::zeros(n);
            for i in 0..n {
                x_new[i] = x[i] + alpha * d[i];
            }
            let fx_new = objective(&x_new);

            if !fx_new.is_finite() {
                return OptimizationResult {
                    solution: x,
                    objective_value: fx,
                    iterations: iter,
                    status: ConvergenceStatus::NumericalError,
                    gradient_norm: grad_norm,
                };
            }

            x = x_new;
            fx = fx_new;
            grad = gradient(&x);
            grad_norm = grad.norm();
        }

        OptimizationResult {
            solution: x,
            objective_value: fx,
            iterations: self.max_iter,
            status: ConvergenceStatus::MaxIterations,
            gradient_norm: grad_norm,
        }
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_converges() {
        let mut optimizer = GradientDescent::new(1000, 1e-5);
        let f = |x: &Vector<f32>| (x[0] - 5.0).powi(2);
        let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * (x[0] - 5.0)]);

        let result = optimizer.minimize(f, grad, Vector::zeros(1));
        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert!((result.solution[0] - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_already_converged_takes_zero_iterations() {
        let mut optimizer = GradientDescent::new(100, 1e-5);
        let f = |x: &Vector<f32>| x[0] * x[0];
        let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * x[0]]);

        let result = optimizer.minimize(f, grad, Vector::zeros(1));
        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_budget_exhaustion_is_best_effort() {
        // One iteration on an ill-conditioned bowl: not converged, but the
        // solution is still returned.
        let mut optimizer = GradientDescent::new(1, 1e-10);
        let f = |x: &Vector<f32>| x[0] * x[0] + 100.0 * x[1] * x[1];
        let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * x[0], 200.0 * x[1]]);

        let result = optimizer.minimize(f, grad, Vector::from_slice(&[1.0, 1.0]));
        assert_eq!(result.status, ConvergenceStatus::MaxIterations);
        assert_eq!(result.solution.len(), 2);
    }

    #[test]
    #[should_panic(expected = "batch strategy")]
    fn test_step_panics() {
        let mut optimizer = GradientDescent::new(10, 1e-5);
        let mut params = Vector::zeros(1);
        let grad = Vector::zeros(1);
        optimizer.step(&mut params, &grad);
    }
}
