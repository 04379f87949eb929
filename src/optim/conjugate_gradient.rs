//! Nonlinear conjugate gradient optimizer.

use crate::primitives::Vector;

use super::line_search::{LineSearch, WolfeLineSearch};
use super::{ConvergenceStatus, OptimizationResult, Optimizer};

/// Nonlinear conjugate gradient with the Polak-Ribiere beta formula.
///
/// Search directions are made conjugate to previous ones:
///
/// ```text
/// d_{k+1} = -g_{k+1} + beta_{k+1} d_k
/// beta = g_{k+1} . (g_{k+1} - g_k) / (g_k . g_k)
/// ```
///
/// A negative beta triggers an automatic restart with steepest descent,
/// which is what makes Polak-Ribiere robust on non-quadratic objectives.
#[derive(Debug, Clone)]
pub struct ConjugateGradient {
    max_iter: usize,
    tol: f32,
    line_search: WolfeLineSearch,
    prev_direction: Option<Vector<f32>>,
    prev_gradient: Option<Vector<f32>>,
}

impl ConjugateGradient {
    /// Creates a new conjugate gradient optimizer.
    ///
    /// # Arguments
    ///
    /// * `max_iter` - Iteration budget (typical: 100-1000)
    /// * `tol` - Convergence tolerance on the gradient norm (typical: 1e-5)
    #[must_use]
    pub fn new(max_iter: usize, tol: f32) -> Self {
        Self {
            max_iter,
            tol,
            // c2 = 0.1: CG wants a more exact line search than quasi-Newton.
            line_search: WolfeLineSearch::new(1e-4, 0.1, 50),
            prev_direction: None,
            prev_gradient: None,
        }
    }

    fn direction(&self, grad: &Vector<f32>) -> Vector<f32> {
        let steepest = grad.scale(-1.0);

        let (Some(prev_d), Some(prev_g)) =
            (self.prev_direction.as_ref(), self.prev_gradient.as_ref())
        else {
            return steepest;
        };

        let denom = prev_g.dot(prev_g);
        if denom <= 0.0 {
            return steepest;
        }

        // Polak-Ribiere
        let beta = grad.dot(&grad.sub(prev_g)) / denom;
        if beta < 0.0 {
            // Restart with steepest descent.
            return steepest;
        }

        let mut d = Vector::zeros(grad.len());
        for i in 0..grad.len() {
            d[i] = -grad[i] + beta * prev_d[i];
        }
        d
    }
}

impl Optimizer for ConjugateGradient {
    fn step(&mut self, _params: &mut Vector<f32>, _gradients: &Vector<f32>) {
        unimplemented!("ConjugateGradient is a batch strategy; use minimize()")
    }

    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f32>) -> OptimizationResult
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>,
    {
        self.reset();

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

            let mut d = self.direction(&grad);
            // Guard: keep d a descent direction.
            if grad.dot(&d) >= 0.0 {
                d = grad.scale(-1.0);
            }

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

            self.prev_direction = Some(d);
            self.prev_gradient = Some(grad);

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

    fn reset(&mut self) {
        self.prev_direction = None;
        self.prev_gradient = None;
    }
}
