//! Limited-memory BFGS optimizer.

use crate::primitives::Vector;

use super::line_search::{LineSearch, WolfeLineSearch};
use super::{ConvergenceStatus, OptimizationResult, Optimizer};

/// Limited-memory BFGS, a quasi-Newton method that approximates the
/// inverse Hessian from a short history of position and gradient
/// differences.
///
/// Each iteration computes the search direction with the classic two-loop
/// recursion over the stored `(s_k, y_k)` pairs, then takes a Wolfe
/// line-search step. Pairs violating the curvature condition
/// `y_k . s_k > 0` are skipped so the approximation stays positive
/// definite.
#[derive(Debug, Clone)]
pub struct Lbfgs {
    max_iter: usize,
    tol: f32,
    /// History size (number of correction pairs)
    m: usize,
    line_search: WolfeLineSearch,
    s_history: Vec<Vector<f32>>,
    y_history: Vec<Vector<f32>>,
}

impl Lbfgs {
    /// Creates a new L-BFGS optimizer.
    ///
    /// # Arguments
    ///
    /// * `max_iter` - Iteration budget (typical: 100-1000)
    /// * `tol` - Convergence tolerance on the gradient norm (typical: 1e-5)
    /// * `m` - History size (typical: 5-20)
    #[must_use]
    pub fn new(max_iter: usize, tol: f32, m: usize) -> Self {
        Self {
            max_iter,
            tol,
            m,
            line_search: WolfeLineSearch::default(),
            s_history: Vec::with_capacity(m),
            y_history: Vec::with_capacity(m),
        }
    }

    /// Two-loop recursion approximating `-H^-1 grad`.
    fn direction(&self, grad: &Vector<f32>) -> Vector<f32> {
        let k = self.s_history.len();
        if k == 0 {
            return grad.scale(-1.0);
        }

        let n = grad.len();
        let mut q = grad.scale(-1.0);
        let mut alpha = vec![0.0f32; k];
        let mut rho = vec![0.0f32; k];

        for i in (0..k).rev() {
            let s = &self.s_history[i];
            let y = &self.y_history[i];
            rho[i] = 1.0 / y.dot(s);
            alpha[i] = rho[i] * s.dot(&q);
            for j in 0..n {
                q[j] -= alpha[i] * y[j];
            }
        }

        // Initial scaling H_0 = (s.y / y.y) I from the newest pair.
        let s_last = &self.s_history[k - 1];
        let y_last = &self.y_history[k - 1];
        let gamma = s_last.dot(y_last) / y_last.dot(y_last);

        let mut r = q.scale(gamma);
        for i in 0..k {
            let s = &self.s_history[i];
            let y = &self.y_history[i];
            let beta = rho[i] * y.dot(&r);
            for j in 0..n {
                r[j] += s[j] * (alpha[i] - beta);
            }
        }

        r
    }
}

impl Optimizer for Lbfgs {
    fn step(&mut self, _params: &mut Vector<f32>, _gradients: &Vector<f32>) {
        unimplemented!("Lbfgs is a batch strategy; use minimize()")
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

            let d = self.direction(&grad);
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
            let grad_new = gradient(&x_new);

            if !fx_new.is_finite() {
                return OptimizationResult {
                    solution: x,
                    objective_value: fx,
                    iterations: iter,
                    status: ConvergenceStatus::NumericalError,
                    gradient_norm: grad_norm,
                };
            }

            let s_k = x_new.sub(&x);
            let y_k = grad_new.sub(&grad);

            if y_k.dot(&s_k) > 1e-10 {
                if self.s_history.len() >= self.m {
                    self.s_history.remove(0);
                    self.y_history.remove(0);
                }
                self.s_history.push(s_k);
                self.y_history.push(y_k);
            }

            x = x_new;
            fx = fx_new;
            grad = grad_new;
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
        self.s_history.clear();
        self.y_history.clear();
    }
}
