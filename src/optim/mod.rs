//! Optimization strategies for the fitting layer.
//!
//! Two modes share the [`Optimizer`] trait:
//!
//! - **Batch** (`minimize`): full-dataset minimization of a differentiable
//!   objective given its gradient. Strategies: [`GradientDescent`],
//!   [`ConjugateGradient`], [`Lbfgs`].
//! - **Stochastic** (`step`): incremental per-sample/mini-batch parameter
//!   updates. Strategy: [`Sgd`].
//!
//! Batch strategies that run out of iterations return their best-effort
//! solution with [`ConvergenceStatus::MaxIterations`]; non-convergence is
//! never an error.
//!
//! # Example
//!
//! ```
//! use regresar::optim::{ConvergenceStatus, Lbfgs, Optimizer};
//! use regresar::primitives::Vector;
//!
//! let mut optimizer = Lbfgs::new(100, 1e-5, 10);
//!
//! let objective = |x: &Vector<f32>| (x[0] - 5.0).powi(2) + (x[1] - 3.0).powi(2);
//! let gradient = |x: &Vector<f32>| {
//!     Vector::from_slice(&[2.0 * (x[0] - 5.0), 2.0 * (x[1] - 3.0)])
//! };
//!
//! let result = optimizer.minimize(&objective, &gradient, Vector::zeros(2));
//! assert_eq!(result.status, ConvergenceStatus::Converged);
//! assert!((result.solution[0] - 5.0).abs() < 1e-3);
//! ```

use crate::primitives::Vector;

mod conjugate_gradient;
mod gradient_descent;
mod lbfgs;
mod line_search;
mod stochastic;

pub use conjugate_gradient::ConjugateGradient;
pub use gradient_descent::GradientDescent;
pub use lbfgs::Lbfgs;
pub use line_search::{BacktrackingLineSearch, LineSearch, WolfeLineSearch};
pub use stochastic::Sgd;

/// Result of a batch optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final solution (optimized parameters)
    pub solution: Vector<f32>,
    /// Final objective function value
    pub objective_value: f32,
    /// Number of iterations performed
    pub iterations: usize,
    /// Convergence status
    pub status: ConvergenceStatus,
    /// Final gradient norm
    pub gradient_norm: f32,
}

/// Convergence status of a batch optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// Gradient norm fell below tolerance
    Converged,
    /// Reached the iteration budget; solution is best-effort
    MaxIterations,
    /// Line search could not make progress
    Stalled,
    /// Objective became NaN or infinite
    NumericalError,
}

/// Unified trait for batch and stochastic optimizers.
///
/// Batch strategies implement `minimize` and panic on `step`; stochastic
/// strategies implement `step` and panic on `minimize`. The fitting layer
/// only ever calls the mode a strategy supports.
pub trait Optimizer {
    /// Stochastic update: adjust `params` in place given the current
    /// gradient estimate.
    fn step(&mut self, params: &mut Vector<f32>, gradients: &Vector<f32>);

    /// Batch minimization of `objective` starting from `x0`.
    fn minimize<F, G>(&mut self, _objective: F, _gradient: G, _x0: Vector<f32>) -> OptimizationResult
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>,
    {
        panic!(
            "{} does not support batch optimization; use step()",
            std::any::type_name::<Self>()
        )
    }

    /// Resets internal state (momentum, curvature history).
    fn reset(&mut self);
}

/// Proximal operators for non-smooth penalties.
pub mod prox {
    /// Soft-thresholding operator, the proximal map of `lambda * |x|`.
    ///
    /// ```text
    /// soft(v, lambda) = sign(v) * max(|v| - lambda, 0)
    /// ```
    ///
    /// This is the coordinate update kernel of the Lasso solver.
    ///
    /// # Example
    ///
    /// ```
    /// use regresar::optim::prox::soft_threshold;
    ///
    /// assert!((soft_threshold(2.0, 1.0) - 1.0).abs() < 1e-6);
    /// assert!((soft_threshold(-1.5, 1.0) + 0.5).abs() < 1e-6);
    /// assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    /// ```
    #[must_use]
    pub fn soft_threshold(v: f32, lambda: f32) -> f32 {
        if v > lambda {
            v - lambda
        } else if v < -lambda {
            v + lambda
        } else {
            0.0
        }
    }
}
