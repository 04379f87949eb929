//! Linear models for regression.
//!
//! A closed set of variants over one shared fitting contract
//! ([`crate::traits::Estimator`]):
//!
//! - [`LinearRegression`]: ordinary least squares, closed form by default
//!   with pluggable iterative solvers ([`Solver`])
//! - [`Ridge`]: L2-penalized least squares, closed form
//! - [`Lasso`]: L1-penalized least squares, coordinate descent
//! - [`SgdRegressor`]: online least squares via per-sample gradient steps
//! - [`MultiOutputRegressor`]: one estimator per target column
//!
//! Every variant supports the `normalize` option: features are
//! standardized before solving and the coefficients are mapped back to
//! the original space, so `predict` always consumes raw features and the
//! two settings agree up to solver tolerance.

mod base;
mod lasso;
mod multioutput;
mod ridge;
mod sgd;

pub use lasso::Lasso;
pub use multioutput::MultiOutputRegressor;
pub use ridge::Ridge;
pub use sgd::SgdRegressor;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::r_squared;
use crate::optim::{ConjugateGradient, GradientDescent, Lbfgs, Optimizer};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Solver strategy for [`LinearRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Solver {
    /// Normal equations via Cholesky. Fast and exact, but fails with
    /// `SingularMatrix` on collinear features.
    #[default]
    Normal,
    /// Steepest descent on the mean squared error. Slowest, never fails
    /// on rank-deficient systems.
    GradientDescent,
    /// Nonlinear conjugate gradient (Polak-Ribiere).
    ConjugateGradient,
    /// Limited-memory BFGS.
    Lbfgs,
}

impl std::str::FromStr for Solver {
    type Err = crate::error::ModelError;

    /// Parses a solver name; anything unrecognized fails fast instead of
    /// silently defaulting.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Self::Normal),
            "gradient_descent" => Ok(Self::GradientDescent),
            "conjugate_gradient" => Ok(Self::ConjugateGradient),
            "lbfgs" => Ok(Self::Lbfgs),
            other => Err(crate::error::ModelError::invalid_hyperparameter(
                "solver",
                other,
                "one of \"normal\", \"gradient_descent\", \"conjugate_gradient\", \"lbfgs\"",
            )),
        }
    }
}

/// Ordinary least squares linear regression.
///
/// Minimizes the residual sum of squares `||y - X w - b||^2`. The default
/// solver is the closed-form normal equations; the iterative solvers
/// minimize the same objective through the `optim` layer and converge to
/// the same coefficients up to their tolerance.
///
/// # Examples
///
/// ```
/// use regresar::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// assert!((model.coefficients()[0] - 2.0).abs() < 1e-4);
/// assert!((model.intercept() - 1.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegression {
    solver: Solver,
    normalize: bool,
    verbose: bool,
    compute_score: bool,
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Training R², populated when `compute_score` is set.
    train_score: Option<f32>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with the closed-form solver and
    /// normalization off.
    #[must_use]
    pub fn new() -> Self {
        Self {
            solver: Solver::Normal,
            normalize: false,
            verbose: false,
            compute_score: false,
            coefficients: None,
            intercept: 0.0,
            train_score: None,
        }
    }

    /// Selects the solver strategy.
    #[must_use]
    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    /// Standardize features before solving, mapping coefficients back to
    /// the original space afterwards.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Print solver diagnostics to stderr during fit. Has no effect on
    /// the fitted coefficients.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Compute the training R² during fit, available from
    /// [`train_score`](Self::train_score) afterwards. Has no effect on
    /// the fitted coefficients.
    #[must_use]
    pub fn with_compute_score(mut self, compute_score: bool) -> Self {
        self.compute_score = compute_score;
        self
    }

    /// Returns the coefficients (excluding intercept).
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f32> {
        self.coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Returns the training R² if `compute_score` was set on the last fit.
    #[must_use]
    pub fn train_score(&self) -> Option<f32> {
        self.train_score
    }
}

/// Solves the augmented least-squares system by the normal equations.
fn solve_normal_equations(design: &Matrix<f32>, y: &Vector<f32>) -> Result<Vector<f32>> {
    let xt = design.transpose();
    let xtx = xt.matmul(design)?;
    let xty = xt.matvec(y)?;
    xtx.cholesky_solve(&xty)
}

/// Minimizes the mean squared error of the augmented system with the
/// selected iterative strategy. The gradient is `(2/n) X^T (X b - y)`.
fn solve_iterative(
    design: &Matrix<f32>,
    y: &Vector<f32>,
    solver: Solver,
    verbose: bool,
) -> Vector<f32> {
    let n = design.n_rows() as f32;
    let n_params = design.n_cols();
    let xt = design.transpose();

    let objective = |beta: &Vector<f32>| {
        let residual = design
            .matvec(beta)
            .expect("design and parameter shapes are consistent")
            .sub(y);
        residual.dot(&residual) / n
    };
    let gradient = |beta: &Vector<f32>| {
        let residual = design
            .matvec(beta)
            .expect("design and parameter shapes are consistent")
            .sub(y);
        xt.matvec(&residual)
            .expect("transposed design and residual shapes are consistent")
            .scale(2.0 / n)
    };

    let x0 = Vector::zeros(n_params);
    let result = match solver {
        Solver::GradientDescent => GradientDescent::new(2000, 1e-4).minimize(objective, gradient, x0),
        Solver::ConjugateGradient => ConjugateGradient::new(1000, 1e-5).minimize(objective, gradient, x0),
        Solver::Lbfgs => Lbfgs::new(500, 1e-5, 10).minimize(objective, gradient, x0),
        Solver::Normal => unreachable!("closed form is not an iterative solver"),
    };

    if verbose {
        eprintln!(
            "LinearRegression[{solver:?}]: {:?} after {} iterations, objective {:.4e}, grad norm {:.3e}",
            result.status, result.iterations, result.objective_value, result.gradient_norm
        );
    }

    // Best effort: a MaxIterations solution is still usable.
    result.solution
}

impl Estimator for LinearRegression {
    /// Fits the model. With the `Normal` solver this solves
    /// `beta = (X^T X)^-1 X^T y` via Cholesky; iterative solvers minimize
    /// the same objective through the optimizer layer.
    ///
    /// # Errors
    ///
    /// Returns an error on shape mismatch, or `SingularMatrix` when the
    /// closed form meets collinear features (iterative solvers degrade
    /// gracefully instead).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        base::validate_fit(x, y)?;

        let n_features = x.n_cols();
        let (x_work, scaler) = base::maybe_normalize(x, self.normalize)?;
        let design = base::add_intercept_column(&x_work);

        let beta = match self.solver {
            Solver::Normal => solve_normal_equations(&design, y)?,
            _ => solve_iterative(&design, y, self.solver, self.verbose),
        };

        let mut intercept = beta[0];
        let mut coef = beta.slice(1, n_features + 1);
        if let Some(scaler) = &scaler {
            (coef, intercept) = base::denormalize_coefficients(&coef, intercept, scaler);
        }

        self.coefficients = Some(coef);
        self.intercept = intercept;
        self.train_score = if self.compute_score {
            let y_pred = self.predict(x)?;
            Some(r_squared(&y_pred, y))
        } else {
            None
        };

        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        base::affine_predict(
            x,
            self.coefficients.as_ref(),
            self.intercept,
            "LinearRegression",
        )
    }
}
