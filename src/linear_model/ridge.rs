//! Ridge regression (L2-penalized least squares).

use serde::{Deserialize, Serialize};

use super::base;
use crate::error::{ModelError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Ridge regression with L2 regularization.
///
/// Minimizes `||y - X w - b||^2 + alpha * ||w||^2`. The intercept is
/// never penalized. `alpha = 0` degenerates to ordinary least squares.
///
/// # Examples
///
/// ```
/// use regresar::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = Ridge::new(0.1);
/// model.fit(&x, &y).unwrap();
/// assert!(model.score(&x, &y).unwrap() > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ridge {
    /// Regularization strength. Larger values shrink coefficients more.
    alpha: f32,
    normalize: bool,
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
}

impl Ridge {
    /// Creates a new `Ridge` with the given regularization strength.
    ///
    /// `alpha` must be non-negative; the value is validated at fit time,
    /// before any computation.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            normalize: false,
            coefficients: None,
            intercept: 0.0,
        }
    }

    /// Standardize features before solving.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Returns the regularization strength.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
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
}

impl Estimator for Ridge {
    /// Fits by the regularized normal equations
    /// `beta = (X^T X + alpha I)^-1 X^T y`, with the bias row of the
    /// penalty left at zero so the intercept is never shrunk.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` for a negative alpha (before any
    /// computation), `DimensionMismatch` on shape disagreement, or
    /// `SingularMatrix` if the penalized system is still rank-deficient
    /// (possible only with `alpha = 0`).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if self.alpha < 0.0 {
            return Err(ModelError::invalid_hyperparameter(
                "alpha",
                self.alpha,
                ">= 0",
            ));
        }
        base::validate_fit(x, y)?;

        let n_features = x.n_cols();
        let (x_work, scaler) = base::maybe_normalize(x, self.normalize)?;
        let design = base::add_intercept_column(&x_work);

        let xt = design.transpose();
        let mut xtx = xt.matmul(&design)?;

        // X^T X + alpha I, skipping the intercept entry at (0, 0).
        for i in 1..=n_features {
            xtx.set(i, i, xtx.get(i, i) + self.alpha);
        }

        let xty = xt.matvec(y)?;
        let beta = xtx.cholesky_solve(&xty)?;

        let mut intercept = beta[0];
        let mut coef = beta.slice(1, n_features + 1);
        if let Some(scaler) = &scaler {
            (coef, intercept) = base::denormalize_coefficients(&coef, intercept, scaler);
        }

        self.coefficients = Some(coef);
        self.intercept = intercept;

        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        base::affine_predict(x, self.coefficients.as_ref(), self.intercept, "Ridge")
    }
}
