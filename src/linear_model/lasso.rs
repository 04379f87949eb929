//! Lasso regression (L1-penalized least squares).

use serde::{Deserialize, Serialize};

use super::base;
use crate::error::{ModelError, Result};
use crate::optim::prox::soft_threshold;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Lasso regression with L1 regularization.
///
/// Minimizes `(1/2n) ||y - X w - b||^2 + alpha * ||w||_1`. The L1 term
/// drives coefficients to exactly zero, so larger `alpha` produces
/// sparser models.
///
/// # Solver
///
/// Cyclic coordinate descent with soft-thresholding on centered data.
/// A sweep updates every coordinate once; the solver stops when the
/// largest absolute coefficient change in a sweep falls below `tol`, or
/// after `max_iter` sweeps (the result is then best-effort). The
/// intercept is recovered from the column means and never penalized.
///
/// # Examples
///
/// ```
/// use regresar::prelude::*;
///
/// let x = Matrix::from_vec(5, 2, vec![
///     1.0, 2.0,
///     2.0, 3.0,
///     3.0, 4.0,
///     4.0, 5.0,
///     5.0, 6.0,
/// ]).unwrap();
/// let y = Vector::from_slice(&[5.0, 8.0, 11.0, 14.0, 17.0]);
///
/// let mut model = Lasso::new(0.1);
/// model.fit(&x, &y).unwrap();
/// assert!(model.score(&x, &y).unwrap() > 0.9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lasso {
    /// Regularization strength.
    alpha: f32,
    normalize: bool,
    /// Maximum number of coordinate descent sweeps.
    max_iter: usize,
    /// Convergence tolerance on the per-sweep coefficient change.
    tol: f32,
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
}

impl Lasso {
    /// Creates a new `Lasso` with the given regularization strength.
    ///
    /// Defaults: 1000 sweeps maximum, tolerance 1e-4. `alpha` must be
    /// non-negative; validated at fit time before any computation.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            normalize: false,
            max_iter: 1000,
            tol: 1e-4,
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

    /// Sets the maximum number of coordinate descent sweeps.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
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

impl Estimator for Lasso {
    /// Fits by cyclic coordinate descent with soft-thresholding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` for a negative alpha and
    /// `DimensionMismatch` on shape disagreement.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if self.alpha < 0.0 {
            return Err(ModelError::invalid_hyperparameter(
                "alpha",
                self.alpha,
                ">= 0",
            ));
        }
        base::validate_fit(x, y)?;

        let (n_samples, n_features) = x.shape();
        let n = n_samples as f32;
        let (x_work, scaler) = base::maybe_normalize(x, self.normalize)?;

        // Work on centered data; the intercept is recovered afterwards
        // and so never enters the penalty.
        let mut x_means = vec![0.0f32; n_features];
        let mut columns: Vec<Vec<f32>> = Vec::with_capacity(n_features);
        for (j, mean_j) in x_means.iter_mut().enumerate() {
            let mut column: Vec<f32> = (0..n_samples).map(|i| x_work.get(i, j)).collect();
            *mean_j = column.iter().sum::<f32>() / n;
            for value in &mut column {
                *value -= *mean_j;
            }
            columns.push(column);
        }
        let y_mean = y.mean();

        // Per-column second moments; a zero means a constant column whose
        // coefficient stays at zero.
        let moments: Vec<f32> = columns
            .iter()
            .map(|column| column.iter().map(|v| v * v).sum::<f32>() / n)
            .collect();

        let mut coef = vec![0.0f32; n_features];
        let mut residual: Vec<f32> = (0..n_samples).map(|i| y[i] - y_mean).collect();

        for _sweep in 0..self.max_iter {
            let mut max_delta = 0.0f32;

            for j in 0..n_features {
                if moments[j] == 0.0 {
                    continue;
                }

                let column = &columns[j];
                let old = coef[j];

                let mut correlation = 0.0;
                for i in 0..n_samples {
                    correlation += column[i] * residual[i];
                }
                let rho = correlation / n + moments[j] * old;

                let new = soft_threshold(rho, self.alpha) / moments[j];
                if new != old {
                    let delta = new - old;
                    for i in 0..n_samples {
                        residual[i] -= column[i] * delta;
                    }
                    coef[j] = new;
                    max_delta = max_delta.max(delta.abs());
                }
            }

            if max_delta < self.tol {
                break;
            }
        }

        let mut coef = Vector::from_vec(coef);
        let mut intercept = y_mean
            - coef
                .iter()
                .zip(x_means.iter())
                .map(|(w, m)| w * m)
                .sum::<f32>();

        if let Some(scaler) = &scaler {
            (coef, intercept) = base::denormalize_coefficients(&coef, intercept, scaler);
        }

        self.coefficients = Some(coef);
        self.intercept = intercept;

        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        base::affine_predict(x, self.coefficients.as_ref(), self.intercept, "Lasso")
    }
}
