//! Multi-output fitting by training one estimator per target column.

use crate::error::{ModelError, Result};
use crate::metrics::{r2_score, Multioutput};
use crate::primitives::Matrix;
use crate::traits::Estimator;

/// Fits one clone of a base estimator per target column.
///
/// This realizes `fit(X, Y)` with a matrix target for every variant
/// uniformly: column `j` of the predictions comes from an independent
/// estimator trained on column `j` of `y`.
///
/// # Examples
///
/// ```
/// use regresar::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// // Two targets: y0 = 2x, y1 = -x + 1
/// let y = Matrix::from_vec(4, 2, vec![
///     2.0, 0.0,
///     4.0, -1.0,
///     6.0, -2.0,
///     8.0, -3.0,
/// ]).unwrap();
///
/// let mut model = MultiOutputRegressor::new(LinearRegression::new());
/// model.fit(&x, &y).unwrap();
///
/// let predictions = model.predict(&x).unwrap();
/// assert_eq!(predictions.shape(), (4, 2));
/// ```
#[derive(Debug, Clone)]
pub struct MultiOutputRegressor<E: Estimator + Clone> {
    template: E,
    estimators: Vec<E>,
}

impl<E: Estimator + Clone> MultiOutputRegressor<E> {
    /// Creates a new multi-output wrapper around a configured estimator.
    #[must_use]
    pub fn new(estimator: E) -> Self {
        Self {
            template: estimator,
            estimators: Vec::new(),
        }
    }

    /// Returns the number of fitted outputs (0 before fit).
    #[must_use]
    pub fn n_outputs(&self) -> usize {
        self.estimators.len()
    }

    /// Fits one estimator per column of `y`.
    ///
    /// # Errors
    ///
    /// Returns an error on shape mismatch or if any per-column fit fails;
    /// previously fitted state survives a failed refit untouched.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Matrix<f32>) -> Result<()> {
        if x.n_rows() != y.n_rows() {
            return Err(ModelError::dimension_mismatch(
                format!("{} target rows", x.n_rows()),
                format!("{}", y.n_rows()),
            ));
        }
        if y.n_cols() == 0 {
            return Err("Target matrix must have at least one column".into());
        }

        let mut fitted = Vec::with_capacity(y.n_cols());
        for j in 0..y.n_cols() {
            let mut estimator = self.template.clone();
            estimator.fit(x, &y.column(j))?;
            fitted.push(estimator);
        }

        self.estimators = fitted;
        Ok(())
    }

    /// Predicts an (n_samples, n_outputs) matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count
    /// doesn't match.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        if self.estimators.is_empty() {
            return Err(ModelError::NotFitted {
                what: "MultiOutputRegressor".to_string(),
            });
        }

        let mut result = Matrix::zeros(x.n_rows(), self.estimators.len());
        for (j, estimator) in self.estimators.iter().enumerate() {
            let column = estimator.predict(x)?;
            for i in 0..x.n_rows() {
                result.set(i, j, column[i]);
            }
        }
        Ok(result)
    }

    /// Uniform-average R² across outputs.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails or shapes disagree.
    pub fn score(&self, x: &Matrix<f32>, y: &Matrix<f32>) -> Result<f32> {
        let y_pred = self.predict(x)?;
        let scores = r2_score(y, &y_pred, None, &Multioutput::UniformAverage)?;
        Ok(scores[0])
    }
}
