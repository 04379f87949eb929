//! Core traits for estimators and transformers.
//!
//! These traits define the API contracts shared by all model variants.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised regression estimators.
///
/// Estimators implement fit/predict/score following sklearn conventions.
/// `fit` fully replaces any previously fitted state; no partial state is
/// observable when it fails. `predict` and `score` are read-only and
/// surface a [`crate::error::ModelError::DimensionMismatch`] when the input
/// feature count differs from the fitted one.
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
/// let score = model.score(&x, &y).unwrap();
/// assert!(score > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error on dimension mismatch, invalid hyperparameters,
    /// or a singular closed-form system.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count
    /// doesn't match the fitted coefficients.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>>;

    /// Computes the R² score of the predictions against `y`.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails or `y` has the wrong length.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32> {
        let y_pred = self.predict(x)?;
        if y_pred.len() != y.len() {
            return Err(crate::error::ModelError::dimension_mismatch(
                format!("{} targets", y_pred.len()),
                format!("{}", y.len()),
            ));
        }
        Ok(crate::metrics::r_squared(&y_pred, y))
    }

    /// Weighted R² score; `None` weights every sample equally.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails or shapes disagree.
    fn score_weighted(
        &self,
        x: &Matrix<f32>,
        y: &Vector<f32>,
        sample_weight: Option<&Vector<f32>>,
    ) -> Result<f32> {
        let y_pred = self.predict(x)?;
        let n = y.len();
        let y_true = Matrix::from_vec(n, 1, y.as_slice().to_vec())?;
        let y_hat = Matrix::from_vec(y_pred.len(), 1, y_pred.as_slice().to_vec())?;
        let scores = crate::metrics::r2_score(
            &y_true,
            &y_hat,
            sample_weight,
            &crate::metrics::Multioutput::UniformAverage,
        )?;
        Ok(scores[0])
    }
}

/// Trait for data transformers (scalers, encoders).
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}
