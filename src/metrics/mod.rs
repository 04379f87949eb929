//! Evaluation metrics for regression models.
//!
//! Two layers:
//!
//! - Vector conveniences ([`r_squared`], [`mse`], [`mae`], [`rmse`]) for
//!   the single-output case, used by [`crate::traits::Estimator::score`].
//! - The matrix layer in [`regression`] ([`r2_score`],
//!   [`mean_squared_error`], [`mean_absolute_error`]) with sample weights
//!   and multi-output aggregation.
//!
//! All functions are pure and safe to call concurrently on independent
//! data.

pub mod regression;

pub use regression::{mean_absolute_error, mean_squared_error, r2_score, Multioutput};

use crate::primitives::Vector;

/// Computes the coefficient of determination (R²).
///
/// `R² = 1 - SS_res / SS_tot` where `SS_res` is the residual sum of
/// squares and `SS_tot` the total sum of squares around the mean of
/// `y_true`.
///
/// Degenerate case: when `y_true` has zero variance the score is 1.0 if
/// the predictions reproduce it exactly, else 0.0. Naive division would
/// produce NaN here.
///
/// # Examples
///
/// ```
/// use regresar::metrics::r_squared;
/// use regresar::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// let r2 = r_squared(&y_pred, &y_true);
/// assert!((r2 - 0.948).abs() < 1e-3);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn r_squared(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

    let y_mean = y_true.mean();

    let ss_res: f32 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();

    let ss_tot: f32 = y_true.iter().map(|t| (t - y_mean) * (t - y_mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - (ss_res / ss_tot)
}

/// Computes the Mean Squared Error.
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let sum_sq: f32 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();

    sum_sq / y_true.len() as f32
}

/// Computes the Mean Absolute Error.
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mae(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let sum_abs: f32 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();

    sum_abs / y_true.len() as f32
}

/// Root Mean Squared Error, `sqrt(mse)`.
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn rmse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    mse(y_pred, y_true).sqrt()
}
