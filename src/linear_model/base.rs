//! Shared scaffolding for the linear-model variants: shape validation,
//! intercept handling, feature normalization, and the affine prediction
//! map.

use crate::error::{ModelError, Result};
use crate::preprocessing::StandardScaler;
use crate::primitives::{Matrix, Vector};
use crate::traits::Transformer;

/// Validates the training shapes shared by every variant.
pub(crate) fn validate_fit(x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
    let (n_samples, n_features) = x.shape();

    if n_samples == 0 {
        return Err("Cannot fit with zero samples".into());
    }
    if n_features == 0 {
        return Err("Cannot fit with zero features".into());
    }
    if n_samples != y.len() {
        return Err(ModelError::dimension_mismatch(
            format!("{n_samples} targets"),
            format!("{}", y.len()),
        ));
    }
    Ok(())
}

/// Prepends a column of ones, turning the intercept into the first
/// parameter of the augmented system.
pub(crate) fn add_intercept_column(x: &Matrix<f32>) -> Matrix<f32> {
    let (n_rows, n_cols) = x.shape();
    let mut data = Vec::with_capacity(n_rows * (n_cols + 1));

    for i in 0..n_rows {
        data.push(1.0);
        for j in 0..n_cols {
            data.push(x.get(i, j));
        }
    }

    Matrix::from_vec(n_rows, n_cols + 1, data).expect("bias column preserves the row count")
}

/// Optionally standardizes the features, returning the working matrix and
/// the fitted scaler when normalization is on.
pub(crate) fn maybe_normalize(
    x: &Matrix<f32>,
    normalize: bool,
) -> Result<(Matrix<f32>, Option<StandardScaler>)> {
    if !normalize {
        return Ok((x.clone(), None));
    }
    let mut scaler = StandardScaler::new();
    let x_scaled = scaler.fit_transform(x)?;
    Ok((x_scaled, Some(scaler)))
}

/// Maps coefficients fitted in normalized feature space back to the
/// original space, so that predict always works on raw features:
///
/// ```text
/// w_j = w'_j / scale_j
/// b   = b' - sum_j w'_j * mean_j / scale_j
/// ```
pub(crate) fn denormalize_coefficients(
    coef: &Vector<f32>,
    intercept: f32,
    scaler: &StandardScaler,
) -> (Vector<f32>, f32) {
    let mean = scaler.mean();
    let scale = scaler.scale();

    let mut original = Vector::zeros(coef.len());
    let mut shift = 0.0;
    for j in 0..coef.len() {
        original[j] = coef[j] / scale[j];
        shift += coef[j] * mean[j] / scale[j];
    }

    (original, intercept - shift)
}

/// The affine map `y = X w + b` shared by every variant's predict.
pub(crate) fn affine_predict(
    x: &Matrix<f32>,
    coef: Option<&Vector<f32>>,
    intercept: f32,
    model: &str,
) -> Result<Vector<f32>> {
    let coef = coef.ok_or_else(|| ModelError::NotFitted {
        what: model.to_string(),
    })?;

    if x.n_cols() != coef.len() {
        return Err(ModelError::dimension_mismatch(
            format!("{} features", coef.len()),
            format!("{}", x.n_cols()),
        ));
    }

    Ok(x.matvec(coef)?.add_scalar(intercept))
}
