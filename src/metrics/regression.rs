//! Regression metrics over (n_samples, n_outputs) matrices with sample
//! weighting and multi-output aggregation.

use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::primitives::{Matrix, Vector};

/// Aggregation policy for per-output metric values.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Multioutput {
    /// Uniform average across output columns (the default).
    #[default]
    UniformAverage,
    /// One value per output column, no aggregation.
    RawValues,
    /// Average weighted by each output's weighted target variance.
    /// Only meaningful for R².
    VarianceWeighted,
    /// Weighted average with caller-supplied per-output weights.
    Custom(Vector<f32>),
}

impl FromStr for Multioutput {
    type Err = ModelError;

    /// Parses the reference mode strings. The empty string selects the
    /// uniform average.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "uniform_average" => Ok(Self::UniformAverage),
            "raw_values" => Ok(Self::RawValues),
            "variance_weighted" => Ok(Self::VarianceWeighted),
            other => Err(ModelError::invalid_hyperparameter(
                "multioutput",
                other,
                "one of \"\", \"uniform_average\", \"raw_values\", \"variance_weighted\"",
            )),
        }
    }
}

fn validate(
    y_true: &Matrix<f32>,
    y_pred: &Matrix<f32>,
    sample_weight: Option<&Vector<f32>>,
) -> Result<()> {
    if y_true.shape() != y_pred.shape() {
        return Err(ModelError::dimension_mismatch(
            format!("{:?}", y_true.shape()),
            format!("{:?}", y_pred.shape()),
        ));
    }
    if y_true.n_rows() == 0 || y_true.n_cols() == 0 {
        return Err("Metric inputs cannot be empty".into());
    }
    if let Some(w) = sample_weight {
        if w.len() != y_true.n_rows() {
            return Err(ModelError::dimension_mismatch(
                format!("{} sample weights", y_true.n_rows()),
                format!("{}", w.len()),
            ));
        }
    }
    Ok(())
}

fn weight_at(sample_weight: Option<&Vector<f32>>, i: usize) -> f32 {
    sample_weight.map_or(1.0, |w| w[i])
}

/// Aggregates per-output values according to the multi-output policy.
/// `variances` carries the per-output SS_tot used by `VarianceWeighted`.
fn aggregate(
    per_output: Vector<f32>,
    variances: &[f32],
    multioutput: &Multioutput,
) -> Result<Vector<f32>> {
    let k = per_output.len();
    match multioutput {
        Multioutput::RawValues => Ok(per_output),
        Multioutput::UniformAverage => Ok(Vector::from_vec(vec![per_output.mean()])),
        Multioutput::VarianceWeighted => {
            let total: f32 = variances.iter().sum();
            if total == 0.0 {
                // Every output is constant; fall back to the uniform mean.
                return Ok(Vector::from_vec(vec![per_output.mean()]));
            }
            let mut acc = 0.0;
            for j in 0..k {
                acc += per_output[j] * variances[j];
            }
            Ok(Vector::from_vec(vec![acc / total]))
        }
        Multioutput::Custom(weights) => {
            if weights.len() != k {
                return Err(ModelError::dimension_mismatch(
                    format!("{k} output weights"),
                    format!("{}", weights.len()),
                ));
            }
            let total = weights.sum();
            if total == 0.0 {
                return Err(ModelError::invalid_hyperparameter(
                    "multioutput",
                    "custom weights summing to zero",
                    "a nonzero weight total",
                ));
            }
            Ok(Vector::from_vec(vec![per_output.dot(weights) / total]))
        }
    }
}

/// Computes the R² score of `y_pred` against `y_true`.
///
/// Per output column: `1 - SS_res / SS_tot` with weighted sums, where the
/// target mean is the weighted mean. When an output has zero weighted
/// variance (`SS_tot == 0`), its score is defined as 1.0 if the
/// predictions match exactly and 0.0 otherwise.
///
/// Returns a single-element vector unless `multioutput` is
/// [`Multioutput::RawValues`], in which case one score per output column
/// is returned.
///
/// # Examples
///
/// ```
/// use regresar::metrics::{r2_score, Multioutput};
/// use regresar::primitives::Matrix;
///
/// let y_true = Matrix::from_vec(4, 1, vec![3.0, -0.5, 2.0, 7.0]).unwrap();
/// let y_pred = Matrix::from_vec(4, 1, vec![2.5, 0.0, 2.0, 8.0]).unwrap();
/// let r2 = r2_score(&y_true, &y_pred, None, &Multioutput::UniformAverage).unwrap();
/// assert!((r2[0] - 0.948).abs() < 1e-3);
/// ```
///
/// # Errors
///
/// Returns an error on shape mismatch between the inputs or an invalid
/// multi-output configuration.
pub fn r2_score(
    y_true: &Matrix<f32>,
    y_pred: &Matrix<f32>,
    sample_weight: Option<&Vector<f32>>,
    multioutput: &Multioutput,
) -> Result<Vector<f32>> {
    validate(y_true, y_pred, sample_weight)?;

    let (n_samples, n_outputs) = y_true.shape();
    let mut scores = Vector::zeros(n_outputs);
    let mut variances = vec![0.0f32; n_outputs];

    for j in 0..n_outputs {
        let mut w_total = 0.0;
        let mut t_weighted = 0.0;
        for i in 0..n_samples {
            let w = weight_at(sample_weight, i);
            w_total += w;
            t_weighted += w * y_true.get(i, j);
        }
        let y_mean = t_weighted / w_total;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for i in 0..n_samples {
            let w = weight_at(sample_weight, i);
            let t = y_true.get(i, j);
            let p = y_pred.get(i, j);
            ss_res += w * (t - p) * (t - p);
            ss_tot += w * (t - y_mean) * (t - y_mean);
        }

        variances[j] = ss_tot;
        scores[j] = if ss_tot == 0.0 {
            // Constant target: exact predictions are perfect, anything
            // else scores the sentinel 0.0 instead of NaN.
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };
    }

    aggregate(scores, &variances, multioutput)
}

fn weighted_residual_metric<R>(
    y_true: &Matrix<f32>,
    y_pred: &Matrix<f32>,
    sample_weight: Option<&Vector<f32>>,
    multioutput: &Multioutput,
    metric_name: &str,
    residual: R,
) -> Result<Vector<f32>>
where
    R: Fn(f32, f32) -> f32,
{
    validate(y_true, y_pred, sample_weight)?;

    if *multioutput == Multioutput::VarianceWeighted {
        return Err(ModelError::invalid_hyperparameter(
            "multioutput",
            "variance_weighted",
            &format!("a mode supported by {metric_name} (variance weighting is R2-specific)"),
        ));
    }

    let (n_samples, n_outputs) = y_true.shape();
    let mut values = Vector::zeros(n_outputs);

    for j in 0..n_outputs {
        let mut acc = 0.0;
        let mut w_total = 0.0;
        for i in 0..n_samples {
            let w = weight_at(sample_weight, i);
            acc += w * residual(y_true.get(i, j), y_pred.get(i, j));
            w_total += w;
        }
        values[j] = acc / w_total;
    }

    aggregate(values, &[], multioutput)
}

/// Computes the Mean Squared Error, the weighted average of squared
/// residuals per output column.
///
/// Supports the same aggregation modes as [`r2_score`] except
/// [`Multioutput::VarianceWeighted`], which is rejected.
///
/// # Examples
///
/// ```
/// use regresar::metrics::{mean_squared_error, Multioutput};
/// use regresar::primitives::Matrix;
///
/// let y_true = Matrix::from_vec(4, 1, vec![3.0, -0.5, 2.0, 7.0]).unwrap();
/// let y_pred = Matrix::from_vec(4, 1, vec![2.5, 0.0, 2.0, 8.0]).unwrap();
/// let err = mean_squared_error(&y_true, &y_pred, None, &Multioutput::UniformAverage).unwrap();
/// assert_eq!(err[0], 0.375);
/// ```
///
/// # Errors
///
/// Returns an error on shape mismatch or an invalid multi-output
/// configuration.
pub fn mean_squared_error(
    y_true: &Matrix<f32>,
    y_pred: &Matrix<f32>,
    sample_weight: Option<&Vector<f32>>,
    multioutput: &Multioutput,
) -> Result<Vector<f32>> {
    weighted_residual_metric(y_true, y_pred, sample_weight, multioutput, "MSE", |t, p| {
        (t - p) * (t - p)
    })
}

/// Computes the Mean Absolute Error, the weighted average of absolute
/// residuals per output column.
///
/// # Errors
///
/// Returns an error on shape mismatch or an invalid multi-output
/// configuration.
pub fn mean_absolute_error(
    y_true: &Matrix<f32>,
    y_pred: &Matrix<f32>,
    sample_weight: Option<&Vector<f32>>,
    multioutput: &Multioutput,
) -> Result<Vector<f32>> {
    weighted_residual_metric(y_true, y_pred, sample_weight, multioutput, "MAE", |t, p| {
        (t - p).abs()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[f32]) -> Matrix<f32> {
        Matrix::from_vec(values.len(), 1, values.to_vec()).unwrap()
    }

    #[test]
    fn test_r2_single_output_reference() {
        let y_true = col(&[3.0, -0.5, 2.0, 7.0]);
        let y_pred = col(&[2.5, 0.0, 2.0, 8.0]);
        let r2 = r2_score(&y_true, &y_pred, None, &Multioutput::UniformAverage).unwrap();
        assert_eq!(r2.len(), 1);
        assert!((r2[0] - 0.948).abs() < 1e-3);
    }

    #[test]
    fn test_r2_variance_weighted_reference() {
        let y_true = Matrix::from_vec(3, 2, vec![0.5, 1.0, -1.0, 1.0, 7.0, -6.0]).unwrap();
        let y_pred = Matrix::from_vec(3, 2, vec![0.0, 2.0, -1.0, 2.0, 8.0, -5.0]).unwrap();
        let r2 = r2_score(&y_true, &y_pred, None, &Multioutput::VarianceWeighted).unwrap();
        assert!((r2[0] - 0.938).abs() < 1e-3);
    }

    #[test]
    fn test_r2_exact_cases() {
        let y = col(&[1.0, 2.0, 3.0]);
        assert_eq!(
            r2_score(&y, &y, None, &Multioutput::UniformAverage).unwrap()[0],
            1.0
        );

        let mean_pred = col(&[2.0, 2.0, 2.0]);
        assert_eq!(
            r2_score(&y, &mean_pred, None, &Multioutput::UniformAverage).unwrap()[0],
            0.0
        );

        let reversed = col(&[3.0, 2.0, 1.0]);
        assert_eq!(
            r2_score(&y, &reversed, None, &Multioutput::UniformAverage).unwrap()[0],
            -3.0
        );
    }

    #[test]
    fn test_r2_zero_variance_target() {
        let y_true = col(&[5.0, 5.0, 5.0]);
        let exact = col(&[5.0, 5.0, 5.0]);
        let off = col(&[5.0, 6.0, 5.0]);

        let r2 = r2_score(&y_true, &exact, None, &Multioutput::UniformAverage).unwrap();
        assert_eq!(r2[0], 1.0);

        let r2 = r2_score(&y_true, &off, None, &Multioutput::UniformAverage).unwrap();
        assert_eq!(r2[0], 0.0);
    }

    #[test]
    fn test_r2_sample_weight() {
        // Weight zero removes a sample entirely.
        let y_true = col(&[1.0, 2.0, 3.0, 100.0]);
        let y_pred = col(&[1.0, 2.0, 3.0, -50.0]);
        let w = Vector::from_slice(&[1.0, 1.0, 1.0, 0.0]);
        let r2 = r2_score(&y_true, &y_pred, Some(&w), &Multioutput::UniformAverage).unwrap();
        assert_eq!(r2[0], 1.0);
    }

    #[test]
    fn test_mse_reference_values() {
        let y_true = col(&[3.0, -0.5, 2.0, 7.0]);
        let y_pred = col(&[2.5, 0.0, 2.0, 8.0]);
        let err = mean_squared_error(&y_true, &y_pred, None, &Multioutput::UniformAverage).unwrap();
        assert_eq!(err[0], 0.375);
    }

    #[test]
    fn test_mse_multi_output_raw_and_average() {
        let y_true = Matrix::from_vec(3, 2, vec![0.5, 1.0, -1.0, 1.0, 7.0, -6.0]).unwrap();
        let y_pred = Matrix::from_vec(3, 2, vec![0.0, 2.0, -1.0, 2.0, 8.0, -5.0]).unwrap();

        let raw = mean_squared_error(&y_true, &y_pred, None, &Multioutput::RawValues).unwrap();
        assert_eq!(raw.len(), 2);
        assert!((raw[0] - 0.41666).abs() < 1e-3);
        assert!((raw[1] - 1.0).abs() < 1e-3);

        let avg = mean_squared_error(&y_true, &y_pred, None, &Multioutput::UniformAverage).unwrap();
        assert!((avg[0] - 0.70833).abs() < 1e-3);
    }

    #[test]
    fn test_mse_custom_output_weights() {
        // Reference: weights [0.3, 0.7] -> 0.824...
        let y_true = Matrix::from_vec(3, 2, vec![0.5, 1.0, -1.0, 1.0, 7.0, -6.0]).unwrap();
        let y_pred = Matrix::from_vec(3, 2, vec![0.0, 2.0, -1.0, 2.0, 8.0, -5.0]).unwrap();
        let weights = Multioutput::Custom(Vector::from_slice(&[0.3, 0.7]));
        let err = mean_squared_error(&y_true, &y_pred, None, &weights).unwrap();
        assert!((err[0] - 0.825).abs() < 1e-3);
    }

    #[test]
    fn test_mae_reference_values() {
        let y_true = col(&[3.0, -0.5, 2.0, 7.0]);
        let y_pred = col(&[2.5, 0.0, 2.0, 8.0]);
        let err =
            mean_absolute_error(&y_true, &y_pred, None, &Multioutput::UniformAverage).unwrap();
        assert_eq!(err[0], 0.5);
    }

    #[test]
    fn test_mae_multi_output() {
        let y_true = Matrix::from_vec(3, 2, vec![0.5, 1.0, -1.0, 1.0, 7.0, -6.0]).unwrap();
        let y_pred = Matrix::from_vec(3, 2, vec![0.0, 2.0, -1.0, 2.0, 8.0, -5.0]).unwrap();

        let avg =
            mean_absolute_error(&y_true, &y_pred, None, &Multioutput::UniformAverage).unwrap();
        assert!((avg[0] - 0.75).abs() < 1e-3);

        let raw = mean_absolute_error(&y_true, &y_pred, None, &Multioutput::RawValues).unwrap();
        assert!((raw[0] - 0.5).abs() < 1e-3);
        assert!((raw[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_variance_weighted_rejected_for_mse_and_mae() {
        let y = col(&[1.0, 2.0]);
        assert!(mean_squared_error(&y, &y, None, &Multioutput::VarianceWeighted).is_err());
        assert!(mean_absolute_error(&y, &y, None, &Multioutput::VarianceWeighted).is_err());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let a = col(&[1.0, 2.0]);
        let b = col(&[1.0, 2.0, 3.0]);
        assert!(r2_score(&a, &b, None, &Multioutput::UniformAverage).is_err());

        let w = Vector::from_slice(&[1.0]);
        assert!(r2_score(&a, &a, Some(&w), &Multioutput::UniformAverage).is_err());
    }

    #[test]
    fn test_custom_weights_length_mismatch_rejected() {
        let y = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let weights = Multioutput::Custom(Vector::from_slice(&[1.0]));
        assert!(mean_squared_error(&y, &y, None, &weights).is_err());
    }

    #[test]
    fn test_multioutput_from_str() {
        assert_eq!(
            "".parse::<Multioutput>().unwrap(),
            Multioutput::UniformAverage
        );
        assert_eq!(
            "raw_values".parse::<Multioutput>().unwrap(),
            Multioutput::RawValues
        );
        assert_eq!(
            "variance_weighted".parse::<Multioutput>().unwrap(),
            Multioutput::VarianceWeighted
        );
        assert!("median".parse::<Multioutput>().is_err());
    }
}
