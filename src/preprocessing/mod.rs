//! Data transformers used before fitting.
//!
//! Currently a single transformer: [`StandardScaler`], which the linear
//! models use to implement their `normalize` option.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;

/// Standardizes features to zero mean and unit scale.
///
/// The scale of each column is its population standard deviation
/// (divide by n, not n-1). A zero-variance column gets scale 1.0 so that
/// transforming never divides by zero and the column passes through
/// centered but unscaled.
///
/// # Examples
///
/// ```
/// use regresar::preprocessing::StandardScaler;
/// use regresar::primitives::Matrix;
/// use regresar::traits::Transformer;
///
/// let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&x).unwrap();
///
/// let mean: f32 = (0..3).map(|i| scaled.get(i, 0)).sum::<f32>() / 3.0;
/// assert!(mean.abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Scale of each feature (population std, or 1.0 for constant columns).
    scale: Option<Vec<f32>>,
}

impl StandardScaler {
    /// Creates a new unfitted `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            scale: None,
        }
    }

    /// Returns the per-feature means.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f32] {
        self.mean.as_deref().expect("Scaler not fitted")
    }

    /// Returns the per-feature scales.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn scale(&self) -> &[f32] {
        self.scale.as_deref().expect("Scaler not fitted")
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and population standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err("Cannot fit scaler with zero samples".into());
        }

        let mut mean = vec![0.0; n_features];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..n_samples {
                sum += x.get(i, j);
            }
            *mean_j = sum / n_samples as f32;
        }

        let mut scale = vec![0.0; n_features];
        for (j, scale_j) in scale.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for i in 0..n_samples {
                let diff = x.get(i, j) - mean[j];
                sum_sq += diff * diff;
            }
            let std = (sum_sq / n_samples as f32).sqrt();
            // Constant columns pass through unscaled.
            *scale_j = if std == 0.0 { 1.0 } else { std };
        }

        self.mean = Some(mean);
        self.scale = Some(scale);

        Ok(())
    }

    /// Standardizes the data using fitted mean and scale.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let not_fitted = || ModelError::NotFitted {
            what: "StandardScaler".to_string(),
        };
        let mean = self.mean.as_ref().ok_or_else(not_fitted)?;
        let scale = self.scale.as_ref().ok_or_else(not_fitted)?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(ModelError::dimension_mismatch(
                format!("{} features", mean.len()),
                format!("{n_features} features"),
            ));
        }

        let mut data = vec![0.0; n_samples * n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                data[i * n_features + j] = (x.get(i, j) - mean[j]) / scale[j];
            }
        }

        Matrix::from_vec(n_samples, n_features, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_computes_population_std() {
        // Column [2, 4, 6]: mean 4, population std sqrt(8/3)
        let x = Matrix::from_vec(3, 1, vec![2.0, 4.0, 6.0]).unwrap();
        let mut scaler = StandardScaler::new();
        scaler.fit(&x).unwrap();

        assert!((scaler.mean()[0] - 4.0).abs() < 1e-6);
        assert!((scaler.scale()[0] - (8.0f32 / 3.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_transform_zero_mean_unit_scale() {
        let x = Matrix::from_vec(4, 2, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0]).unwrap();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        for j in 0..2 {
            let mut sum = 0.0;
            let mut sum_sq = 0.0;
            for i in 0..4 {
                sum += scaled.get(i, j);
                sum_sq += scaled.get(i, j) * scaled.get(i, j);
            }
            assert!((sum / 4.0).abs() < 1e-5, "mean should be ~0");
            assert!((sum_sq / 4.0 - 1.0).abs() < 1e-4, "variance should be ~1");
        }
    }

    #[test]
    fn test_constant_column_gets_unit_scale() {
        let x = Matrix::from_vec(3, 1, vec![5.0, 5.0, 5.0]).unwrap();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        assert_eq!(scaler.scale()[0], 1.0);
        for i in 0..3 {
            assert_eq!(scaled.get(i, 0), 0.0);
        }
    }

    #[test]
    fn test_transform_without_fit_fails() {
        let scaler = StandardScaler::new();
        let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
        assert!(scaler.transform(&x).is_err());
        assert!(!scaler.is_fitted());
    }

    #[test]
    fn test_transform_feature_mismatch_fails() {
        let train = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let test = Matrix::from_vec(2, 3, vec![0.0; 6]).unwrap();
        let mut scaler = StandardScaler::new();
        scaler.fit(&train).unwrap();
        assert!(scaler.transform(&test).is_err());
    }

    #[test]
    fn test_fit_empty_fails() {
        let x = Matrix::from_vec(0, 2, vec![]).unwrap();
        let mut scaler = StandardScaler::new();
        assert!(scaler.fit(&x).is_err());
    }
}
