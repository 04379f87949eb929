//! Online linear regression via stochastic gradient descent.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::base;
use crate::error::{ModelError, Result};
use crate::metrics::r_squared;
use crate::optim::{Optimizer, Sgd};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Linear regression fitted by per-sample stochastic gradient updates.
///
/// Minimizes the halved squared error `1/2 (x_i . w + b - y_i)^2` one
/// sample at a time: `theta <- theta - lr * (pred - y_i) * [1, x_i]`.
/// Training runs for up to `max_epochs` passes over the data and stops
/// early when the epoch mean squared error improves by less than `tol`.
///
/// Samples are shuffled every epoch with an explicitly seeded generator,
/// so two fits with the same seed are bit-identical. Disable shuffling
/// with [`with_shuffle`](Self::with_shuffle) to keep presentation order.
///
/// # Examples
///
/// ```
/// use regresar::prelude::*;
///
/// // y = 2x + 1 on zero-mean, unit-scale features
/// let x = Matrix::from_vec(4, 1, vec![-1.0, -0.5, 0.5, 1.0]).unwrap();
/// let y = Vector::from_slice(&[-1.0, 0.0, 2.0, 3.0]);
///
/// let mut model = SgdRegressor::new(0.1);
/// model.fit(&x, &y).unwrap();
/// assert!(model.score(&x, &y).unwrap() > 0.95);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgdRegressor {
    /// Step size for the per-sample updates.
    learning_rate: f32,
    /// Momentum coefficient forwarded to the optimizer (0.0 disables it).
    momentum: f32,
    /// Maximum number of passes over the data.
    max_epochs: usize,
    /// Whether to reshuffle the sample order every epoch.
    shuffle: bool,
    /// Seed for the shuffling generator.
    seed: u64,
    /// Early-stopping tolerance on the epoch mean squared error.
    tol: f32,
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

impl SgdRegressor {
    /// Creates a new `SgdRegressor` with the given learning rate.
    ///
    /// Defaults: 100 epochs, shuffling on with seed 0, tolerance 1e-5,
    /// no momentum, normalization off. The learning rate must be
    /// positive; validated at fit time before any computation.
    #[must_use]
    pub fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            momentum: 0.0,
            max_epochs: 100,
            shuffle: true,
            seed: 0,
            tol: 1e-5,
            normalize: false,
            verbose: false,
            compute_score: false,
            coefficients: None,
            intercept: 0.0,
            train_score: None,
        }
    }

    /// Sets the momentum coefficient.
    #[must_use]
    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    /// Sets the maximum number of epochs.
    #[must_use]
    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    /// Enables or disables per-epoch shuffling.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sets the shuffling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the early-stopping tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Standardize features before fitting.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Print per-epoch diagnostics to stderr. Has no effect on the
    /// fitted coefficients.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Compute the training R² during fit. Has no effect on the fitted
    /// coefficients.
    #[must_use]
    pub fn with_compute_score(mut self, compute_score: bool) -> Self {
        self.compute_score = compute_score;
        self
    }

    /// Returns the learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
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

impl Estimator for SgdRegressor {
    /// Fits by streaming gradient updates over shuffled epochs.
    ///
    /// A diverging run (non-finite epoch loss) keeps the parameters from
    /// the last finite epoch; like the batch optimizers, running out of
    /// epochs yields a best-effort result, not an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` for a non-positive learning rate
    /// and `DimensionMismatch` on shape disagreement.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if self.learning_rate <= 0.0 {
            return Err(ModelError::invalid_hyperparameter(
                "learning_rate",
                self.learning_rate,
                "> 0",
            ));
        }
        base::validate_fit(x, y)?;

        let (n_samples, n_features) = x.shape();
        let (x_work, scaler) = base::maybe_normalize(x, self.normalize)?;

        // params[0] is the intercept, params[1..] the feature weights.
        let mut params = Vector::zeros(n_features + 1);
        let mut gradient = Vector::zeros(n_features + 1);
        let mut optimizer = Sgd::new(self.learning_rate).with_momentum(self.momentum);

        let mut order: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut prev_loss = f32::INFINITY;

        for epoch in 0..self.max_epochs {
            if self.shuffle {
                order.shuffle(&mut rng);
            }

            let snapshot = params.clone();
            let mut loss = 0.0;

            for &i in &order {
                let mut pred = params[0];
                for j in 0..n_features {
                    pred += params[j + 1] * x_work.get(i, j);
                }
                let err = pred - y[i];
                loss += err * err;

                gradient[0] = err;
                for j in 0..n_features {
                    gradient[j + 1] = err * x_work.get(i, j);
                }
                optimizer.step(&mut params, &gradient);
            }

            loss /= n_samples as f32;
            if self.verbose {
                eprintln!("SgdRegressor: epoch {epoch}, mse {loss:.6e}");
            }

            if !loss.is_finite() {
                // Diverged; keep the last finite state.
                params = snapshot;
                break;
            }
            if prev_loss - loss < self.tol {
                break;
            }
            prev_loss = loss;
        }

        let mut intercept = params[0];
        let mut coef = params.slice(1, n_features + 1);
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
        base::affine_predict(x, self.coefficients.as_ref(), self.intercept, "SgdRegressor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_simple_line() {
        // y = 2x + 1 on unit-scale data.
        let x = Matrix::from_vec(8, 1, (1..=8).map(|v| v as f32 / 8.0).collect()).unwrap();
        let y = Vector::from_vec(x.column(0).iter().map(|v| 2.0 * v + 1.0).collect());

        let mut model = SgdRegressor::new(0.05).with_max_epochs(500).with_tol(1e-9);
        model.fit(&x, &y).unwrap();

        assert!((model.coefficients()[0] - 2.0).abs() < 0.05);
        assert!((model.intercept() - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_non_positive_learning_rate_fails_fast() {
        let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
        let y = Vector::from_slice(&[1.0, 2.0]);

        for lr in [0.0, -0.1] {
            let mut model = SgdRegressor::new(lr);
            assert!(matches!(
                model.fit(&x, &y),
                Err(ModelError::InvalidHyperparameter { .. })
            ));
            assert!(!model.is_fitted());
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let x = Matrix::from_vec(6, 1, vec![0.1, 0.4, 0.2, 0.8, 0.5, 0.9]).unwrap();
        let y = Vector::from_slice(&[0.3, 0.9, 0.5, 1.7, 1.1, 1.9]);

        let mut a = SgdRegressor::new(0.05).with_seed(42);
        let mut b = SgdRegressor::new(0.05).with_seed(42);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        assert_eq!(a.coefficients(), b.coefficients());
        assert_eq!(a.intercept(), b.intercept());
    }

    #[test]
    fn test_different_seeds_may_differ_but_both_fit() {
        let x = Matrix::from_vec(6, 1, vec![0.1, 0.4, 0.2, 0.8, 0.5, 0.9]).unwrap();
        let y = Vector::from_slice(&[0.3, 0.9, 0.5, 1.7, 1.1, 1.9]);

        let mut a = SgdRegressor::new(0.05).with_seed(1).with_max_epochs(300);
        let mut b = SgdRegressor::new(0.05).with_seed(2).with_max_epochs(300);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        assert!(a.score(&x, &y).unwrap() > 0.9);
        assert!(b.score(&x, &y).unwrap() > 0.9);
    }

    #[test]
    fn test_no_shuffle_preserves_presentation_order() {
        let x = Matrix::from_vec(4, 1, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let y = Vector::from_slice(&[0.2, 0.4, 0.6, 0.8]);

        // Without shuffling the seed is irrelevant.
        let mut a = SgdRegressor::new(0.05).with_shuffle(false).with_seed(1);
        let mut b = SgdRegressor::new(0.05).with_shuffle(false).with_seed(999);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        assert_eq!(a.coefficients(), b.coefficients());
    }

    #[test]
    fn test_divergence_keeps_finite_parameters() {
        // Absurd learning rate on large-scale data diverges immediately;
        // the fit still succeeds with finite best-effort parameters.
        let x = Matrix::from_vec(4, 1, vec![100.0, 200.0, 300.0, 400.0]).unwrap();
        let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);

        let mut model = SgdRegressor::new(10.0);
        model.fit(&x, &y).unwrap();

        assert!(model.coefficients()[0].is_finite());
        assert!(model.intercept().is_finite());
    }

    #[test]
    fn test_compute_score_toggle() {
        let x = Matrix::from_vec(4, 1, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let y = Vector::from_slice(&[0.2, 0.4, 0.6, 0.8]);

        let mut model = SgdRegressor::new(0.05).with_compute_score(true);
        model.fit(&x, &y).unwrap();
        assert!(model.train_score().is_some());
    }
}
