//! End-to-end fitting scenarios: every variant must recover a known
//! linear function and agree across solver strategies and normalization
//! settings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use regresar::prelude::*;

/// The reference function: f(x) = 1 + 2*x0 + 3*x1 + 4*x2.
fn f(x: &[f32]) -> f32 {
    1.0 + 2.0 * x[0] + 3.0 * x[1] + 4.0 * x[2]
}

/// Generates a seeded training set over [-10, 10)^3, optionally with
/// small uniform noise on the targets.
fn training_data(seed: u64, n_samples: usize, noise: bool) -> (Matrix<f32>, Vector<f32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x_data = Vec::with_capacity(n_samples * 3);
    let mut y_data = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let row: [f32; 3] = [
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        ];
        let mut target = f(&row);
        if noise {
            target += (rng.gen_range(0.0..1.0f32) - 0.5) / 2.0;
        }
        x_data.extend_from_slice(&row);
        y_data.push(target);
    }

    (
        Matrix::from_vec(n_samples, 3, x_data).unwrap(),
        Vector::from_vec(y_data),
    )
}

/// The held-out probe point; f([7, 8, 9]) = 75.
fn probe() -> Matrix<f32> {
    Matrix::from_vec(1, 3, vec![7.0, 8.0, 9.0]).unwrap()
}

#[test]
fn linear_regression_recovers_for_every_solver_and_normalization() {
    let (x, y) = training_data(7, 512, true);
    let x_probe = probe();

    for solver in [
        Solver::Normal,
        Solver::GradientDescent,
        Solver::ConjugateGradient,
        Solver::Lbfgs,
    ] {
        for normalize in [false, true] {
            let mut model = LinearRegression::new()
                .with_solver(solver)
                .with_normalize(normalize);
            model.fit(&x, &y).unwrap();

            let y_pred = model.predict(&x_probe).unwrap();
            assert!(
                (y_pred[0] - 75.0).abs() < 0.1,
                "{solver:?} normalize={normalize}: predicted {} instead of 75",
                y_pred[0]
            );

            let score = model.score(&x, &y).unwrap();
            assert!(score > 0.999, "{solver:?} normalize={normalize}: R² {score}");
        }
    }
}

#[test]
fn ridge_recovers_for_both_normalization_settings() {
    let (x, y) = training_data(11, 512, false);
    let x_probe = probe();

    for normalize in [false, true] {
        let mut model = Ridge::new(0.1).with_normalize(normalize);
        model.fit(&x, &y).unwrap();

        let y_pred = model.predict(&x_probe).unwrap();
        assert!(
            (y_pred[0] - 75.0).abs() < 0.1,
            "normalize={normalize}: predicted {} instead of 75",
            y_pred[0]
        );
    }
}

#[test]
fn lasso_recovers_for_both_normalization_settings() {
    let (x, y) = training_data(13, 512, false);
    let x_probe = probe();

    // The penalty biases coefficients toward zero and normalization
    // amplifies the effective shrinkage by each feature's scale, so the
    // recovery check uses a small alpha; sparsity behavior under large
    // alpha is covered separately.
    for normalize in [false, true] {
        let mut model = Lasso::new(0.01).with_normalize(normalize);
        model.fit(&x, &y).unwrap();

        let y_pred = model.predict(&x_probe).unwrap();
        assert!(
            (y_pred[0] - 75.0).abs() < 0.1,
            "normalize={normalize}: predicted {} instead of 75",
            y_pred[0]
        );
    }
}

#[test]
fn sgd_recovers_for_both_normalization_settings() {
    let (x, y) = training_data(17, 512, false);
    let x_probe = probe();

    for normalize in [false, true] {
        let mut model = SgdRegressor::new(1e-3)
            .with_max_epochs(300)
            .with_tol(1e-10)
            .with_normalize(normalize);
        model.fit(&x, &y).unwrap();

        let y_pred = model.predict(&x_probe).unwrap();
        assert!(
            (y_pred[0] - 75.0).abs() < 0.1,
            "normalize={normalize}: predicted {} instead of 75",
            y_pred[0]
        );
    }
}

#[test]
fn normalization_does_not_change_predictions() {
    let (x, y) = training_data(23, 256, true);

    let mut plain = LinearRegression::new();
    plain.fit(&x, &y).unwrap();

    let mut normalized = LinearRegression::new().with_normalize(true);
    normalized.fit(&x, &y).unwrap();

    let p1 = plain.predict(&x).unwrap();
    let p2 = normalized.predict(&x).unwrap();
    for i in 0..p1.len() {
        assert!(
            (p1[i] - p2[i]).abs() < 1e-2,
            "sample {i}: {} vs {}",
            p1[i],
            p2[i]
        );
    }
}

#[test]
fn repeated_predictions_are_identical() {
    let (x, y) = training_data(29, 128, true);

    let mut model = LinearRegression::new();
    model.fit(&x, &y).unwrap();

    let first = model.predict(&x).unwrap();
    let second = model.predict(&x).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sgd_with_fixed_seed_is_reproducible() {
    let (x, y) = training_data(31, 128, false);

    let mut a = SgdRegressor::new(1e-3).with_seed(5);
    let mut b = SgdRegressor::new(1e-3).with_seed(5);
    a.fit(&x, &y).unwrap();
    b.fit(&x, &y).unwrap();

    assert_eq!(a.coefficients(), b.coefficients());
    assert_eq!(a.intercept(), b.intercept());
}

#[test]
fn every_variant_rejects_mismatched_shapes() {
    let x = Matrix::from_vec(4, 2, vec![0.0; 8]).unwrap();
    let y = Vector::zeros(3);

    assert!(LinearRegression::new().fit(&x, &y).is_err());
    assert!(Ridge::new(0.1).fit(&x, &y).is_err());
    assert!(Lasso::new(0.1).fit(&x, &y).is_err());
    assert!(SgdRegressor::new(0.01).fit(&x, &y).is_err());
}

#[test]
fn invalid_hyperparameters_fail_before_fitting() {
    let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
    let y = Vector::from_slice(&[1.0, 2.0]);

    let mut ridge = Ridge::new(-1.0);
    assert!(matches!(
        ridge.fit(&x, &y),
        Err(ModelError::InvalidHyperparameter { .. })
    ));

    let mut lasso = Lasso::new(-1.0);
    assert!(matches!(
        lasso.fit(&x, &y),
        Err(ModelError::InvalidHyperparameter { .. })
    ));

    let mut sgd = SgdRegressor::new(0.0);
    assert!(matches!(
        sgd.fit(&x, &y),
        Err(ModelError::InvalidHyperparameter { .. })
    ));
}

#[test]
fn multi_output_targets_fit_through_the_wrapper() {
    let (x, y) = training_data(37, 256, false);

    // Second target: g(x) = -f(x) + 10.
    let n = y.len();
    let mut y_data = Vec::with_capacity(n * 2);
    for i in 0..n {
        y_data.push(y[i]);
        y_data.push(-y[i] + 10.0);
    }
    let y_multi = Matrix::from_vec(n, 2, y_data).unwrap();

    let mut model = MultiOutputRegressor::new(LinearRegression::new());
    model.fit(&x, &y_multi).unwrap();
    assert_eq!(model.n_outputs(), 2);

    let predictions = model.predict(&probe()).unwrap();
    assert!((predictions.get(0, 0) - 75.0).abs() < 0.1);
    assert!((predictions.get(0, 1) + 65.0).abs() < 0.1);

    assert!(model.score(&x, &y_multi).unwrap() > 0.999);
}

#[test]
fn fitted_model_state_survives_serde() {
    let (x, y) = training_data(41, 128, false);

    let mut model = Ridge::new(0.1);
    model.fit(&x, &y).unwrap();

    let json = serde_json::to_string(&model).unwrap();
    let restored: Ridge = serde_json::from_str(&json).unwrap();

    let before = model.predict(&x).unwrap();
    let after = restored.predict(&x).unwrap();
    assert_eq!(before, after);
}
