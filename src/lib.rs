//! Regresar: linear-model fitting and regression metrics in pure Rust.
//!
//! A small engine that estimates linear-model coefficients under several
//! objectives (ordinary least squares, ridge, lasso, online SGD) and
//! scores predictions with the standard regression metrics (R², MSE, MAE)
//! under multi-output aggregation policies.
//!
//! # Quick Start
//!
//! ```
//! use regresar::prelude::*;
//!
//! // Training data: y = 2x + 1
//! let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//!
//! let predictions = model.predict(&x).unwrap();
//! let r2 = model.score(&x, &y).unwrap();
//! assert!(r2 > 0.99);
//! # let _ = predictions;
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: dense Vector and Matrix types
//! - [`linear_model`]: the model variants sharing the fit/predict/score
//!   contract
//! - [`optim`]: pluggable batch and stochastic optimization strategies
//! - [`preprocessing`]: feature standardization
//! - [`metrics`]: regression metrics with sample weights and multi-output
//!   aggregation
//! - [`error`]: the crate-wide error taxonomy
//!
//! # Concurrency
//!
//! Fitting is synchronous and single-threaded. A model instance must not
//! be fitted concurrently, but distinct instances are fully independent,
//! and the metrics functions are stateless and safe to call from any
//! number of threads.

pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod optim;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod traits;
