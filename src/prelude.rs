//! Convenience re-exports for the common workflow.
//!
//! ```
//! use regresar::prelude::*;
//! ```

pub use crate::error::{ModelError, Result};
pub use crate::linear_model::{
    Lasso, LinearRegression, MultiOutputRegressor, Ridge, SgdRegressor, Solver,
};
pub use crate::metrics::{
    mean_absolute_error, mean_squared_error, r2_score, r_squared, Multioutput,
};
pub use crate::preprocessing::StandardScaler;
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{Estimator, Transformer};
