//! Stochastic gradient descent for per-sample updates.

use serde::{Deserialize, Serialize};

use crate::primitives::Vector;

use super::Optimizer;

/// Stochastic gradient descent with optional momentum.
///
/// Update rule without momentum: `theta <- theta - lr * g`.
/// With momentum: `v <- gamma v + lr g; theta <- theta - v`.
///
/// # Example
///
/// ```
/// use regresar::optim::{Optimizer, Sgd};
/// use regresar::primitives::Vector;
///
/// let mut optimizer = Sgd::new(0.1);
/// let mut params = Vector::from_slice(&[1.0, 2.0]);
/// let gradients = Vector::from_slice(&[0.5, 1.0]);
///
/// optimizer.step(&mut params, &gradients);
/// assert!((params[0] - 0.95).abs() < 1e-6);
/// assert!((params[1] - 1.9).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sgd {
    learning_rate: f32,
    momentum: f32,
    velocity: Option<Vec<f32>>,
}

impl Sgd {
    /// Creates an SGD optimizer with the given learning rate.
    #[must_use]
    pub fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            momentum: 0.0,
            velocity: None,
        }
    }

    /// Sets the momentum coefficient (0.0 disables momentum).
    #[must_use]
    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    /// Returns the learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Returns the momentum coefficient.
    #[must_use]
    pub fn momentum(&self) -> f32 {
        self.momentum
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut Vector<f32>, gradients: &Vector<f32>) {
        assert_eq!(
            params.len(),
            gradients.len(),
            "Parameters and gradients must have same length"
        );

        let n = params.len();

        if self.momentum > 0.0 {
            if self.velocity.as_ref().map(Vec::len) != Some(n) {
                self.velocity = Some(vec![0.0; n]);
            }
            let velocity = self.velocity.as_mut().expect("velocity just initialized");
            for i in 0..n {
                velocity[i] = self.momentum * velocity[i] + self.learning_rate * gradients[i];
                params[i] -= velocity[i];
            }
        } else {
            for i in 0..n {
                params[i] -= self.learning_rate * gradients[i];
            }
        }
    }

    fn reset(&mut self) {
        self.velocity = None;
    }
}
