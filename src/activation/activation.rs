use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Element-wise nonlinearity applied after a layer's affine transform.
///
/// Every variant has a derivative that can be recovered from the activation's
/// *output*, which is what the backward pass has cached in the forward trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    Tanh,
    Identity,
    ReLU,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Derivative of the activation with respect to its argument, given
    /// `y = function(x)` rather than `x`.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::Tanh => 1.0 - y * y,
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
        }
    }
}
