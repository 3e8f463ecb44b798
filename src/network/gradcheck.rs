//! Central-difference verification of the analytic gradients produced by
//! [`Network::back_prop`].
//!
//! Every parameter is perturbed on an independent clone of the network, so the
//! network under test is never modified.

use crate::{
    error::Result,
    loss::mse::MseLoss,
    math::matrix::Matrix,
    network::network::{BackProp, LayerGradients, Network},
};

pub const DEFAULT_EPSILON: f64 = 1e-4;
pub const DEFAULT_TOLERANCE: f64 = 1e-2;

/// Largest absolute difference between analytic and numerical gradients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientCheck {
    pub max_weight_error: f64,
    pub max_bias_error: f64,
    pub max_input_error: f64,
}

impl GradientCheck {
    pub fn max_error(&self) -> f64 {
        self.max_weight_error.max(self.max_bias_error).max(self.max_input_error)
    }

    pub fn passes(&self, tolerance: f64) -> bool {
        self.max_error() < tolerance
    }
}

/// Numerical estimate of everything `back_prop` returns, same shapes and order.
pub fn numerical_gradients(
    network: &Network,
    input: &Matrix,
    expectation: &Matrix,
    epsilon: f64,
) -> Result<BackProp> {
    // Rejects a mismatched expectation before any perturbation.
    network.compute_error(input, expectation)?;

    let mut gradients = Vec::with_capacity(network.layers().len());

    for (index, layer) in network.layers().iter().enumerate() {
        let mut weights = Matrix::zeros(layer.weights.rows, layer.weights.cols);
        for i in 0..weights.rows {
            for j in 0..weights.cols {
                weights.data[i][j] = central_difference(epsilon, |shift| {
                    let mut shifted = network.clone();
                    shifted.layers_mut()[index].weights.data[i][j] += shift;
                    objective(&shifted, input, expectation)
                })?;
            }
        }

        let mut bias = Matrix::zeros(layer.bias.rows, layer.bias.cols);
        for i in 0..bias.rows {
            bias.data[i][0] = central_difference(epsilon, |shift| {
                let mut shifted = network.clone();
                shifted.layers_mut()[index].bias.data[i][0] += shift;
                objective(&shifted, input, expectation)
            })?;
        }

        gradients.push(LayerGradients { weights, bias });
    }

    let mut input_gradient = Matrix::zeros(input.rows, input.cols);
    for i in 0..input.rows {
        for j in 0..input.cols {
            input_gradient.data[i][j] = central_difference(epsilon, |shift| {
                let mut shifted = input.clone();
                shifted.data[i][j] += shift;
                objective(network, &shifted, expectation)
            })?;
        }
    }

    Ok(BackProp { input_gradient, gradients })
}

/// Compares `back_prop` against `numerical_gradients`.
pub fn check_gradients(
    network: &Network,
    input: &Matrix,
    expectation: &Matrix,
    epsilon: f64,
) -> Result<GradientCheck> {
    let analytic = network.back_prop(input, expectation)?;
    let numeric = numerical_gradients(network, input, expectation, epsilon)?;

    let mut check = GradientCheck {
        max_weight_error: 0.0,
        max_bias_error: 0.0,
        max_input_error: max_abs_difference(&analytic.input_gradient, &numeric.input_gradient)?,
    };
    for (a, n) in analytic.gradients.iter().zip(&numeric.gradients) {
        check.max_weight_error = check.max_weight_error.max(max_abs_difference(&a.weights, &n.weights)?);
        check.max_bias_error = check.max_bias_error.max(max_abs_difference(&a.bias, &n.bias)?);
    }
    Ok(check)
}

fn objective(network: &Network, input: &Matrix, expectation: &Matrix) -> Result<f64> {
    let output = network.predict(input)?;
    Ok(MseLoss::half_sum_squared(&output.to_vec(), &expectation.to_vec()))
}

fn central_difference<F>(epsilon: f64, evaluate: F) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    Ok((evaluate(epsilon)? - evaluate(-epsilon)?) / (2.0 * epsilon))
}

fn max_abs_difference(a: &Matrix, b: &Matrix) -> Result<f64> {
    Ok(a.checked_sub(b)?.to_vec().into_iter().fold(0.0, |acc, x| acc.max(x.abs())))
}
