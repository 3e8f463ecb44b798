use rand::Rng;

use crate::{activation::activation::ActivationFunction, error::{Error, Result}, math::matrix::Matrix};

/// One affine transform followed by an element-wise activation.
///
/// `weights` is `layer_size × input_size`, `bias` is `layer_size × 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer{
    pub weights: Matrix,
    pub bias: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    /// Weights and bias drawn uniformly from [-1.0, 1.0].
    pub fn new(input_size: usize, layer_size: usize, activation: ActivationFunction) -> Layer {
        Layer::with_rng(input_size, layer_size, activation, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        layer_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::random_with(layer_size, input_size, rng);
        let bias = Matrix::random_with(layer_size, 1, rng);

        Layer {
            weights,
            bias,
            activator: activation
        }
    }

    /// Wraps existing parameters; `bias` must be a column as tall as `weights`.
    pub fn from_parameters(weights: Matrix, bias: Matrix, activation: ActivationFunction) -> Result<Layer> {
        let layer = Layer { weights, bias, activator: activation };
        layer.validate()?;
        Ok(layer)
    }

    /// Checks that the parameters really are `size × input_size` and `size × 1`.
    pub fn validate(&self) -> Result<()> {
        self.weights.check_consistent("weights")?;
        self.bias.check_consistent("bias")?;
        if self.weights.rows == 0 || self.weights.cols == 0 {
            return Err(Error::Config("layer must have at least one input and one output".into()));
        }
        if self.bias.cols != 1 || self.bias.rows != self.weights.rows {
            return Err(Error::shape("bias", (self.weights.rows, 1), self.bias.shape()));
        }
        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn size(&self) -> usize {
        self.weights.rows
    }

    /// `activation(weights · input + bias)` for an `input_size × 1` input.
    pub fn compute_output(&self, input: &Matrix) -> Result<Matrix> {
        input.check_consistent("compute_output")?;
        if input.cols != 1 {
            return Err(Error::shape("compute_output", (self.input_size(), 1), input.shape()));
        }
        let z = self.weights.dot(input)?.checked_add(&self.bias)?;
        Ok(z.map(|x| self.activator.function(x)))
    }

    /// Error derivative at the network output: `outputs.last() - expectation`.
    /// Only meaningful for the final layer.
    pub fn output_layer_derror_by_doutput(&self, expectation: &Matrix, outputs: &[Matrix]) -> Result<Matrix> {
        let output = outputs.last()
            .ok_or_else(|| Error::Config("forward trace is empty".into()))?;
        output.checked_sub(expectation)
    }

    /// Activation derivative evaluated from this layer's cached output.
    pub fn doutput_by_dactivation(&self, layer_output: &Matrix) -> Matrix {
        layer_output.map(|y| self.activator.derivative_from_output(y))
    }

    pub fn dactivation_by_dweight(&self, previous_layer_output: &Matrix) -> Matrix {
        previous_layer_output.transpose()
    }

    pub fn dactivation_by_dbias(&self) -> Matrix {
        Matrix::ones(self.bias.rows, self.bias.cols)
    }
}
