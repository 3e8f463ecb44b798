use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use rand::Rng;
use tracing::debug;

use crate::{
    activation::activation::ActivationFunction,
    error::{Error, Result},
    layers::dense::Layer,
    loss::mse::MseLoss,
    math::matrix::Matrix,
    network::archive::ParameterArchive,
};

/// Gradient (or update) for one layer, shaped like that layer's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub bias: Matrix,
}

impl LayerGradients {
    pub fn scaled(&self, factor: f64) -> LayerGradients {
        LayerGradients {
            weights: self.weights.scale(factor),
            bias: self.bias.scale(factor),
        }
    }
}

/// Result of one backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BackProp {
    /// ∂E/∂input; never applied to parameters, exposed so callers can chain
    /// the network behind another differentiable component.
    pub input_gradient: Matrix,
    /// One entry per layer, layer 0 first.
    pub gradients: Vec<LayerGradients>,
}

/// An ordered, non-empty stack of shape-compatible layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a sigmoid network. `layer_sizes[0]` is the input size, every
    /// following entry the output size of one layer.
    pub fn new(layer_sizes: &[usize]) -> Result<Network> {
        Network::with_activation(layer_sizes, ActivationFunction::default())
    }

    pub fn with_activation(layer_sizes: &[usize], activation: ActivationFunction) -> Result<Network> {
        Network::with_rng(layer_sizes, activation, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<Network> {
        if layer_sizes.len() < 2 {
            return Err(Error::Config(format!(
                "need at least two layer sizes (input and one layer), got {}",
                layer_sizes.len()
            )));
        }
        if let Some(position) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(Error::Config(format!("layer size at position {position} is zero")));
        }

        let layers = layer_sizes.windows(2)
            .map(|pair| Layer::with_rng(pair[0], pair[1], activation, rng))
            .collect();

        debug!(?layer_sizes, ?activation, "constructed network");
        Ok(Network { layers })
    }

    /// Assembles a network from existing layers, checking that each layer
    /// consumes exactly what the previous one produces.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Network> {
        let network = Network { layers };
        network.validate()?;
        Ok(network)
    }

    /// Re-checks every layer's parameter shapes and the layer chain. Run before
    /// each evaluation since `layers_mut` hands out whole layers.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::Config("network must contain at least one layer".into()));
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        for pair in self.layers.windows(2) {
            if pair[1].input_size() != pair[0].size() {
                return Err(Error::shape("layer chain", pair[0].weights.shape(), pair[1].weights.shape()));
            }
        }
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to layer parameters; the number of layers is fixed.
    /// Reshaping a layer through this is caught by `validate` on the next pass.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    /// Input size followed by every layer's output size.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(Layer::size))
            .collect()
    }

    /// Forward trace: the input followed by the output of every layer.
    pub fn compute_outputs(&self, input: &Matrix) -> Result<Vec<Matrix>> {
        self.validate()?;
        let mut outputs = Vec::with_capacity(self.layers.len() + 1);
        outputs.push(input.clone());
        for layer in &self.layers {
            let next = layer.compute_output(&outputs[outputs.len() - 1])?;
            outputs.push(next);
        }
        Ok(outputs)
    }

    /// Network output alone.
    pub fn predict(&self, input: &Matrix) -> Result<Matrix> {
        let mut outputs = self.compute_outputs(input)?;
        Ok(outputs.pop().unwrap_or_default())
    }

    /// Mean squared error between the network output and `expectation`.
    pub fn compute_error(&self, input: &Matrix, expectation: &Matrix) -> Result<f64> {
        let output = self.predict(input)?;
        check_expectation(&output, expectation)?;
        Ok(MseLoss::loss(&output.to_vec(), &expectation.to_vec()))
    }

    /// Analytic gradients of `½·Σ(output − expectation)²` with respect to every
    /// parameter and to the input.
    pub fn back_prop(&self, input: &Matrix, expectation: &Matrix) -> Result<BackProp> {
        let outputs = self.compute_outputs(input)?;
        let last = self.layers.len() - 1;
        check_expectation(&outputs[last + 1], expectation)?;

        let output_layer = &self.layers[last];
        let derror_by_doutput = output_layer.output_layer_derror_by_doutput(expectation, &outputs)?;
        let mut derror_by_dactivation = output_layer
            .doutput_by_dactivation(&outputs[last + 1])
            .hadamard(&derror_by_doutput)?;

        let mut gradients = Vec::with_capacity(self.layers.len());
        gradients.push(layer_gradients(output_layer, &outputs[last], &derror_by_dactivation)?);

        for index in (0..last).rev() {
            let layer = &self.layers[index];
            // ∂E/∂output of this layer, pulled back through the next layer's weights.
            let derror_by_doutput = self.layers[index + 1].weights
                .transpose()
                .dot(&derror_by_dactivation)?;
            derror_by_dactivation = layer
                .doutput_by_dactivation(&outputs[index + 1])
                .hadamard(&derror_by_doutput)?;
            gradients.push(layer_gradients(layer, &outputs[index], &derror_by_dactivation)?);
        }
        gradients.reverse();

        let input_gradient = self.layers[0].weights.transpose().dot(&derror_by_dactivation)?;

        Ok(BackProp { input_gradient, gradients })
    }

    /// Gradients scaled by `learning_rate`, ready for `apply_weight_and_bias_deltas`.
    pub fn compute_weight_and_bias_deltas(
        &self,
        input: &Matrix,
        expectation: &Matrix,
        learning_rate: f64,
    ) -> Result<Vec<LayerGradients>> {
        let BackProp { gradients, .. } = self.back_prop(input, expectation)?;
        Ok(gradients.iter().map(|g| g.scaled(learning_rate)).collect())
    }

    /// Subtracts each delta from its layer. The whole bundle is validated
    /// first; on error no layer has been touched.
    pub fn apply_weight_and_bias_deltas(&mut self, deltas: &[LayerGradients]) -> Result<()> {
        if deltas.len() != self.layers.len() {
            return Err(Error::LayerCountMismatch { expected: self.layers.len(), actual: deltas.len() });
        }
        self.validate()?;
        for (layer, delta) in self.layers.iter().zip(deltas) {
            delta.weights.check_consistent("weight delta")?;
            delta.bias.check_consistent("bias delta")?;
            if delta.weights.shape() != layer.weights.shape() {
                return Err(Error::shape("weight delta", layer.weights.shape(), delta.weights.shape()));
            }
            if delta.bias.shape() != layer.bias.shape() {
                return Err(Error::shape("bias delta", layer.bias.shape(), delta.bias.shape()));
            }
        }

        for (layer, delta) in self.layers.iter_mut().zip(deltas) {
            layer.weights.sub_assign(&delta.weights)?;
            layer.bias.sub_assign(&delta.bias)?;
        }
        Ok(())
    }

    /// Writes every layer's weights and bias, layer 0 first, as a JSON archive.
    /// Non-finite parameters are rejected before the file is created.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let archive = self.archive()?;
        let file = File::create(path)?;
        archive.write_to(BufWriter::new(file))?;
        debug!(path = %path.display(), layers = self.layers.len(), "saved network parameters");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        self.archive()?.write_to(writer)
    }

    fn archive(&self) -> Result<ParameterArchive> {
        self.validate()?;
        let archive = ParameterArchive::from_layers(&self.layers);
        archive.check_finite()?;
        Ok(archive)
    }

    /// Replaces this network's layers with those stored at `path`.
    /// Leaves `self` untouched if the archive is unreadable or malformed.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let loaded = Network::load_from(path)?;
        self.layers = loaded.layers;
        Ok(())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let network = Network::read_from(BufReader::new(file))?;
        debug!(path = %path.display(), layer_sizes = ?network.layer_sizes(), "loaded network parameters");
        Ok(network)
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Network> {
        let layers = ParameterArchive::read_from(reader)?.into_layers(ActivationFunction::default())?;
        Network::from_layers(layers).map_err(|e| Error::Load(e.to_string()))
    }
}

fn check_expectation(output: &Matrix, expectation: &Matrix) -> Result<()> {
    expectation.check_consistent("expectation")?;
    if output.shape() != expectation.shape() {
        return Err(Error::shape("expectation", output.shape(), expectation.shape()));
    }
    Ok(())
}

fn layer_gradients(layer: &Layer, previous_layer_output: &Matrix, derror_by_dactivation: &Matrix) -> Result<LayerGradients> {
    let dactivation_by_dweight = layer.dactivation_by_dweight(previous_layer_output);
    let dactivation_by_dbias = layer.dactivation_by_dbias();

    Ok(LayerGradients {
        weights: derror_by_dactivation.dot(&dactivation_by_dweight)?,
        bias: derror_by_dactivation.hadamard(&dactivation_by_dbias)?,
    })
}
