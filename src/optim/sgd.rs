use crate::{error::Result, math::matrix::Matrix, network::network::Network};

/// Plain gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one gradient-descent update for a single example.
    pub fn step(&self, network: &mut Network, input: &Matrix, expectation: &Matrix) -> Result<()> {
        let deltas = network.compute_weight_and_bias_deltas(input, expectation, self.learning_rate)?;
        network.apply_weight_and_bias_deltas(&deltas)
    }
}
