use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::network::network::Network;
use crate::train::train_config::TrainConfig;

/// A fully serializable description of a network architecture plus the
/// hyperparameters used to train it.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of the
/// trained weights, making it possible to store architecture configurations
/// before training starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    /// Input size followed by each layer's output size.
    pub layer_sizes: Vec<usize>,
    /// Activation shared by every layer.
    #[serde(default)]
    pub activation: ActivationFunction,
    #[serde(default)]
    pub training: TrainConfig,
}

impl NetworkSpec {
    /// Freshly initialised network with this architecture.
    pub fn build(&self) -> Result<Network> {
        Network::with_activation(&self.layer_sizes, self.activation)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
