use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{
    activation::activation::ActivationFunction,
    error::{Error, Result},
    layers::dense::Layer,
    math::matrix::Matrix,
};

/// Flat, positionally keyed list of parameter arrays: `arr_0` holds layer 0's
/// weights, `arr_1` its bias, `arr_2` layer 1's weights, and so on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterArchive {
    arrays: BTreeMap<String, Matrix>,
}

pub fn array_key(index: usize) -> String {
    format!("arr_{index}")
}

impl ParameterArchive {
    pub fn from_layers(layers: &[Layer]) -> ParameterArchive {
        let arrays = layers.iter()
            .flat_map(|layer| [layer.weights.clone(), layer.bias.clone()])
            .enumerate()
            .map(|(index, array)| (array_key(index), array))
            .collect();
        ParameterArchive { arrays }
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Matrix> {
        self.arrays.get(&array_key(index))
    }

    pub fn insert(&mut self, index: usize, array: Matrix) {
        self.arrays.insert(array_key(index), array);
    }

    /// Rebuilds layers from (weights, bias) pairs. Every layer gets `activation`;
    /// the archive does not record one.
    pub fn into_layers(mut self, activation: ActivationFunction) -> Result<Vec<Layer>> {
        let count = self.arrays.len();
        if count == 0 || count % 2 != 0 {
            return Err(Error::Load(format!(
                "archive must hold a positive, even number of arrays, found {count}"
            )));
        }

        let mut layers = Vec::with_capacity(count / 2);
        for index in (0..count).step_by(2) {
            let weights = self.take(index)?;
            let bias = self.take(index + 1)?;
            let layer = Layer::from_parameters(weights, bias, activation)
                .map_err(|e| Error::Load(format!("layer {}: {e}", index / 2)))?;
            layers.push(layer);
        }

        // Anything left over was keyed with something other than arr_0..arr_{count-1}.
        if let Some(key) = self.arrays.keys().next() {
            return Err(Error::Load(format!("unexpected archive entry {key:?}")));
        }

        Ok(layers)
    }

    /// JSON has no encoding for NaN or infinity, so such values would not
    /// survive a save/load cycle.
    pub fn check_finite(&self) -> Result<()> {
        for index in 0..self.arrays.len() {
            let Some(array) = self.get(index) else { continue };
            for (row, values) in array.data.iter().enumerate() {
                if let Some(col) = values.iter().position(|value| !value.is_finite()) {
                    // Weights and bias of layer i sit at arr_{2i} and arr_{2i+1}.
                    return Err(Error::NonFinite { key: array_key(index), layer: index / 2, row, col });
                }
            }
        }
        Ok(())
    }

    /// Fails without writing anything if any value is non-finite.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        self.check_finite()?;
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<ParameterArchive> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn take(&mut self, index: usize) -> Result<Matrix> {
        let key = array_key(index);
        self.arrays.remove(&key)
            .ok_or_else(|| Error::Load(format!("missing archive entry {key}")))
    }
}
