use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::math::matrix::Matrix;

/// One supervised training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, expected: Vec<f64>) -> Sample {
        Sample { input, expected }
    }

    pub fn input_column(&self) -> Matrix {
        Matrix::column(&self.input)
    }

    pub fn expected_column(&self) -> Matrix {
        Matrix::column(&self.expected)
    }
}

/// Reads a JSON array of `{"input": [...], "expected": [...]}` objects.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
