// Shared fixtures for the integration tests.
#![allow(dead_code)]

use ferrite_backprop::{ActivationFunction, Layer, Matrix, Network};

// A [3, 4, 2] sigmoid network with hand-picked parameters.
pub fn fixed_network() -> Network {
    let w1 = Matrix::from_data(vec![
        vec![0.1, -0.2, 0.3],
        vec![0.4, 0.5, -0.6],
        vec![-0.7, 0.8, 0.9],
        vec![0.2, -0.3, 0.1],
    ]).unwrap();
    let b1 = Matrix::column(&[0.1, -0.1, 0.2, 0.0]);
    let w2 = Matrix::from_data(vec![
        vec![0.3, -0.5, 0.2, 0.7],
        vec![-0.4, 0.6, -0.1, 0.2],
    ]).unwrap();
    let b2 = Matrix::column(&[0.05, -0.05]);

    Network::from_layers(vec![
        Layer::from_parameters(w1, b1, ActivationFunction::Sigmoid).unwrap(),
        Layer::from_parameters(w2, b2, ActivationFunction::Sigmoid).unwrap(),
    ]).unwrap()
}

pub fn fixed_input() -> Matrix {
    Matrix::column(&[0.5, -1.0, 2.0])
}

pub fn fixed_expectation() -> Matrix {
    Matrix::column(&[1.0, 0.0])
}
