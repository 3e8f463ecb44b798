// Saving and loading layer parameters.

mod common;

use ferrite_backprop::{
    network::{archive::array_key, ParameterArchive},
    ActivationFunction, Error, Matrix, Network,
};
use rand::{rngs::StdRng, SeedableRng};
use tempfile::NamedTempFile;

fn random_network(sizes: &[usize], seed: u64) -> Network {
    Network::with_rng(sizes, ActivationFunction::Sigmoid, &mut StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
fn save_then_load_is_bit_exact() {
    let network = random_network(&[4, 7, 3, 2], 1);
    let file = NamedTempFile::new().unwrap();
    network.save(file.path()).unwrap();

    let mut restored = random_network(&[2, 2], 99);
    restored.load(file.path()).unwrap();

    assert_eq!(restored.layer_sizes(), vec![4, 7, 3, 2]);
    for (a, b) in network.layers().iter().zip(restored.layers()) {
        assert_eq!(a.weights.shape(), b.weights.shape());
        assert_eq!(a.bias.shape(), b.bias.shape());
        for (x, y) in a.weights.to_vec().iter().zip(b.weights.to_vec()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
        for (x, y) in a.bias.to_vec().iter().zip(b.bias.to_vec()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}

#[test]
fn loaded_network_produces_identical_outputs() {
    let network = random_network(&[3, 4, 2], 8);
    let mut buffer = Vec::new();
    network.write_to(&mut buffer).unwrap();
    let restored = Network::read_from(buffer.as_slice()).unwrap();

    let input = Matrix::column(&[0.25, -0.5, 0.75]);
    assert_eq!(
        network.compute_outputs(&input).unwrap(),
        restored.compute_outputs(&input).unwrap()
    );
}

#[test]
fn archive_lists_weights_then_bias_per_layer() {
    let network = random_network(&[3, 4, 2], 4);
    let mut buffer = Vec::new();
    network.write_to(&mut buffer).unwrap();

    let archive = ParameterArchive::read_from(buffer.as_slice()).unwrap();
    assert_eq!(archive.len(), 4);
    assert_eq!(archive.get(0), Some(&network.layers()[0].weights));
    assert_eq!(archive.get(1), Some(&network.layers()[0].bias));
    assert_eq!(archive.get(2), Some(&network.layers()[1].weights));
    assert_eq!(archive.get(3), Some(&network.layers()[1].bias));

    let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    for index in 0..4 {
        assert!(json.get(array_key(index)).is_some());
    }
}

#[test]
fn loaded_layers_use_default_activation() {
    let network = Network::with_activation(&[2, 3, 1], ActivationFunction::Tanh).unwrap();
    let mut buffer = Vec::new();
    network.write_to(&mut buffer).unwrap();

    let restored = Network::read_from(buffer.as_slice()).unwrap();
    assert!(restored.layers().iter().all(|layer| layer.activator == ActivationFunction::Sigmoid));
}

#[test]
fn odd_array_count_fails_and_keeps_previous_state() {
    let mut archive = ParameterArchive::from_layers(common::fixed_network().layers());
    archive.insert(4, Matrix::zeros(1, 2));
    let mut buffer = Vec::new();
    archive.write_to(&mut buffer).unwrap();
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), &buffer).unwrap();

    let mut network = random_network(&[3, 4, 2], 6);
    let before = network.clone();
    assert!(matches!(network.load(file.path()), Err(Error::Load(_))));
    assert_eq!(network, before);
}

#[test]
fn incompatible_layer_chain_fails_to_load() {
    let mut archive = ParameterArchive::default();
    archive.insert(0, Matrix::zeros(4, 3));
    archive.insert(1, Matrix::zeros(4, 1));
    archive.insert(2, Matrix::zeros(2, 5));
    archive.insert(3, Matrix::zeros(2, 1));
    let mut buffer = Vec::new();
    archive.write_to(&mut buffer).unwrap();

    assert!(matches!(Network::read_from(buffer.as_slice()), Err(Error::Load(_))));
}

#[test]
fn garbage_input_fails_and_keeps_previous_state() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"not an archive").unwrap();

    let mut network = common::fixed_network();
    assert!(matches!(network.load(file.path()), Err(Error::Json(_))));
    assert_eq!(network, common::fixed_network());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Network::load_from(dir.path().join("absent.json"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn non_finite_parameter_is_not_saved() {
    let mut network = common::fixed_network();
    network.layers_mut()[1].weights.data[0][2] = f64::NAN;

    let file = NamedTempFile::new().unwrap();
    match network.save(file.path()) {
        Err(Error::NonFinite { key, layer, row, col }) => {
            assert_eq!(key, "arr_2");
            assert_eq!(layer, 1);
            assert_eq!((row, col), (0, 2));
        }
        other => panic!("expected non-finite error, got {:?}", other),
    }
    assert_eq!(std::fs::read(file.path()).unwrap().len(), 0);

    let mut buffer = Vec::new();
    assert!(matches!(network.write_to(&mut buffer), Err(Error::NonFinite { .. })));
    assert!(buffer.is_empty());
}

#[test]
fn infinite_bias_is_reported_with_its_key() {
    let mut network = common::fixed_network();
    network.layers_mut()[0].bias.data[3][0] = f64::NEG_INFINITY;

    let mut buffer = Vec::new();
    let err = network.write_to(&mut buffer).unwrap_err();
    assert!(err.to_string().contains("arr_1"));
    assert!(err.to_string().contains("layer 0"));
}
