// Forward evaluation: trace shapes, determinism, error value, and construction failures.

mod common;

use approx::assert_abs_diff_eq;
use ferrite_backprop::{ActivationFunction, Error, Layer, Matrix, Network};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn trace_has_input_plus_one_entry_per_layer() {
    let network = common::fixed_network();
    let outputs = network.compute_outputs(&common::fixed_input()).unwrap();

    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0].shape(), (3, 1));
    assert_eq!(outputs[1].shape(), (4, 1));
    assert_eq!(outputs[2].shape(), (2, 1));
    assert_eq!(outputs[0], common::fixed_input());
}

#[test]
fn trace_matches_hand_computed_activations() {
    let network = common::fixed_network();
    let outputs = network.compute_outputs(&common::fixed_input()).unwrap();

    let hidden = [0.7211151780228631, 0.16798161486607552, 0.700567142473973, 0.6456563062257954];
    for (actual, expected) in outputs[1].to_vec().iter().zip(hidden) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-12);
    }
    let output = [0.6844755152843262, 0.45547263620991835];
    for (actual, expected) in outputs[2].to_vec().iter().zip(output) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-12);
    }
}

#[test]
fn error_matches_hand_computed_value() {
    let network = common::fixed_network();
    let error = network.compute_error(&common::fixed_input(), &common::fixed_expectation()).unwrap();
    assert_abs_diff_eq!(error, 0.15350551139555207, epsilon = 1e-12);
}

#[test]
fn forward_pass_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(11);
    let network = Network::with_rng(&[5, 7, 3, 2], ActivationFunction::Sigmoid, &mut rng).unwrap();
    let input = Matrix::random_with(5, 1, &mut rng);

    let first = network.compute_outputs(&input).unwrap();
    let second = network.compute_outputs(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn seeded_construction_is_reproducible() {
    let a = Network::with_rng(&[3, 4, 2], ActivationFunction::Sigmoid, &mut StdRng::seed_from_u64(3)).unwrap();
    let b = Network::with_rng(&[3, 4, 2], ActivationFunction::Sigmoid, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn constructed_parameters_have_declared_shapes_and_range() {
    let network = Network::new(&[3, 4, 2]).unwrap();
    assert_eq!(network.layer_sizes(), vec![3, 4, 2]);
    assert_eq!(network.layers()[0].weights.shape(), (4, 3));
    assert_eq!(network.layers()[0].bias.shape(), (4, 1));
    assert_eq!(network.layers()[1].weights.shape(), (2, 4));
    assert_eq!(network.layers()[1].bias.shape(), (2, 1));

    for layer in network.layers() {
        let values = layer.weights.to_vec().into_iter().chain(layer.bias.to_vec());
        for value in values {
            assert!((-1.0..=1.0).contains(&value));
        }
    }
}

#[test]
fn wrong_input_length_is_a_shape_mismatch() {
    let network = common::fixed_network();
    let result = network.compute_outputs(&Matrix::column(&[1.0, 2.0]));
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn row_vector_input_is_rejected() {
    let network = common::fixed_network();
    let row = Matrix::from_data(vec![vec![0.5, -1.0, 2.0]]).unwrap();
    assert!(matches!(network.compute_outputs(&row), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn wrong_expectation_length_is_a_shape_mismatch() {
    let network = common::fixed_network();
    let result = network.compute_error(&common::fixed_input(), &Matrix::column(&[1.0, 0.0, 0.0]));
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn degenerate_layer_sizes_are_rejected() {
    assert!(matches!(Network::new(&[]), Err(Error::Config(_))));
    assert!(matches!(Network::new(&[3]), Err(Error::Config(_))));
    assert!(matches!(Network::new(&[3, 0, 2]), Err(Error::Config(_))));
}

#[test]
fn incompatible_layers_cannot_be_chained() {
    let layers = vec![
        Layer::new(3, 4, ActivationFunction::Sigmoid),
        Layer::new(5, 2, ActivationFunction::Sigmoid),
    ];
    assert!(matches!(Network::from_layers(layers), Err(Error::ShapeMismatch { .. })));
    assert!(matches!(Network::from_layers(vec![]), Err(Error::Config(_))));
}

#[test]
fn activation_choice_applies_to_every_layer() {
    let network = Network::with_activation(&[2, 3, 1], ActivationFunction::Tanh).unwrap();
    assert!(network.layers().iter().all(|layer| layer.activator == ActivationFunction::Tanh));
}

#[test]
fn input_with_missing_rows_is_a_shape_mismatch() {
    let network = common::fixed_network();
    let malformed = Matrix { rows: 3, cols: 1, data: vec![vec![1.0]] };
    assert!(matches!(network.compute_outputs(&malformed), Err(Error::ShapeMismatch { .. })));
    assert!(matches!(network.back_prop(&malformed, &common::fixed_expectation()), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn cleared_weight_data_is_caught_before_evaluation() {
    let mut network = common::fixed_network();
    network.layers_mut()[0].weights.data.clear();

    let result = network.compute_outputs(&common::fixed_input());
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    let result = network.back_prop(&common::fixed_input(), &common::fixed_expectation());
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn resized_layer_breaks_the_chain() {
    let mut network = common::fixed_network();
    network.layers_mut()[0].weights = Matrix::zeros(5, 3);
    network.layers_mut()[0].bias = Matrix::zeros(5, 1);

    assert!(matches!(network.validate(), Err(Error::ShapeMismatch { .. })));
    assert!(matches!(network.compute_outputs(&common::fixed_input()), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn ragged_delta_leaves_parameters_untouched() {
    let mut network = common::fixed_network();
    let mut deltas = network
        .compute_weight_and_bias_deltas(&common::fixed_input(), &common::fixed_expectation(), 0.1)
        .unwrap();
    deltas[1].weights.data[1].pop();

    let result = network.apply_weight_and_bias_deltas(&deltas);
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    assert_eq!(network, common::fixed_network());
}
