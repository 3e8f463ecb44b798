//! Command-line front end: train a network from a JSON spec, run predictions
//! with a saved model, inspect a model file, or verify backprop gradients.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, Level};

use ferrite_backprop::{
    check_gradients, network::gradcheck, train::{evaluate, load_samples}, train_loop,
    ActivationFunction, Matrix, Network, NetworkSpec,
};

#[derive(Parser)]
#[command(name = "ferrite-backprop")]
#[command(about = "Feed-forward network training with hand-written backpropagation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network described by a JSON spec and save its parameters
    Train {
        /// Network spec (layer sizes, activation, training hyperparameters)
        #[arg(short, long)]
        spec: String,

        /// Training samples: JSON array of {"input": [...], "expected": [...]}
        #[arg(short, long)]
        data: String,

        /// Optional validation samples in the same format
        #[arg(long)]
        validation: Option<String>,

        /// Where to write the trained parameters
        #[arg(short, long)]
        out: String,
    },

    /// Run a saved model on one input vector
    Predict {
        #[arg(short, long)]
        model: String,

        /// Comma-separated input values
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        input: Vec<f64>,
    },

    /// Print the layer shapes of a saved model
    Inspect {
        #[arg(short, long)]
        model: String,
    },

    /// Compare backprop gradients against central differences on a random network
    Check {
        /// Comma-separated layer sizes, input size first
        #[arg(long, value_delimiter = ',', default_value = "3,4,2")]
        layers: Vec<usize>,

        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long, default_value_t = gradcheck::DEFAULT_EPSILON)]
        epsilon: f64,

        #[arg(long, default_value_t = gradcheck::DEFAULT_TOLERANCE)]
        tolerance: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level: Level = cli.log_level.parse()
        .with_context(|| format!("invalid log level {:?}", cli.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .init();

    match cli.command {
        Commands::Train { spec, data, validation, out } => train(&spec, &data, validation.as_deref(), &out),
        Commands::Predict { model, input } => predict(&model, &input),
        Commands::Inspect { model } => inspect(&model),
        Commands::Check { layers, seed, epsilon, tolerance } => check(&layers, seed, epsilon, tolerance),
    }
}

fn train(spec_path: &str, data_path: &str, validation_path: Option<&str>, out: &str) -> Result<()> {
    let spec = NetworkSpec::load_json(spec_path)
        .with_context(|| format!("reading network spec {spec_path}"))?;
    let samples = load_samples(data_path)
        .with_context(|| format!("reading training samples {data_path}"))?;
    let validation = match validation_path {
        Some(path) => Some(load_samples(path).with_context(|| format!("reading validation samples {path}"))?),
        None => None,
    };

    let mut network = spec.build()?;
    info!(name = %spec.name, layer_sizes = ?network.layer_sizes(), samples = samples.len(), "training");

    let final_error = train_loop(&mut network, &samples, validation.as_deref(), &spec.training)?;
    info!(final_error, "training finished");
    if let Some(validation) = &validation {
        info!(val_error = evaluate(&network, validation)?, "validation");
    }

    network.save(out).with_context(|| format!("writing model {out}"))?;
    info!(path = out, "model saved");
    Ok(())
}

fn predict(model: &str, input: &[f64]) -> Result<()> {
    let network = Network::load_from(model).with_context(|| format!("loading model {model}"))?;
    let output = network.predict(&Matrix::column(input))?;
    println!("{:?}", output.to_vec());
    Ok(())
}

fn inspect(model: &str) -> Result<()> {
    let network = Network::load_from(model).with_context(|| format!("loading model {model}"))?;
    println!("layer sizes: {:?}", network.layer_sizes());
    for (index, layer) in network.layers().iter().enumerate() {
        println!(
            "layer {index}: weights {}x{}, bias {}x{}",
            layer.weights.rows, layer.weights.cols, layer.bias.rows, layer.bias.cols
        );
    }
    Ok(())
}

fn check(layers: &[usize], seed: u64, epsilon: f64, tolerance: f64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let network = Network::with_rng(layers, ActivationFunction::Sigmoid, &mut rng)?;
    let input = Matrix::random_with(network.input_size(), 1, &mut rng);
    let expectation = Matrix::random_with(network.output_size(), 1, &mut rng).map(|x| (x + 1.0) / 2.0);

    let result = check_gradients(&network, &input, &expectation, epsilon)?;
    println!(
        "max |analytic - numerical|: weights {:.3e}, bias {:.3e}, input {:.3e}",
        result.max_weight_error, result.max_bias_error, result.max_input_error
    );
    if !result.passes(tolerance) {
        bail!("gradient check failed: {:.3e} exceeds tolerance {tolerance:.3e}", result.max_error());
    }
    println!("gradient check passed");
    Ok(())
}
