use crate::{
    error::{Error, Result},
    network::network::Network,
    optim::sgd::Sgd,
    train::sample::Sample,
};

/// One online pass: a gradient-descent update per sample, in order.
/// Returns the mean error measured just before each sample's update.
pub fn train_network(
    network: &mut Network,
    samples: &[Sample],
    optimizer: &Sgd,
) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::Config("training set must not be empty".into()));
    }

    let mut total_error = 0.0;

    for sample in samples {
        let input = sample.input_column();
        let expected = sample.expected_column();

        total_error += network.compute_error(&input, &expected)?;
        optimizer.step(network, &input, &expected)?;
    }

    Ok(total_error / samples.len() as f64)
}

/// Mean error over `samples` without touching the parameters.
pub fn evaluate(network: &Network, samples: &[Sample]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::Config("evaluation set must not be empty".into()));
    }
    let mut total = 0.0;
    for sample in samples {
        total += network.compute_error(&sample.input_column(), &sample.expected_column())?;
    }
    Ok(total / samples.len() as f64)
}
