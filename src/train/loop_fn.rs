use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::sample::Sample;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{evaluate, train_network};

/// Trains `network` for up to `config.epochs` epochs and returns the mean
/// training error of the **last completed epoch**.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped,
/// - `config.stop_flag` is set to `true`, **or**
/// - the epoch's training error falls below `config.target_error`.
///
/// # Errors
/// Fails on an empty training set or on any sample whose shapes do not fit
/// the network; the network keeps the updates of all samples seen before.
/// An empty validation set is rejected before any update.
pub fn train_loop(
    network: &mut Network,
    train: &[Sample],
    validation: Option<&[Sample]>,
    config: &TrainConfig,
) -> Result<f64> {
    if validation.map_or(false, |samples| samples.is_empty()) {
        return Err(Error::Config("validation set must not be empty".into()));
    }

    let optimizer = Sgd::new(config.learning_rate);
    let mut last_train_error = 0.0;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            debug!(epoch, "stop flag set, ending training");
            break;
        }

        let t_start = Instant::now();
        let train_error = train_network(network, train, &optimizer)?;
        last_train_error = train_error;

        let val_error = match validation {
            Some(samples) => Some(evaluate(network, samples)?),
            None => None,
        };
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        if config.log_every > 0 && (epoch % config.log_every == 0 || epoch == 1) {
            info!(epoch, total = config.epochs, train_error, ?val_error, elapsed_ms, "epoch complete");
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_error,
            val_error,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!(epoch, "progress receiver dropped, ending training");
                break;
            }
        }

        if let Some(target) = config.target_error {
            if train_error < target {
                info!(epoch, train_error, target_error = target, "target error reached");
                break;
            }
        }
    }

    Ok(last_train_error)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
