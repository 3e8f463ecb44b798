use serde::{Serialize, Deserialize};

/// Snapshot of one finished epoch, sent on `TrainConfig::progress_tx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// Counts from 1.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Average of the errors measured before each sample's update.
    pub train_error: f64,
    /// `None` when training ran without held-out samples.
    pub val_error: Option<f64>,
    pub elapsed_ms: u64,
}
