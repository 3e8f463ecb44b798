use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Operand shapes are incompatible for the named operation.
    #[error("shape mismatch in {operation}: {left:?} vs {right:?}")]
    ShapeMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A per-layer bundle does not line up with the network's layers.
    #[error("expected {expected} layer entries, got {actual}")]
    LayerCountMismatch { expected: usize, actual: usize },

    #[error("invalid network configuration: {0}")]
    Config(String),

    #[error("failed to load parameters: {0}")]
    Load(String),

    /// NaN or infinity in a parameter array; JSON cannot carry it.
    #[error("cannot persist non-finite value in {key} (layer {layer}) at ({row}, {col})")]
    NonFinite { key: String, layer: usize, row: usize, col: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn shape(
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Error {
        Error::ShapeMismatch { operation, left, right }
    }
}
