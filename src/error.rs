use std::path::PathBuf;

/// Errors that can occur when turning sequences into a windowed dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("sequence {index} has {len} points, need at least {required} to split window and target")]
    InsufficientLength {
        index: usize,
        len: usize,
        required: usize,
    },
}

/// Errors that can occur when assembling sample batches for the predictor.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    #[error("cannot build tensors from an empty dataset")]
    Empty,

    #[error("input window {index} has {len} values, expected {expected}")]
    WindowMismatch {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("dataset has {inputs} input windows but {labels} labels")]
    LengthMismatch { inputs: usize, labels: usize },
}

/// Errors that can occur during a training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("no generated sequences available; generate data before training")]
    NoData,

    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("failed to create tensors: {0}")]
    TensorConstruction(#[from] TensorError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
