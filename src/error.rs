use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("image {} has too many colors to be analyzed (more than {limit})", path.display())]
    TooManyColors { path: PathBuf, limit: usize },

    #[error("image {} has no pixels", path.display())]
    EmptyImage { path: PathBuf },

    #[error("no frames in PNG {}", path.display())]
    NoFrames { path: PathBuf },

    #[error("max_colors must be between 1 and 256, got {0}")]
    InvalidMaxColors(usize),

    #[error("quantization failed: {0:?}")]
    Quantize(imagequant::Error),

    #[error("cannot derive a C identifier from {0:?}")]
    InvalidName(String),
}
