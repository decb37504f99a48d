// Failures a single tree's pipeline can report.
//
// A failed tree is abandoned; whatever was already presented on the
// canvas for earlier trees stays as it was.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    // More `]` than matching `[`; `index` is the offending symbol position.
    #[error("malformed axiom: branch close at symbol {index} has no matching open")]
    MalformedAxiom { index : usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
