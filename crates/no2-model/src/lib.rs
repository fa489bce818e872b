//! Model artifact loading and inference for the NO₂ prediction service.
//!
//! The artifact is a tree ensemble exported to JSON. A random forest uses
//! [`Aggregation::Mean`]; boosted ensembles use [`Aggregation::Sum`] with a
//! `base_score`.

mod forest;
mod loader;

pub use forest::{Aggregation, Forest, Node, Tree};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading a model artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}
