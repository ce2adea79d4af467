//! Error types for match configuration and proof export/verification.

use thiserror::Error;

/// Why a serialized proof could not be re-fingerprinted.
#[derive(Debug, Error)]
pub enum ProofError {
    /// Input is not JSON at all (syntax error or truncated text).
    #[error("proof is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Valid JSON, but not the `{meta, events}` shape.
    #[error("proof does not have the expected shape: {0}")]
    Shape(#[source] serde_json::Error),

    /// The document could not be written back out.
    #[error("failed to encode proof: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProofError {
    /// Sort a `serde_json` failure into parse vs shape.
    pub fn from_json(err: serde_json::Error) -> Self {
        if err.is_data() {
            Self::Shape(err)
        } else {
            Self::Parse(err)
        }
    }
}

/// A match config that would break determinism or termination.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The clock would never yield a step, so the tick cap is never reached.
    #[error("step_seconds must be finite and positive, got {0}")]
    StepSeconds(f64),

    #[error("entity_half_size must be finite and non-negative, got {0}")]
    EntityHalfSize(f64),

    #[error("playfield_half_extent must be finite and non-negative, got {0}")]
    PlayfieldHalfExtent(f64),

    #[error("resource_ratio must be finite, got {0}")]
    ResourceRatio(f64),
}
