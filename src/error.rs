//! Error types for collider generation

use crate::bone::HumanBone;
use thiserror::Error;

/// Errors raised by a generation pass or while loading its inputs
#[derive(Error, Debug)]
pub enum ColliderError {
    /// The character is not a usable humanoid (e.g. no Hips)
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// No mesh source was selected, so nothing can drive the bounds
    #[error("no skinned mesh selected for sampling")]
    EmptySelection,

    /// A bone's computed collider size is not finite
    #[error("degenerate bounds for {role:?}")]
    DegenerateBounds { role: HumanBone },

    /// The pass was cancelled between mesh samples
    #[error("generation cancelled")]
    Cancelled,

    /// An override entry names neither a humanoid role nor a transform
    #[error("unknown bone reference: {0}")]
    UnknownBone(String),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed character or configuration document
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ColliderError {
    /// True for errors that abort a pass rather than skip a single bone
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ColliderError::DegenerateBounds { .. })
    }
}

pub type Result<T, E = ColliderError> = std::result::Result<T, E>;
