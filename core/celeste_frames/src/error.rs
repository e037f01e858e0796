use std::fmt;
use thiserror::Error;

/// Which end of a requested transformation could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSide {
    Origin,
    Destination,
}

impl fmt::Display for FrameSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameSide::Origin => write!(f, "origin"),
            FrameSide::Destination => write!(f, "destination"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FrameGraphError {
    #[error("No attached frame matches the {side} selector; did you forget to attach it to the frame graph?")]
    FrameNotFound { side: FrameSide },

    #[error("No reference frame transformation path exists between frame '{from}' and '{to}'")]
    NoTransformPath { from: String, to: String },

    #[error("Operation '{operation}' is not supported by transform factory '{factory}'")]
    UnsupportedTransformOperation {
        operation: &'static str,
        factory: String,
    },

    #[error("Invalid frame graph configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Syntax error in frame graph configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("Failed to write frame graph configuration: {0}")]
    ConfigSerialize(#[from] ron::Error),

    #[error("Failed to read frame graph configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameGraphError {
    /// The frame graph never changes between two identical requests, so no
    /// error produced by it can succeed on a plain retry.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// True for the two resolution failures (unknown frame, missing path).
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            FrameGraphError::FrameNotFound { .. } | FrameGraphError::NoTransformPath { .. }
        )
    }
}

pub type FrameResult<T> = Result<T, FrameGraphError>;
