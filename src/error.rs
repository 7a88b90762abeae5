use std::fmt;

use thiserror::Error;

/// Which model call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vision,
    Copy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vision => f.write_str("Vision"),
            Stage::Copy => f.write_str("Copy generation"),
        }
    }
}

/// Failures reported by a [`crate::ai::completion::CompletionClient`].
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion endpoint returned {status}")]
    Status { status: u16, body: String },
    #[error("completion request failed: {0}")]
    Transport(String),
    #[error("completion body was not understood: {reason}")]
    InvalidBody { reason: String, raw: String },
    #[error("completion response had no message content")]
    MissingContent,
}

/// Model output that could not be read as the expected JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ParseFailure {
    pub reason: String,
    pub raw: String,
}

/// Everything that can stop a listing request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Configuration(String),
    #[error("{stage} API error: {status}")]
    Upstream {
        stage: Stage,
        status: u16,
        body: String,
    },
    #[error("{stage} API request failed: {message}")]
    Network { stage: Stage, message: String },
    #[error("{stage} response could not be parsed: {}", .failure.reason)]
    Parse { stage: Stage, failure: ParseFailure },
}

impl PipelineError {
    pub fn from_completion(stage: Stage, err: CompletionError) -> Self {
        match err {
            CompletionError::Status { status, body } => Self::Upstream {
                stage,
                status,
                body,
            },
            CompletionError::Transport(message) => Self::Network { stage, message },
            CompletionError::InvalidBody { reason, raw } => Self::Parse {
                stage,
                failure: ParseFailure { reason, raw },
            },
            CompletionError::MissingContent => Self::Parse {
                stage,
                failure: ParseFailure {
                    reason: "missing message content".to_string(),
                    raw: String::new(),
                },
            },
        }
    }

    pub fn parse(stage: Stage, failure: ParseFailure) -> Self {
        Self::Parse { stage, failure }
    }

    /// Client errors are the caller's fault; everything else is ours or
    /// the model provider's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short machine-readable label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Upstream { .. } => "upstream",
            Self::Network { .. } => "network",
            Self::Parse { .. } => "parse",
        }
    }
}
