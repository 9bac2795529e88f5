//! Error taxonomy for registration commands.

use thiserror::Error;

/// Errors surfaced by register, unregister and list operations.
///
/// Nothing is retried or rolled back: a failure mid-sequence (for example a
/// service that was created but never bound) is left for the operator.
#[derive(Error, Debug)]
pub enum RegistrarError {
    /// Wrong argument count or combination.
    #[error("{0}")]
    Usage(String),

    /// The request names a route or host the app cannot use.
    #[error("{0}")]
    Validation(String),

    /// A platform call failed.
    #[error("{operation} failed: {message}")]
    Platform { operation: String, message: String },

    /// A platform response body was not the JSON we expected.
    #[error("unable to parse {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistrarError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn platform(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Platform {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistrarError>;
