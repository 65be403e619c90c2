//! Error types for markguard.

use thiserror::Error;

/// Library error type.
///
/// A marker found in the staged changes is not an error: it is reported as
/// [`GuardResult::Blocked`](crate::guard::GuardResult::Blocked).
#[derive(Error, Debug)]
pub enum GuardError {
    /// The staged changes could not be computed.
    #[error("staged changes unavailable: {context}")]
    InputUnavailable {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("forbidden marker must not be empty")]
    EmptyMarker,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid pattern '{pattern}' for hook '{hook}': {source}")]
    InvalidPattern {
        hook: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("hook '{id}' could not be run: {reason}")]
    Hook { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuardError {
    /// Build an [`GuardError::InputUnavailable`] carrying the underlying cause.
    pub fn input_unavailable<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InputUnavailable {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<figment::Error> for GuardError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
