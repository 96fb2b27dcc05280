//! Error taxonomy for flows.
//!
//! Every flow returns `Result<Out, FlowError>`. Only [`FlowError::Failure`]
//! is transient: retry and recovery decorators intercept it, and let every
//! other variant propagate untouched.

use std::any::Any;
use thiserror::Error;

pub type FlowResult<T> = Result<T, FlowError>;

/// Invalid graph shapes, detected before any stage runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot sink a consumer into a consumer")]
    SinkIntoSink,
}

#[derive(Error, Debug)]
pub enum FlowError {
    /// Fatal misconfiguration. Never retried, never recovered.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A runtime failure raised by a stage.
    #[error(transparent)]
    Failure(#[from] anyhow::Error),

    /// No rule of a recover strategy accepted the failure.
    #[error("{message}")]
    NoMatchingRecovery {
        message: String,
        #[source]
        source: Box<FlowError>,
    },

    /// A mix slot was read before its producer delivered a value.
    #[error("slot `{0}` was never populated")]
    EmptySlot(&'static str),
}

impl FlowError {
    /// Wrap any error as a transient failure.
    pub fn failure<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FlowError::Failure(anyhow::Error::new(error))
    }

    /// Transient failure from a plain message.
    pub fn msg(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        FlowError::Failure(anyhow::Error::msg(message))
    }

    pub(crate) fn no_matching_recovery(original: FlowError) -> Self {
        FlowError::NoMatchingRecovery {
            message: format!("cannot find any matching recovery rule for: {original}"),
            source: Box::new(original),
        }
    }

    /// Whether retry and recovery decorators may intercept this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, FlowError::Failure(_))
    }

    /// The failure a recovery strategy could not handle.
    pub fn unrecovered(&self) -> Option<&FlowError> {
        match self {
            FlowError::NoMatchingRecovery { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, FlowError::Config(_))
    }

    /// Runtime instance-of test.
    ///
    /// `E = FlowError` matches every error. Otherwise the wrapped cause of a
    /// transient failure is inspected, then the recovery-exhaustion cause.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        if let Some(me) = (self as &dyn Any).downcast_ref::<E>() {
            return Some(me);
        }
        match self {
            FlowError::Failure(inner) => inner.downcast_ref::<E>(),
            FlowError::Config(inner) => (inner as &dyn Any).downcast_ref::<E>(),
            FlowError::NoMatchingRecovery { source, .. } => source.downcast_ref::<E>(),
            FlowError::EmptySlot(_) => None,
        }
    }

    pub fn is<E>(&self) -> bool
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        self.downcast_ref::<E>().is_some()
    }
}
