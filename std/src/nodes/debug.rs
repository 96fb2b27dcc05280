use super::NodeError;
use flowlet_core::error::{FlowError, FlowResult};
use flowlet_core::flow::Flow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

/// Logs each value with `{message}: {value:?}` and passes it through.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LogNode<T> {
    pub message: String,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(skip)]
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> LogNode<T> {
    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            message: message.into(),
            level,
            _marker: PhantomData,
        }
    }
}

impl<T: Debug> Flow<T, T> for LogNode<T> {
    fn apply(&self, input: T) -> FlowResult<T> {
        match self.level {
            LogLevel::Error => tracing::error!("{}: {:?}", self.message, input),
            LogLevel::Warn => tracing::warn!("{}: {:?}", self.message, input),
            LogLevel::Debug => tracing::debug!("{}: {:?}", self.message, input),
            LogLevel::Info => tracing::info!("{}: {:?}", self.message, input),
        }
        Ok(input)
    }
}

/// Always fails with a transient [`NodeError::Raised`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorNode<In, Out> {
    pub error_message: String,
    #[serde(skip)]
    _marker: PhantomData<fn(In) -> Out>,
}

impl<In, Out> ErrorNode<In, Out> {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            _marker: PhantomData,
        }
    }
}

impl<In, Out> Flow<In, Out> for ErrorNode<In, Out> {
    fn apply(&self, _input: In) -> FlowResult<Out> {
        Err(FlowError::failure(NodeError::Raised(
            self.error_message.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_node_passes_through() {
        let log = LogNode::new("value", LogLevel::Debug);
        assert_eq!(log.apply(vec![1, 2]).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_log_level_defaults_to_info() {
        let log: LogNode<u8> = serde_json::from_str(r#"{"message":"m"}"#).unwrap();
        assert_eq!(log.level, LogLevel::Info);
    }

    #[test]
    fn test_error_node_always_fails() {
        let fail = ErrorNode::<(), String>::new("boom");
        let err = fail.apply(()).unwrap_err();
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.downcast_ref::<NodeError>(), Some(&NodeError::Raised("boom".into())));
    }
}
