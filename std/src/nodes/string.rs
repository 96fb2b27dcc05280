use flowlet_core::error::{FlowError, FlowResult};
use flowlet_core::flow::Flow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::marker::PhantomData;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StringOperation {
    Append(String),
    Prepend(String),
    ToUpper,
    ToLower,
    Trim,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StringNode {
    pub operation: StringOperation,
}

impl StringNode {
    pub fn new(operation: StringOperation) -> Self {
        Self { operation }
    }
}

impl Flow<String, String> for StringNode {
    fn apply(&self, input: String) -> FlowResult<String> {
        Ok(match &self.operation {
            StringOperation::Append(s) => format!("{input}{s}"),
            StringOperation::Prepend(s) => format!("{s}{input}"),
            StringOperation::ToUpper => input.to_uppercase(),
            StringOperation::ToLower => input.to_lowercase(),
            StringOperation::Trim => input.trim().to_string(),
        })
    }
}

/// Parses text with [`FromStr`]; parse errors become transient failures
/// that recovery rules can match by their concrete type.
#[derive(Debug, Clone, Copy)]
pub struct ParseNode<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ParseNode<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ParseNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Flow<String, T> for ParseNode<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    fn apply(&self, input: String) -> FlowResult<T> {
        input.trim().parse::<T>().map_err(FlowError::failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::{ParseFloatError, ParseIntError};

    #[test]
    fn test_string_operations() {
        let input = || "  Flow ".to_string();
        assert_eq!(
            StringNode::new(StringOperation::Append("!".into())).apply("a".into()).unwrap(),
            "a!"
        );
        assert_eq!(
            StringNode::new(StringOperation::Prepend(">".into())).apply("a".into()).unwrap(),
            ">a"
        );
        assert_eq!(StringNode::new(StringOperation::Trim).apply(input()).unwrap(), "Flow");
        assert_eq!(
            StringNode::new(StringOperation::ToUpper).apply(input()).unwrap(),
            "  FLOW "
        );
    }

    #[test]
    fn test_parse_node_keeps_parse_error_type() {
        let parse = ParseNode::<f64>::new();
        assert_eq!(parse.apply("123456.654321".into()).unwrap(), 123456.654321);

        let err = parse.apply("abc".into()).unwrap_err();
        assert!(err.is_transient());
        assert!(err.is::<ParseFloatError>());
        assert!(!err.is::<ParseIntError>());
    }

    #[test]
    fn test_string_operation_from_toml() {
        #[derive(Deserialize)]
        struct Step {
            operation: StringOperation,
        }
        let step: Step = toml::from_str("operation = { append = \"-x\" }").unwrap();
        assert_eq!(step.operation, StringOperation::Append("-x".into()));
    }
}
