use super::NodeError;
use flowlet_core::error::{FlowError, FlowResult};
use flowlet_core::flow::Flow;
use num_traits::Num;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MathOperation {
    Add,
    Sub,
    Mul,
    Div,
}

/// `input <op> operand`. Dividing by zero fails instead of panicking.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MathNode<T> {
    pub operation: MathOperation,
    pub operand: T,
}

impl<T> MathNode<T> {
    pub fn new(operation: MathOperation, operand: T) -> Self {
        Self { operation, operand }
    }
}

impl<T> Flow<T, T> for MathNode<T>
where
    T: Num + Clone,
{
    fn apply(&self, input: T) -> FlowResult<T> {
        let operand = self.operand.clone();
        Ok(match self.operation {
            MathOperation::Add => input + operand,
            MathOperation::Sub => input - operand,
            MathOperation::Mul => input * operand,
            MathOperation::Div => {
                if operand.is_zero() {
                    return Err(FlowError::failure(NodeError::DivisionByZero));
                }
                input / operand
            }
        })
    }
}
