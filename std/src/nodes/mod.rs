//! Reusable flows for common pipeline steps.

pub mod debug;
pub mod flow;
pub mod logic;
pub mod math;
pub mod string;

use thiserror::Error;

/// Failures raised by the standard nodes. Always wrapped as transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("{node} rejected its input")]
    Rejected { node: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0}")]
    Raised(String),
}
