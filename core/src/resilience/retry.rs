//! # Retry Decorator
//!
//! [`Retrying`] re-executes a flow until its [`RetryPolicy`] is satisfied.
//! The decorator holds no bookkeeping of its own: attempt counting, backoff
//! and result acceptance all live in the per-invocation [`RetryContext`].
//!
//! Per invocation:
//!
//! ```text
//! Executing ──Ok(v), accepted──────────────▶ Success(v)
//!     ▲  │
//!     │  ├─Ok(v), rejected─────────────────┐
//!     │  ├─Err(transient), Continue────────┤
//!     └──┴─────────────────────────────────┘
//!        └─Err(transient), Exhausted──────▶ TerminalFailure(err)
//! ```
//!
//! Non-transient errors (configuration, recovery exhaustion) are returned
//! immediately without consulting the policy.

use crate::error::{FlowError, FlowResult};
use crate::flow::Flow;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Run the wrapped flow again.
    Continue,
    /// Give up and surface the last failure.
    Exhausted,
}

/// Per-invocation retry state. Created by [`RetryPolicy::context`] and
/// dropped when the decorated call returns.
pub trait RetryContext<Out> {
    /// `true` if `value` is unacceptable and another attempt should be made.
    ///
    /// A policy that has run out of attempts returns `false`, handing the
    /// rejected value back to the caller.
    fn should_retry_result(&mut self, value: &Out) -> bool;

    /// Record a failed attempt. May block for backoff before returning.
    fn on_failure(&mut self, error: &FlowError) -> RetryDecision;

    /// Called once when an accepted value is about to be returned.
    fn on_success(&mut self) {}
}

/// Factory of retry contexts.
pub trait RetryPolicy<Out> {
    type Context: RetryContext<Out>;

    fn context(&self) -> Self::Context;
}

impl<Out, C, F> RetryPolicy<Out> for F
where
    F: Fn() -> C,
    C: RetryContext<Out>,
{
    type Context = C;

    fn context(&self) -> C {
        self()
    }
}

/// A flow decorated with a retry policy. See [`Flow::with_retry`].
#[derive(Clone)]
pub struct Retrying<F, P> {
    inner: F,
    policy: P,
}

impl<F, P> Retrying<F, P> {
    pub fn new(inner: F, policy: P) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<In, Out, F, P> Flow<In, Out> for Retrying<F, P>
where
    In: Clone,
    F: Flow<In, Out>,
    P: RetryPolicy<Out>,
{
    fn apply(&self, input: In) -> FlowResult<Out> {
        let mut context = self.policy.context();
        loop {
            match self.inner.apply(input.clone()) {
                Ok(value) => {
                    if !context.should_retry_result(&value) {
                        context.on_success();
                        return Ok(value);
                    }
                }
                Err(error) if error.is_transient() => {
                    if context.on_failure(&error) == RetryDecision::Exhausted {
                        return Err(error);
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn name(&self) -> Cow<'_, str> {
        self.inner.name()
    }
}
