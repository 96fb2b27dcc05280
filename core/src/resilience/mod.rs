//! Resilience decorators: retry on failure or rejected results, and
//! recovery through fallback flows.

pub mod recover;
pub mod retry;

pub use recover::{Callbacks, InputCallbacks, RecoverStrategy, Recovering, RecoveryHooks, TraceHooks};
pub use retry::{RetryContext, RetryDecision, RetryPolicy, Retrying};
