//! Flowlet Core - Synchronous Flow Composition
//!
//! This crate defines the composition and failure-recovery machinery:
//! - `Flow`: the `In -> Out` transformation contract and `via` chaining
//! - `Source` / `Sink`: producer and consumer endpoints, `to` to drive a graph
//! - `Mixable`: sampling two producers into a binary function
//! - `resilience`: retry decorator with injected policies, recovery decorators
//!   and ordered `RecoverStrategy` rules
//! - `telemetry`: the `TraceSink` seam for timings and recovery warnings
//!
//! **IMPORTANT**: Everything runs to completion on the calling thread - no
//! I/O, no async, no scheduler.

pub mod error;
pub mod flow;
pub mod mix;
pub mod resilience;
pub mod sink;
pub mod source;
pub mod telemetry;

pub use error::{ConfigError, FlowError, FlowResult};
pub use flow::{
    BoxFlow, ByRef, Constant, Flow, FromFn, Identity, Named, Via, compose, constant, from_fn,
    identity, named, source,
};
pub use mix::{MixState, Mixable, Mixed, mix};
pub use resilience::{
    Callbacks, InputCallbacks, RecoverStrategy, Recovering, RecoveryHooks, RetryContext,
    RetryDecision, RetryPolicy, Retrying, TraceHooks,
};
pub use sink::{FnSink, Sink, ignore, sink};
pub use source::Source;
pub use telemetry::{NoopSink, RecordingSink, TraceEvent, TraceSink, TracingSink};

pub mod prelude {
    pub use crate::error::{ConfigError, FlowError, FlowResult};
    pub use crate::flow::{BoxFlow, Flow, compose, constant, from_fn, identity, named, source};
    pub use crate::mix::{Mixable, mix};
    pub use crate::resilience::{RecoverStrategy, RetryContext, RetryDecision, RetryPolicy};
    pub use crate::sink::{Sink, ignore, sink};
    pub use crate::source::Source;
    pub use crate::telemetry::{TraceSink, TracingSink};
}
