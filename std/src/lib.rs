//! Flowlet Std - retry policies, configuration and ready-made nodes.
//!
//! - [`retry::Retry`]: a named, configurable policy for `Flow::with_retry`
//! - [`config::FlowletConfig`]: TOML-loaded retry and trace settings
//! - [`nodes`]: parsing, string and arithmetic steps, filters, logging
//! - [`sleeper`]: the wait strategy used between retries and by `DelayNode`

pub mod config;
pub mod nodes;
pub mod prelude;
pub mod retry;
pub mod sleeper;

pub use config::{Backoff, ConfigLoadError, ConfiguredSink, FlowletConfig, RetryConfig, TraceConfig};
pub use retry::{Retry, RetryAttempts};
pub use sleeper::{NoopSleeper, Sleeper, ThreadSleeper, TrackingSleeper};
