//! # Flowlet
//!
//! Compose `In -> Out` steps into pipelines that run to completion on the
//! calling thread, with retry, ordered recovery rules and two-input mixing.
//!
//! ```rust
//! use flowlet::prelude::*;
//!
//! let seen = std::cell::Cell::new(0.0);
//! source("123.5".to_string())
//!     .via(ParseNode::<f64>::new())
//!     .to(sink(|v: f64| seen.set(v)))
//!     .unwrap();
//! assert_eq!(seen.get(), 123.5);
//! ```
//!
//! Features: `std` (default) adds retry policies, configuration and nodes;
//! `observe` adds subscriber setup.

pub use flowlet_core::{error, flow, mix, resilience, sink, source, telemetry};
pub use flowlet_core::{FlowError, FlowResult};

#[cfg(feature = "std")]
pub use flowlet_std::{config, nodes, retry, sleeper};

#[cfg(feature = "observe")]
pub use flowlet_observe as observe;

/// Install a stdout subscriber using the `trace.filter` directive, if any.
/// Does nothing when tracing is disabled.
#[cfg(all(feature = "std", feature = "observe"))]
pub fn init_tracing(config: &flowlet_std::TraceConfig) -> Result<(), anyhow::Error> {
    if !config.enabled {
        return Ok(());
    }
    flowlet_observe::try_init_stdout_tracing(config.filter.as_deref())
}

pub mod prelude {
    pub use flowlet_core::prelude::*;

    #[cfg(feature = "std")]
    pub use flowlet_std::prelude::*;
}
