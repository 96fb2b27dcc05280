//! Subscriber setup for the `tracing` events Flowlet emits.
//!
//! Timing events are `info` on target `flowlet_core::telemetry`, recoveries
//! are `warn`, retry attempts are `debug` on `flowlet_std::retry`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,flowlet_core=debug";

fn filter(directive: Option<&str>) -> Result<EnvFilter, anyhow::Error> {
    match directive {
        Some(directive) => Ok(EnvFilter::try_new(directive)?),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Initialize a simple stdout tracing subscriber for development
pub fn init_stdout_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Like [`init_stdout_tracing`], with an optional filter directive
/// overriding `RUST_LOG`. Fails if a global subscriber is already set.
pub fn try_init_stdout_tracing(directive: Option<&str>) -> Result<(), anyhow::Error> {
    Registry::default()
        .with(filter(directive)?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

/// One JSON object per event, for log shippers.
pub fn init_json_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .init();
}

pub fn try_init_json_tracing(directive: Option<&str>) -> Result<(), anyhow::Error> {
    Registry::default()
        .with(filter(directive)?)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;
    Ok(())
}
