//! # Telemetry: Trace Sinks
//!
//! Composition, mixing and recovery report what they observe to a
//! [`TraceSink`] instead of a process-wide logger. The default sink,
//! [`TracingSink`], forwards everything to `tracing`.

use crate::error::FlowError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Observer for timing and recovery events.
pub trait TraceSink {
    /// One composed (or mixed) call finished after `elapsed`.
    fn elapsed(&self, component: &str, elapsed: Duration);

    /// A failure is about to be handed to a recovery function.
    fn recovering(&self, component: &str, error: &FlowError);
}

impl<S: TraceSink + ?Sized> TraceSink for &S {
    fn elapsed(&self, component: &str, elapsed: Duration) {
        (**self).elapsed(component, elapsed)
    }

    fn recovering(&self, component: &str, error: &FlowError) {
        (**self).recovering(component, error)
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Arc<S> {
    fn elapsed(&self, component: &str, elapsed: Duration) {
        (**self).elapsed(component, elapsed)
    }

    fn recovering(&self, component: &str, error: &FlowError) {
        (**self).recovering(component, error)
    }
}

/// Emits `info` events for timings and `warn` events for recoveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn elapsed(&self, component: &str, elapsed: Duration) {
        tracing::info!(
            flowlet.component = %component,
            elapsed_ms = elapsed.as_millis() as u64,
            "{} time consumed {}ms",
            component,
            elapsed.as_millis()
        );
    }

    fn recovering(&self, component: &str, error: &FlowError) {
        tracing::warn!(
            flowlet.component = %component,
            error = %error,
            "Recover since failure occurred in flow"
        );
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn elapsed(&self, _component: &str, _elapsed: Duration) {}

    fn recovering(&self, _component: &str, _error: &FlowError) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    Elapsed { component: String, elapsed_ms: u64 },
    Recovering { component: String, error: String },
}

impl TraceEvent {
    pub fn component(&self) -> &str {
        match self {
            TraceEvent::Elapsed { component, .. } | TraceEvent::Recovering { component, .. } => {
                component
            }
        }
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().clone()
    }

    pub fn elapsed_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, TraceEvent::Elapsed { .. }))
            .count()
    }

    pub fn recovering_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, TraceEvent::Recovering { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.events()).unwrap_or(serde_json::Value::Null)
    }
}

impl TraceSink for RecordingSink {
    fn elapsed(&self, component: &str, elapsed: Duration) {
        self.events.lock().push(TraceEvent::Elapsed {
            component: component.to_string(),
            elapsed_ms: elapsed.as_millis() as u64,
        });
    }

    fn recovering(&self, component: &str, error: &FlowError) {
        self.events.lock().push(TraceEvent::Recovering {
            component: component.to_string(),
            error: error.to_string(),
        });
    }
}
