//! Producers: flows that pull no upstream input, and the `to` operator
//! that drives a graph to completion.

use crate::error::{ConfigError, FlowResult};
use crate::flow::{Flow, Via, is_unit};
use crate::sink::Sink;
use crate::telemetry::{TraceSink, TracingSink};

/// A flow from `()`.
pub trait Source<Out>: Flow<(), Out> {
    /// Drive this producer into `sink`.
    ///
    /// Equivalent to `self.via(sink).apply(())`. Sinking a consumer (a
    /// source of `()`) into another consumer is rejected before anything
    /// runs.
    fn to<S>(&self, sink: S) -> FlowResult<()>
    where
        Self: Sized,
        S: Sink<Out>,
    {
        self.to_traced(sink, TracingSink)
    }

    /// [`Source::to`] reporting timing to the given trace sink.
    fn to_traced<S, T>(&self, sink: S, trace: T) -> FlowResult<()>
    where
        Self: Sized,
        S: Sink<Out>,
        T: TraceSink,
    {
        if is_unit::<Out>() {
            return Err(ConfigError::SinkIntoSink.into());
        }
        Via::new(self.by_ref(), sink, trace).apply(())
    }
}

impl<Out, F> Source<Out> for F where F: Flow<(), Out> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, FlowError};
    use crate::flow::source;
    use crate::sink::{ignore, sink};
    use crate::telemetry::RecordingSink;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_to_drives_value_into_sink() {
        let seen = RefCell::new(None);
        source(42u32)
            .to(sink(|v: u32| *seen.borrow_mut() = Some(v)))
            .unwrap();
        assert_eq!(*seen.borrow(), Some(42));
    }

    #[test]
    fn test_to_records_one_timing_event() {
        let trace = RecordingSink::new();
        source("x").to_traced(ignore(), trace.clone()).unwrap();
        assert_eq!(trace.elapsed_count(), 1);
        assert_eq!(trace.events()[0].component(), "Constant");
    }

    #[test]
    fn test_sink_into_sink_fails_fast() {
        let ran = Cell::new(false);
        let consumer = |_: ()| -> FlowResult<()> {
            ran.set(true);
            Ok(())
        };
        let err = consumer.to(ignore()).unwrap_err();
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "configuration error: cannot sink a consumer into a consumer"
        );
        assert!(!ran.get());
    }

    #[test]
    fn test_compose_sink_into_sink_fails_fast() {
        let ran = Cell::new(false);
        let consumer = sink(|_: u8| ran.set(true));
        let err = consumer
            .via(sink(|_: ()| ran.set(true)))
            .apply(1)
            .unwrap_err();
        assert!(matches!(err, FlowError::Config(ConfigError::SinkIntoSink)));
        assert!(!ran.get());
    }

    #[test]
    fn test_drives_borrowed_values() {
        let owned = String::from("borrowed");
        let seen = RefCell::new(String::new());
        source(owned.as_str())
            .to(sink(|s: &str| seen.borrow_mut().push_str(s)))
            .unwrap();
        assert_eq!(*seen.borrow(), "borrowed");
    }

    #[test]
    fn test_producer_failure_skips_sink() {
        let reached = Cell::new(false);
        let failing = |_: ()| -> FlowResult<u8> { Err(FlowError::msg("empty")) };
        let err = failing
            .to(sink(|_: u8| reached.set(true)))
            .unwrap_err();
        assert_eq!(err.to_string(), "empty");
        assert!(!reached.get());
    }
}
