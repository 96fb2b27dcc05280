//! Consumers: flows with no meaningful output, used for their side effect
//! at the end of a graph.

use crate::error::FlowResult;
use crate::flow::Flow;
use std::borrow::Cow;

/// A flow into `()`.
pub trait Sink<In>: Flow<In, ()> {}

impl<In, F> Sink<In> for F where F: Flow<In, ()> {}

/// Wraps an infallible side effect as a [`Sink`].
#[derive(Clone, Copy)]
pub struct FnSink<F>(F);

impl<In, F> Flow<In, ()> for FnSink<F>
where
    F: Fn(In),
{
    fn apply(&self, input: In) -> FlowResult<()> {
        (self.0)(input);
        Ok(())
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("FnSink")
    }
}

pub fn sink<In, F>(f: F) -> FnSink<F>
where
    F: Fn(In),
{
    FnSink(f)
}

/// Discards its input.
pub fn ignore<In>() -> FnSink<fn(In)> {
    FnSink(drop::<In>)
}
