//! # Flow: Typed Transformation Contract
//!
//! A `Flow<In, Out>` is a synchronous, single-input/single-output mapping.
//! Flows are composed with [`Flow::via`], decorated with retry and recovery,
//! and driven to completion with [`Source::to`](crate::source::Source::to).
//!
//! Any `Fn(In) -> FlowResult<Out>` closure is a flow. Building a composed
//! flow never runs either side; work happens only when `apply` is called.
//!
//! ```rust
//! use flowlet_core::prelude::*;
//!
//! let parse = |s: String| s.parse::<f64>().map_err(FlowError::failure);
//! let doubled = source("21".to_string())
//!     .via(parse)
//!     .via(from_fn(|x: f64| x * 2.0));
//!
//! assert_eq!(doubled.apply(()).unwrap(), 42.0);
//! ```

use crate::error::{ConfigError, FlowError, FlowResult};
use crate::resilience::recover::{Callbacks, InputCallbacks, Recovering, TraceHooks};
use crate::resilience::retry::{RetryPolicy, Retrying};
use crate::telemetry::{TraceSink, TracingSink};
use std::any::type_name;
use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

/// Readable type name: generics and module path stripped.
pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// True for the unit type. Works for borrowed types, unlike `TypeId`.
pub(crate) fn is_unit<T: ?Sized>() -> bool {
    type_name::<T>() == type_name::<()>()
}

/// The core transformation contract.
pub trait Flow<In, Out> {
    /// Run the transformation.
    fn apply(&self, input: In) -> FlowResult<Out>;

    /// Component name used in trace events.
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(short_type_name::<Self>())
    }

    /// Chain `next` after this flow.
    ///
    /// Each call of the composed flow is timed as a whole and reported to
    /// [`TracingSink`] under this flow's name.
    fn via<Next, B>(self, next: B) -> Via<Self, B, Out>
    where
        Self: Sized,
        B: Flow<Out, Next>,
    {
        Via::new(self, next, TracingSink)
    }

    /// Like [`Flow::via`], reporting to the given sink.
    fn via_traced<Next, B, S>(self, next: B, sink: S) -> Via<Self, B, Out, S>
    where
        Self: Sized,
        B: Flow<Out, Next>,
        S: TraceSink,
    {
        Via::new(self, next, sink)
    }

    /// Override the component name.
    fn named(self, label: impl Into<String>) -> Named<Self>
    where
        Self: Sized,
    {
        Named {
            inner: self,
            label: label.into(),
        }
    }

    /// Re-run this flow while `policy` says so.
    fn with_retry<P>(self, policy: P) -> Retrying<Self, P>
    where
        Self: Sized,
        In: Clone,
        P: RetryPolicy<Out>,
    {
        Retrying::new(self, policy)
    }

    /// On a transient failure, log a warning and re-drive the original
    /// input through the flow returned by `recover`.
    fn with_recover<R, G>(self, recover: R) -> Recovering<Self, TraceHooks<TracingSink>, R, G>
    where
        Self: Sized,
        In: Clone,
        R: Fn(FlowError) -> FlowResult<G>,
        G: Flow<In, Out>,
    {
        Recovering::new(self, TraceHooks::new(TracingSink), recover)
    }

    /// [`Flow::with_recover`] reporting the warning to the given sink.
    fn with_recover_traced<R, G, S>(
        self,
        recover: R,
        sink: S,
    ) -> Recovering<Self, TraceHooks<S>, R, G>
    where
        Self: Sized,
        In: Clone,
        R: Fn(FlowError) -> FlowResult<G>,
        G: Flow<In, Out>,
        S: TraceSink,
    {
        Recovering::new(self, TraceHooks::new(sink), recover)
    }

    /// Recover like [`Flow::with_recover`], calling `on_success` with the
    /// output or `on_failure` with the error before recovering.
    fn try_recover<A, B, R, G>(
        self,
        on_success: A,
        on_failure: B,
        recover: R,
    ) -> Recovering<Self, Callbacks<A, B>, R, G>
    where
        Self: Sized,
        In: Clone,
        A: Fn(&Out),
        B: Fn(&FlowError),
        R: Fn(FlowError) -> FlowResult<G>,
        G: Flow<In, Out>,
    {
        Recovering::new(self, Callbacks::new(on_success, on_failure), recover)
    }

    /// [`Flow::try_recover`] with a success hook that also sees the input.
    fn try_recover_with_input<A, B, R, G>(
        self,
        on_success: A,
        on_failure: B,
        recover: R,
    ) -> Recovering<Self, InputCallbacks<A, B>, R, G>
    where
        Self: Sized,
        In: Clone,
        A: Fn(&In, &Out),
        B: Fn(&FlowError),
        R: Fn(FlowError) -> FlowResult<G>,
        G: Flow<In, Out>,
    {
        Recovering::new(self, InputCallbacks::new(on_success, on_failure), recover)
    }

    /// Borrow this flow as a flow.
    fn by_ref(&self) -> ByRef<'_, Self>
    where
        Self: Sized,
    {
        ByRef(self)
    }

    /// Type-erase this flow behind a shared pointer.
    fn boxed(self) -> BoxFlow<In, Out>
    where
        Self: Sized + Send + Sync + 'static,
    {
        BoxFlow(Arc::new(self))
    }
}

impl<In, Out, F> Flow<In, Out> for F
where
    F: Fn(In) -> FlowResult<Out>,
{
    fn apply(&self, input: In) -> FlowResult<Out> {
        self(input)
    }
}

/// Compose two flows: `second(first(x))`.
pub fn compose<In, Mid, Out, A, B>(first: A, second: B) -> Via<A, B, Mid>
where
    A: Flow<In, Mid>,
    B: Flow<Mid, Out>,
{
    Via::new(first, second, TracingSink)
}

/// Two flows chained together.
///
/// The intermediate type `Mid` is captured in the struct itself
/// to satisfy Rust's type parameter constraints.
///
/// Chaining a consumer (`Mid = ()`) into another consumer (`Out = ()`)
/// fails with [`ConfigError::SinkIntoSink`] before either side runs.
pub struct Via<A, B, Mid, S = TracingSink> {
    first: A,
    second: B,
    sink: S,
    _mid: PhantomData<fn() -> Mid>,
}

impl<A, B, Mid, S> Via<A, B, Mid, S> {
    pub fn new(first: A, second: B, sink: S) -> Self {
        Via {
            first,
            second,
            sink,
            _mid: PhantomData,
        }
    }
}

impl<A: Clone, B: Clone, Mid, S: Clone> Clone for Via<A, B, Mid, S> {
    fn clone(&self) -> Self {
        Via::new(self.first.clone(), self.second.clone(), self.sink.clone())
    }
}

impl<In, Mid, Out, A, B, S> Flow<In, Out> for Via<A, B, Mid, S>
where
    A: Flow<In, Mid>,
    B: Flow<Mid, Out>,
    S: TraceSink,
{
    fn apply(&self, input: In) -> FlowResult<Out> {
        if is_unit::<Mid>() && is_unit::<Out>() {
            return Err(ConfigError::SinkIntoSink.into());
        }
        let start = Instant::now();
        let mid = self.first.apply(input)?;
        let out = self.second.apply(mid)?;
        self.sink.elapsed(&self.first.name(), start.elapsed());
        Ok(out)
    }
}

/// Pass-through flow.
pub struct Identity<T>(PhantomData<fn(T) -> T>);

impl<T> Identity<T> {
    pub fn new() -> Self {
        Identity(PhantomData)
    }
}

impl<T> Default for Identity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for Identity<T> {}

impl<T> Flow<T, T> for Identity<T> {
    fn apply(&self, input: T) -> FlowResult<T> {
        Ok(input)
    }
}

pub fn identity<T>() -> Identity<T> {
    Identity::new()
}

/// Ignores its input and emits a clone of a fixed value.
pub struct Constant<Out, In = ()> {
    value: Out,
    _input: PhantomData<fn(In)>,
}

impl<Out: Clone, In> Clone for Constant<Out, In> {
    fn clone(&self) -> Self {
        Constant {
            value: self.value.clone(),
            _input: PhantomData,
        }
    }
}

impl<Out: std::fmt::Debug, In> std::fmt::Debug for Constant<Out, In> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Constant").field(&self.value).finish()
    }
}

impl<Out: Clone, In> Flow<In, Out> for Constant<Out, In> {
    fn apply(&self, _input: In) -> FlowResult<Out> {
        Ok(self.value.clone())
    }
}

/// A producer that always emits `value`.
pub fn source<Out: Clone>(value: Out) -> Constant<Out> {
    constant(value)
}

/// Like [`source`], for any input type.
pub fn constant<In, Out: Clone>(value: Out) -> Constant<Out, In> {
    Constant {
        value,
        _input: PhantomData,
    }
}

/// Infallible mapping wrapped as a flow.
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

impl<In, Out, F> Flow<In, Out> for FromFn<F>
where
    F: Fn(In) -> Out,
{
    fn apply(&self, input: In) -> FlowResult<Out> {
        Ok((self.0)(input))
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("FromFn")
    }
}

pub fn from_fn<In, Out, F>(f: F) -> FromFn<F>
where
    F: Fn(In) -> Out,
{
    FromFn(f)
}

/// A flow carrying an explicit component name.
#[derive(Clone)]
pub struct Named<F> {
    inner: F,
    label: String,
}

impl<In, Out, F> Flow<In, Out> for Named<F>
where
    F: Flow<In, Out>,
{
    fn apply(&self, input: In) -> FlowResult<Out> {
        self.inner.apply(input)
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.label.as_str())
    }
}

pub fn named<In, Out, F>(label: impl Into<String>, flow: F) -> Named<F>
where
    F: Flow<In, Out>,
{
    flow.named(label)
}

/// A borrowed flow. See [`Flow::by_ref`].
pub struct ByRef<'a, F>(&'a F);

impl<F> Clone for ByRef<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for ByRef<'_, F> {}

impl<In, Out, F> Flow<In, Out> for ByRef<'_, F>
where
    F: Flow<In, Out>,
{
    fn apply(&self, input: In) -> FlowResult<Out> {
        self.0.apply(input)
    }

    fn name(&self) -> Cow<'_, str> {
        self.0.name()
    }
}

/// Type-erased, cheaply clonable flow.
pub struct BoxFlow<In, Out>(Arc<dyn Flow<In, Out> + Send + Sync>);

impl<In, Out> BoxFlow<In, Out> {
    pub fn new<F>(flow: F) -> Self
    where
        F: Flow<In, Out> + Send + Sync + 'static,
    {
        BoxFlow(Arc::new(flow))
    }
}

impl<In, Out> Clone for BoxFlow<In, Out> {
    fn clone(&self) -> Self {
        BoxFlow(self.0.clone())
    }
}

impl<In, Out> Flow<In, Out> for BoxFlow<In, Out> {
    fn apply(&self, input: In) -> FlowResult<Out> {
        self.0.apply(input)
    }

    fn name(&self) -> Cow<'_, str> {
        self.0.name()
    }
}

impl<In, Out> std::fmt::Debug for BoxFlow<In, Out> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BoxFlow").field(&self.0.name()).finish()
    }
}
