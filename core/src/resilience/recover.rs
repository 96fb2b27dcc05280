//! # Recovery
//!
//! [`Recovering`] intercepts transient failures of a flow, asks a recovery
//! function for a fallback flow, and re-drives the original input through
//! it. [`RecoverStrategy`] is an ordered rule list mapping failure types to
//! fallbacks.
//!
//! ```rust
//! use flowlet_core::prelude::*;
//!
//! let always_fails = |_: ()| -> FlowResult<String> { Err(FlowError::msg("down")) };
//! let strategy = RecoverStrategy::new().match_type::<FlowError>(source("fallback".to_string()));
//!
//! let flow = always_fails.with_recover(strategy.into_recovery());
//! assert_eq!(flow.apply(()).unwrap(), "fallback");
//! ```

use crate::error::{FlowError, FlowResult};
use crate::flow::{Flow, short_type_name};
use crate::telemetry::TraceSink;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Side effects fired by [`Recovering`] before it returns or recovers.
pub trait RecoveryHooks<In, Out> {
    fn on_success(&self, input: &In, output: &Out);
    fn on_failure(&self, component: &str, error: &FlowError);
}

/// Reports failures to a [`TraceSink`] as warnings.
#[derive(Debug, Clone)]
pub struct TraceHooks<S> {
    sink: S,
}

impl<S> TraceHooks<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<In, Out, S: TraceSink> RecoveryHooks<In, Out> for TraceHooks<S> {
    fn on_success(&self, _input: &In, _output: &Out) {}

    fn on_failure(&self, component: &str, error: &FlowError) {
        self.sink.recovering(component, error);
    }
}

/// Caller-supplied hooks; the success hook sees only the output.
#[derive(Clone)]
pub struct Callbacks<A, B> {
    on_success: A,
    on_failure: B,
}

impl<A, B> Callbacks<A, B> {
    pub fn new(on_success: A, on_failure: B) -> Self {
        Self {
            on_success,
            on_failure,
        }
    }
}

impl<In, Out, A, B> RecoveryHooks<In, Out> for Callbacks<A, B>
where
    A: Fn(&Out),
    B: Fn(&FlowError),
{
    fn on_success(&self, _input: &In, output: &Out) {
        (self.on_success)(output)
    }

    fn on_failure(&self, _component: &str, error: &FlowError) {
        (self.on_failure)(error)
    }
}

/// Caller-supplied hooks; the success hook sees input and output.
#[derive(Clone)]
pub struct InputCallbacks<A, B> {
    on_success: A,
    on_failure: B,
}

impl<A, B> InputCallbacks<A, B> {
    pub fn new(on_success: A, on_failure: B) -> Self {
        Self {
            on_success,
            on_failure,
        }
    }
}

impl<In, Out, A, B> RecoveryHooks<In, Out> for InputCallbacks<A, B>
where
    A: Fn(&In, &Out),
    B: Fn(&FlowError),
{
    fn on_success(&self, input: &In, output: &Out) {
        (self.on_success)(input, output)
    }

    fn on_failure(&self, _component: &str, error: &FlowError) {
        (self.on_failure)(error)
    }
}

/// A flow with a recovery path. See [`Flow::with_recover`] and
/// [`Flow::try_recover`].
pub struct Recovering<F, K, R, G> {
    inner: F,
    hooks: K,
    recover: R,
    _fallback: PhantomData<fn() -> G>,
}

impl<F, K, R, G> Recovering<F, K, R, G> {
    pub fn new(inner: F, hooks: K, recover: R) -> Self {
        Self {
            inner,
            hooks,
            recover,
            _fallback: PhantomData,
        }
    }
}

impl<F: Clone, K: Clone, R: Clone, G> Clone for Recovering<F, K, R, G> {
    fn clone(&self) -> Self {
        Recovering::new(self.inner.clone(), self.hooks.clone(), self.recover.clone())
    }
}

impl<In, Out, F, K, R, G> Flow<In, Out> for Recovering<F, K, R, G>
where
    In: Clone,
    F: Flow<In, Out>,
    K: RecoveryHooks<In, Out>,
    R: Fn(FlowError) -> FlowResult<G>,
    G: Flow<In, Out>,
{
    fn apply(&self, input: In) -> FlowResult<Out> {
        match self.inner.apply(input.clone()) {
            Ok(output) => {
                self.hooks.on_success(&input, &output);
                Ok(output)
            }
            Err(error) if error.is_transient() => {
                self.hooks.on_failure(&self.inner.name(), &error);
                let fallback = (self.recover)(error)?;
                fallback.apply(input)
            }
            Err(error) => Err(error),
        }
    }

    fn name(&self) -> Cow<'_, str> {
        self.inner.name()
    }
}

struct Rule<F> {
    label: String,
    accepts: Box<dyn Fn(&FlowError) -> bool + Send + Sync>,
    fallback: F,
}

/// Ordered `failure type -> fallback` rules.
///
/// Rules are scanned in insertion order and the first accepting rule wins,
/// so a broad rule (e.g. `match_type::<FlowError>`) registered early shadows
/// every narrower rule registered after it.
pub struct RecoverStrategy<F> {
    rules: Vec<Rule<F>>,
}

impl<F> Default for RecoverStrategy<F> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<F> RecoverStrategy<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A strategy whose single rule accepts every failure.
    pub fn of_any(fallback: F) -> Self {
        Self::new().match_type::<FlowError>(fallback)
    }

    /// Add a rule accepting failures that are instances of `E`.
    pub fn match_type<E>(self, fallback: F) -> Self
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.push(
            short_type_name::<E>(),
            Box::new(|e: &FlowError| e.is::<E>()),
            fallback,
        )
    }

    /// Add a rule accepting instances of `E` for which `predicate` holds.
    pub fn match_type_when<E, P>(self, predicate: P, fallback: F) -> Self
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let label = format!("{} (guarded)", short_type_name::<E>());
        self.push(
            label,
            Box::new(move |e: &FlowError| e.downcast_ref::<E>().is_some_and(&predicate)),
            fallback,
        )
    }

    /// Add a rule with an arbitrary predicate.
    pub fn match_when<P>(self, label: impl Into<String>, predicate: P, fallback: F) -> Self
    where
        P: Fn(&FlowError) -> bool + Send + Sync + 'static,
    {
        self.push(label.into(), Box::new(predicate), fallback)
    }

    fn push(
        mut self,
        label: String,
        accepts: Box<dyn Fn(&FlowError) -> bool + Send + Sync>,
        fallback: F,
    ) -> Self {
        self.rules.push(Rule {
            label,
            accepts,
            fallback,
        });
        self
    }

    fn find(&self, error: &FlowError) -> Option<&Rule<F>> {
        self.rules.iter().find(|rule| (rule.accepts)(error))
    }

    pub fn is_defined_at(&self, error: &FlowError) -> bool {
        self.find(error).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<F: Clone> RecoverStrategy<F> {
    /// Fallback of the first rule accepting `error`.
    ///
    /// Fails with [`FlowError::NoMatchingRecovery`], carrying `error` as its
    /// source, when no rule matches.
    pub fn apply(&self, error: FlowError) -> FlowResult<F> {
        match self.find(&error) {
            Some(rule) => {
                tracing::debug!(rule = %rule.label, "Recovery rule matched");
                Ok(rule.fallback.clone())
            }
            None => Err(FlowError::no_matching_recovery(error)),
        }
    }

    /// Use this strategy as the recovery function of
    /// [`Flow::with_recover`] or [`Flow::try_recover`].
    pub fn into_recovery(self) -> impl Fn(FlowError) -> FlowResult<F> {
        move |error| self.apply(error)
    }
}

impl<F> fmt::Debug for RecoverStrategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| &rule.label))
            .finish()
    }
}
