//! # Mix: Binary Combinator
//!
//! ```text
//! +-------------------------+
//! | Mixed                   |
//! |                         |
//! |  +-------+              |
//! |  | left  | ~~> In1 ─┐   |
//! |  +-------+          │   |
//! |               combine ──|~~> Out
//! |  +-------+          │   |
//! |  | right | ~~> In2 ─┘   |
//! |  +-------+              |
//! +-------------------------+
//! ```
//!
//! Every invocation of a [`Mixed`] flow re-runs both producers, `left`
//! strictly before `right`, each through a sink into its own slot of a fresh
//! [`MixState`]. The combiner runs only once both slots are filled.

use crate::error::{FlowError, FlowResult};
use crate::flow::{Flow, short_type_name};
use crate::sink::sink;
use crate::telemetry::{TraceSink, TracingSink};
use std::borrow::Cow;
use std::cell::Cell;
use std::marker::PhantomData;
use std::time::Instant;

/// A binary function that can merge the outputs of two producers.
pub trait Mixable<In1, In2, Out> {
    fn combine(&self, left: In1, right: In2) -> FlowResult<Out>;

    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(short_type_name::<Self>())
    }

    /// Build a producer that samples `left` and `right`, then combines.
    fn mix<P1, P2>(self, left: P1, right: P2) -> Mixed<Self, P1, P2, In1, In2>
    where
        Self: Sized,
        P1: Flow<(), In1>,
        P2: Flow<(), In2>,
    {
        Mixed::new(self, left, right, TracingSink)
    }

    /// [`Mixable::mix`] reporting to the given trace sink.
    fn mix_traced<P1, P2, S>(self, left: P1, right: P2, sink: S) -> Mixed<Self, P1, P2, In1, In2, S>
    where
        Self: Sized,
        P1: Flow<(), In1>,
        P2: Flow<(), In2>,
        S: TraceSink,
    {
        Mixed::new(self, left, right, sink)
    }
}

impl<In1, In2, Out, F> Mixable<In1, In2, Out> for F
where
    F: Fn(In1, In2) -> FlowResult<Out>,
{
    fn combine(&self, left: In1, right: In2) -> FlowResult<Out> {
        self(left, right)
    }
}

/// `combiner.mix(left, right)` as a free function.
pub fn mix<In1, In2, Out, M, P1, P2>(combiner: M, left: P1, right: P2) -> Mixed<M, P1, P2, In1, In2>
where
    M: Mixable<In1, In2, Out>,
    P1: Flow<(), In1>,
    P2: Flow<(), In2>,
{
    combiner.mix(left, right)
}

/// Slots holding the latest value of each producer for one invocation.
///
/// Not thread-safe: both producers run sequentially on the calling thread
/// before the slots are read.
pub struct MixState<A, B> {
    left: Cell<Option<A>>,
    right: Cell<Option<B>>,
}

impl<A, B> Default for MixState<A, B> {
    fn default() -> Self {
        Self {
            left: Cell::new(None),
            right: Cell::new(None),
        }
    }
}

impl<A, B> MixState<A, B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left(&self, value: A) {
        self.left.set(Some(value));
    }

    pub fn set_right(&self, value: B) {
        self.right.set(Some(value));
    }

    /// Take both values, emptying the slots.
    pub fn take(&self) -> FlowResult<(A, B)> {
        let left = self.left.take().ok_or(FlowError::EmptySlot("left"))?;
        let right = self.right.take().ok_or(FlowError::EmptySlot("right"))?;
        Ok((left, right))
    }
}

/// Run `producer` once into `slot`, timed under the producer's name.
///
/// Unit-valued producers are accepted here, unlike in
/// [`Via`](crate::flow::Via): the slot sink is internal, not a consumer.
fn drive<T, P, K, S>(producer: &P, slot: K, trace: &S) -> FlowResult<()>
where
    P: Flow<(), T>,
    K: Flow<T, ()>,
    S: TraceSink,
{
    let start = Instant::now();
    slot.apply(producer.apply(())?)?;
    trace.elapsed(&producer.name(), start.elapsed());
    Ok(())
}

/// Producer built by [`Mixable::mix`].
pub struct Mixed<M, P1, P2, In1, In2, S = TracingSink> {
    combiner: M,
    left: P1,
    right: P2,
    sink: S,
    _slots: PhantomData<fn() -> (In1, In2)>,
}

impl<M, P1, P2, In1, In2, S> Mixed<M, P1, P2, In1, In2, S> {
    pub fn new(combiner: M, left: P1, right: P2, sink: S) -> Self {
        Self {
            combiner,
            left,
            right,
            sink,
            _slots: PhantomData,
        }
    }
}

impl<M, P1, P2, In1, In2, S, Out> Flow<(), Out> for Mixed<M, P1, P2, In1, In2, S>
where
    M: Mixable<In1, In2, Out>,
    P1: Flow<(), In1>,
    P2: Flow<(), In2>,
    S: TraceSink,
{
    fn apply(&self, _input: ()) -> FlowResult<Out> {
        let state = MixState::new();
        drive(&self.left, sink(|value: In1| state.set_left(value)), &self.sink)?;
        drive(&self.right, sink(|value: In2| state.set_right(value)), &self.sink)?;

        let (left, right) = state.take()?;
        let start = Instant::now();
        let out = self.combiner.combine(left, right)?;
        self.sink.elapsed(&self.combiner.name(), start.elapsed());
        Ok(out)
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Mixed")
    }
}
