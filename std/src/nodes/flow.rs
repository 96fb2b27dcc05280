use crate::sleeper::{Sleeper, ThreadSleeper};
use flowlet_core::error::FlowResult;
use flowlet_core::flow::Flow;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Blocks for a fixed duration, then passes the input through.
#[derive(Debug, Clone)]
pub struct DelayNode<T> {
    pub duration: Duration,
    sleeper: Arc<dyn Sleeper>,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> DelayNode<T> {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(duration_ms),
            sleeper: Arc::new(ThreadSleeper),
            _marker: PhantomData,
        }
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }
}

impl<T> Flow<T, T> for DelayNode<T> {
    fn apply(&self, input: T) -> FlowResult<T> {
        self.sleeper.sleep(self.duration);
        Ok(input)
    }
}

/// Runs a side effect on a borrowed input and passes it through.
#[derive(Clone)]
pub struct InspectNode<T, F> {
    inspect: F,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T, F> InspectNode<T, F>
where
    F: Fn(&T),
{
    pub fn new(inspect: F) -> Self {
        Self {
            inspect,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Flow<T, T> for InspectNode<T, F>
where
    F: Fn(&T),
{
    fn apply(&self, input: T) -> FlowResult<T> {
        (self.inspect)(&input);
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::TrackingSleeper;
    use std::cell::RefCell;

    #[test]
    fn test_delay_node_sleeps_once_per_call() {
        let sleeper = TrackingSleeper::new();
        let delay = DelayNode::<&str>::new(25).with_sleeper(sleeper.clone());
        assert_eq!(delay.apply("a").unwrap(), "a");
        assert_eq!(delay.apply("b").unwrap(), "b");
        assert_eq!(sleeper.waits(), vec![Duration::from_millis(25); 2]);
    }

    #[test]
    fn test_inspect_node_sees_every_value() {
        let seen = RefCell::new(Vec::new());
        let inspect = InspectNode::new(|n: &u8| seen.borrow_mut().push(*n));
        let flow = inspect.via(|n: u8| -> FlowResult<u8> { Ok(n * 2) });
        assert_eq!(flow.apply(3).unwrap(), 6);
        assert_eq!(flow.apply(4).unwrap(), 8);
        assert_eq!(*seen.borrow(), vec![3, 4]);
    }
}
