use super::NodeError;
use flowlet_core::error::{FlowError, FlowResult};
use flowlet_core::flow::Flow;
use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

/// Passes values accepted by the predicate, fails with
/// [`NodeError::Rejected`] otherwise.
pub struct FilterNode<T, F> {
    label: String,
    predicate: Arc<F>,
    _marker: PhantomData<fn(T)>,
}

impl<T, F> FilterNode<T, F>
where
    F: Fn(&T) -> bool,
{
    pub fn new(label: impl Into<String>, predicate: F) -> Self {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
            _marker: PhantomData,
        }
    }
}

impl<T, F> Clone for FilterNode<T, F> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: self.predicate.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, F> std::fmt::Debug for FilterNode<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterNode").field("label", &self.label).finish()
    }
}

impl<T, F> Flow<T, T> for FilterNode<T, F>
where
    F: Fn(&T) -> bool,
{
    fn apply(&self, input: T) -> FlowResult<T> {
        if (self.predicate)(&input) {
            Ok(input)
        } else {
            Err(FlowError::failure(NodeError::Rejected {
                node: self.label.clone(),
            }))
        }
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlet_core::flow::source;
    use flowlet_core::resilience::RecoverStrategy;

    #[test]
    fn test_filter_passes_and_rejects() {
        let positive = FilterNode::new("positive", |n: &i32| *n > 0);
        assert_eq!(positive.apply(4).unwrap(), 4);

        let err = positive.apply(-1).unwrap_err();
        assert_eq!(err.to_string(), "positive rejected its input");
        assert_eq!(positive.name(), "positive");
    }

    #[test]
    fn test_rejection_can_be_recovered() {
        let strategy = RecoverStrategy::new().match_type_when::<NodeError, _>(
            |e| matches!(e, NodeError::Rejected { .. }),
            source(0),
        );
        let flow = source(-3)
            .via(FilterNode::new("positive", |n: &i32| *n > 0))
            .with_recover(strategy.into_recovery());
        assert_eq!(flow.apply(()).unwrap(), 0);
    }
}
