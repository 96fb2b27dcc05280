pub use crate::config::{Backoff, FlowletConfig, RetryConfig, TraceConfig};
pub use crate::nodes::NodeError;
pub use crate::nodes::debug::{ErrorNode, LogLevel, LogNode};
pub use crate::nodes::flow::{DelayNode, InspectNode};
pub use crate::nodes::logic::FilterNode;
pub use crate::nodes::math::{MathNode, MathOperation};
pub use crate::nodes::string::{ParseNode, StringNode, StringOperation};
pub use crate::retry::Retry;
pub use crate::sleeper::{NoopSleeper, Sleeper, ThreadSleeper, TrackingSleeper};
