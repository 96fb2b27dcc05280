//! Configurable retry policy for `Flow::with_retry`.
//!
//! A [`Retry`] is a reusable policy: every invocation of the wrapped flow
//! starts a fresh [`RetryAttempts`] context, so one policy can back many
//! flows and many calls.

use crate::config::{ConfigLoadError, RetryConfig};
use crate::sleeper::{Sleeper, ThreadSleeper};
use flowlet_core::error::FlowError;
use flowlet_core::resilience::{RetryContext, RetryDecision, RetryPolicy};
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

type ResultPredicate<Out> = Arc<dyn Fn(&Out) -> bool + Send + Sync>;
type ErrorPredicate = Arc<dyn Fn(&FlowError) -> bool + Send + Sync>;

/// Named retry policy built from a [`RetryConfig`].
///
/// ```rust,ignore
/// let retry = Retry::new("fetch", RetryConfig::default().with_max_attempts(5))?
///     .retry_on_result(|n: &i32| *n > 1);
/// let flow = fetch.with_retry(retry);
/// ```
pub struct Retry<Out> {
    name: Arc<str>,
    config: RetryConfig,
    on_result: Option<ResultPredicate<Out>>,
    on_error: Option<ErrorPredicate>,
    sleeper: Arc<dyn Sleeper>,
}

impl<Out> Retry<Out> {
    pub fn new(name: impl Into<String>, config: RetryConfig) -> Result<Self, ConfigLoadError> {
        config.validate()?;
        Ok(Self {
            name: Arc::from(name.into()),
            config,
            on_result: None,
            on_error: None,
            sleeper: Arc::new(ThreadSleeper),
        })
    }

    /// Three attempts, 500ms apart.
    pub fn of_defaults(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            config: RetryConfig::default(),
            on_result: None,
            on_error: None,
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Retry while `predicate` returns true for a successful value.
    pub fn retry_on_result<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Out) -> bool + Send + Sync + 'static,
    {
        self.on_result = Some(Arc::new(predicate));
        self
    }

    /// Only retry failures accepted by `predicate`; others propagate at once.
    pub fn retry_on_error<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&FlowError) -> bool + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(predicate));
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    fn wait_after(&self, attempt: u32) -> Duration {
        let wait = self.config.backoff.wait_for(self.config.wait(), attempt);
        let factor = self.config.jitter_factor;
        if factor <= 0.0 || wait.is_zero() {
            return wait;
        }
        let delta = rand::thread_rng().gen_range(-factor..=factor);
        wait.mul_f64(1.0 + delta)
    }
}

impl<Out> Clone for Retry<Out> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            config: self.config.clone(),
            on_result: self.on_result.clone(),
            on_error: self.on_error.clone(),
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<Out> fmt::Debug for Retry<Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("on_result", &self.on_result.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("sleeper", &self.sleeper)
            .finish()
    }
}

impl<Out> RetryPolicy<Out> for Retry<Out> {
    type Context = RetryAttempts<Out>;

    fn context(&self) -> RetryAttempts<Out> {
        RetryAttempts {
            policy: self.clone(),
            attempts: 0,
        }
    }
}

/// Per-invocation attempt counter for a [`Retry`].
pub struct RetryAttempts<Out> {
    policy: Retry<Out>,
    attempts: u32,
}

impl<Out> RetryAttempts<Out> {
    /// Attempts that have ended in a retry so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Count the attempt that just ended; false once the limit is reached.
    fn next_attempt(&mut self) -> bool {
        self.attempts += 1;
        if self.attempts >= self.policy.config.max_attempts {
            return false;
        }
        let wait = self.policy.wait_after(self.attempts);
        tracing::debug!(
            retry = %self.policy.name,
            attempt = self.attempts,
            wait_ms = wait.as_millis() as u64,
            "Retrying flow"
        );
        self.policy.sleeper.sleep(wait);
        true
    }
}

impl<Out> RetryContext<Out> for RetryAttempts<Out> {
    fn should_retry_result(&mut self, value: &Out) -> bool {
        let rejected = match &self.policy.on_result {
            Some(predicate) => predicate(value),
            None => false,
        };
        if !rejected {
            return false;
        }
        let retry = self.next_attempt();
        if !retry {
            tracing::warn!(
                retry = %self.policy.name,
                attempts = self.attempts,
                "Retry exhausted on rejected result; returning it"
            );
        }
        retry
    }

    fn on_failure(&mut self, error: &FlowError) -> RetryDecision {
        if let Some(predicate) = &self.policy.on_error {
            if !predicate(error) {
                return RetryDecision::Exhausted;
            }
        }
        if self.next_attempt() {
            RetryDecision::Continue
        } else {
            tracing::warn!(
                retry = %self.policy.name,
                attempts = self.attempts,
                error = %error,
                "Retry exhausted"
            );
            RetryDecision::Exhausted
        }
    }

    fn on_success(&mut self) {
        if self.attempts > 0 {
            tracing::debug!(
                retry = %self.policy.name,
                attempts = self.attempts + 1,
                "Flow succeeded after retry"
            );
        }
    }
}
