//! Configuration for retry policies and tracing.
//!
//! ```toml
//! [retry]
//! max_attempts = 5
//! wait_ms = 200
//! backoff = { type = "exponential", multiplier = 2.0, max_wait_ms = 2000 }
//!
//! [trace]
//! enabled = true
//! filter = "info,flowlet_core=debug"
//! ```

use flowlet_core::error::FlowError;
use flowlet_core::telemetry::{NoopSink, TraceSink, TracingSink};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Wait growth between attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Backoff {
    /// Always wait `wait_ms`.
    #[default]
    Fixed,
    /// `wait_ms * multiplier^(attempt - 1)`, optionally capped.
    Exponential {
        multiplier: f64,
        #[serde(default)]
        max_wait_ms: Option<u64>,
    },
}

impl Backoff {
    /// Wait after the `attempt`-th failed attempt (1-based).
    pub fn wait_for(&self, base: Duration, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed => base,
            Backoff::Exponential {
                multiplier,
                max_wait_ms,
            } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let millis = base.as_millis() as f64 * multiplier.powi(exponent);
                let capped = match max_wait_ms {
                    Some(max) => millis.min(*max as f64),
                    None => millis,
                };
                Duration::from_millis(capped.min(u64::MAX as f64) as u64)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts, the first call included.
    pub max_attempts: u32,
    pub wait_ms: u64,
    pub backoff: Backoff,
    /// Randomize each wait by up to this fraction, in `[0, 1)`.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait_ms: 500,
            backoff: Backoff::Fixed,
            jitter_factor: 0.0,
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Waits have millisecond resolution; a sub-millisecond remainder
    /// rounds up, so a non-zero wait never becomes zero.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        let millis = wait.as_millis();
        let remainder = wait.subsec_nanos() % 1_000_000 != 0;
        self.wait_ms = u64::try_from(millis + u128::from(remainder)).unwrap_or(u64::MAX);
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = jitter_factor;
        self
    }

    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.max_attempts == 0 {
            return Err(ConfigLoadError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.jitter_factor) {
            return Err(ConfigLoadError::Invalid(format!(
                "retry.jitter_factor must be in [0, 1), got {}",
                self.jitter_factor
            )));
        }
        if let Backoff::Exponential { multiplier, .. } = self.backoff {
            if multiplier.is_nan() || multiplier < 1.0 {
                return Err(ConfigLoadError::Invalid(format!(
                    "retry.backoff.multiplier must be >= 1.0, got {multiplier}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Emit timing and recovery events at all.
    pub enabled: bool,
    /// `EnvFilter` directive used when initialising a subscriber.
    pub filter: Option<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filter: None,
        }
    }
}

impl TraceConfig {
    pub fn sink(&self) -> ConfiguredSink {
        if self.enabled {
            ConfiguredSink::Tracing(TracingSink)
        } else {
            ConfiguredSink::Disabled(NoopSink)
        }
    }
}

/// The trace sink selected by a [`TraceConfig`].
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredSink {
    Tracing(TracingSink),
    Disabled(NoopSink),
}

impl TraceSink for ConfiguredSink {
    fn elapsed(&self, component: &str, elapsed: Duration) {
        match self {
            ConfiguredSink::Tracing(sink) => sink.elapsed(component, elapsed),
            ConfiguredSink::Disabled(sink) => sink.elapsed(component, elapsed),
        }
    }

    fn recovering(&self, component: &str, error: &FlowError) {
        match self {
            ConfiguredSink::Tracing(sink) => sink.recovering(component, error),
            ConfiguredSink::Disabled(sink) => sink.recovering(component, error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct FlowletConfig {
    pub retry: RetryConfig,
    pub trace: TraceConfig,
}

impl FlowletConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigLoadError> {
        let config: FlowletConfig = toml::from_str(input)?;
        config.retry.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(FlowletConfig)).unwrap_or(serde_json::Value::Null)
    }
}
