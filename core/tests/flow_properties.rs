use flowlet_core::prelude::*;
use flowlet_core::telemetry::RecordingSink;
use std::cell::{Cell, RefCell};
use std::num::ParseFloatError;

fn parse_double(s: String) -> FlowResult<f64> {
    s.parse::<f64>().map_err(FlowError::failure)
}

/// Allows `max` attempts in total, with no backoff.
struct MaxAttempts {
    max: usize,
    used: usize,
}

impl<T> RetryContext<T> for MaxAttempts {
    fn should_retry_result(&mut self, _value: &T) -> bool {
        false
    }

    fn on_failure(&mut self, _error: &FlowError) -> RetryDecision {
        self.used += 1;
        if self.used < self.max {
            RetryDecision::Continue
        } else {
            RetryDecision::Exhausted
        }
    }
}

fn max_attempts(max: usize) -> impl Fn() -> MaxAttempts {
    move || MaxAttempts { max, used: 0 }
}

#[test]
fn test_source_via_parser_into_consumer() {
    let seen = RefCell::new(None);
    source("123456.654321".to_string())
        .via(parse_double)
        .to(sink(|t: f64| *seen.borrow_mut() = Some(t)))
        .unwrap();
    assert_eq!(*seen.borrow(), Some(123456.654321));
}

#[test]
fn test_identity_flow_passes_value_to_consumer() {
    let seen = RefCell::new(String::new());
    source("123456.654321".to_string())
        .via(identity::<String>())
        .to(sink(|t: String| *seen.borrow_mut() = t))
        .unwrap();
    assert_eq!(*seen.borrow(), "123456.654321");
}

#[test]
fn test_retry_invokes_exactly_n_times_on_success() {
    let calls = Cell::new(0);
    let flaky = |_: ()| -> FlowResult<usize> {
        calls.set(calls.get() + 1);
        if calls.get() < 3 {
            Err(FlowError::msg("transient"))
        } else {
            Ok(calls.get())
        }
    };

    let seen = Cell::new(0);
    flaky
        .with_retry(max_attempts(3))
        .to(sink(|n: usize| seen.set(n)))
        .unwrap();
    assert_eq!(seen.get(), 3);
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_retry_exhaustion_invokes_exactly_m_times() {
    let calls = Cell::new(0);
    let flaky = |_: ()| -> FlowResult<usize> {
        calls.set(calls.get() + 1);
        Err(FlowError::msg(format!("failure #{}", calls.get())))
    };

    let err = flaky.with_retry(max_attempts(2)).apply(()).unwrap_err();
    assert_eq!(calls.get(), 2);
    assert_eq!(err.to_string(), "failure #2");
}

#[test]
fn test_recover_drives_fallback_to_consumer() {
    let trace = RecordingSink::new();
    let always_fails = |_: ()| -> FlowResult<String> { Err(FlowError::msg("runtime failure")) };
    let expected = "fallback string".to_string();
    let strategy = RecoverStrategy::new().match_type::<FlowError>(source(expected.clone()));

    let seen = RefCell::new(String::new());
    always_fails
        .with_recover_traced(strategy.into_recovery(), trace.clone())
        .to(sink(|actual: String| *seen.borrow_mut() = actual))
        .unwrap();

    assert_eq!(*seen.borrow(), expected);
    assert_eq!(trace.recovering_count(), 1);
}

#[test]
fn test_try_recover_handles_failure_then_recovers() {
    let failures = RefCell::new(Vec::new());
    let always_fails = |_: ()| -> FlowResult<String> {
        Err(FlowError::failure("nan?".parse::<f64>().unwrap_err()))
    };
    let flow = always_fails.try_recover(
        |_: &String| panic!("success hook must not run"),
        |e| failures.borrow_mut().push(e.is::<ParseFloatError>()),
        RecoverStrategy::of_any(source("fallback string".to_string())).into_recovery(),
    );

    let seen = RefCell::new(String::new());
    flow.to(sink(|actual: String| *seen.borrow_mut() = actual))
        .unwrap();
    assert_eq!(*seen.borrow(), "fallback string");
    assert_eq!(*failures.borrow(), vec![true]);
}

#[test]
fn test_supertype_rule_shadows_subtype_rule() {
    let strategy = RecoverStrategy::new()
        .match_type::<FlowError>("X")
        .match_type::<ParseFloatError>("Y");
    let err = FlowError::failure("x".parse::<f64>().unwrap_err());
    assert_eq!(strategy.apply(err).unwrap(), "X");
}

#[test]
fn test_mix_of_pi_and_radius() {
    let area = |pi: String, r: f64| -> FlowResult<f64> { Ok(parse_double(pi)? * r * r) };
    let seen = Cell::new(0.0);
    area.mix(source(std::f64::consts::PI.to_string()), source(2.0))
        .to(sink(|t: f64| seen.set(t)))
        .unwrap();
    assert!((seen.get() - std::f64::consts::PI * 4.0).abs() < 1e-9);
}

#[test]
fn test_retry_then_recover_composes() {
    let calls = Cell::new(0);
    let never_works = |_: ()| -> FlowResult<u32> {
        calls.set(calls.get() + 1);
        Err(FlowError::msg("still down"))
    };
    let flow = never_works
        .with_retry(max_attempts(3))
        .with_recover(RecoverStrategy::of_any(source(0u32)).into_recovery());

    assert_eq!(flow.apply(()).unwrap(), 0);
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_boxed_fallbacks_in_one_strategy() {
    let strategy: RecoverStrategy<BoxFlow<(), String>> = RecoverStrategy::new()
        .match_type::<ParseFloatError>(source("bad float".to_string()).boxed())
        .match_type::<FlowError>(from_fn(|_: ()| "other".to_string()).boxed());

    let bad_float = |_: ()| -> FlowResult<String> {
        Err(FlowError::failure("?".parse::<f64>().unwrap_err()))
    };
    let other = |_: ()| -> FlowResult<String> { Err(FlowError::msg("io")) };

    let recovery = strategy.into_recovery();
    assert_eq!(bad_float.with_recover(&recovery).apply(()).unwrap(), "bad float");
    assert_eq!(other.with_recover(&recovery).apply(()).unwrap(), "other");
}
