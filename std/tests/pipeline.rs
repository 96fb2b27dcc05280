use flowlet_core::prelude::*;
use flowlet_core::telemetry::RecordingSink;
use flowlet_std::prelude::*;
use std::cell::{Cell, RefCell};
use std::num::ParseFloatError;

#[test]
fn test_parse_then_scale_into_sink() {
    let seen = Cell::new(0.0);
    source("  21.5 ".to_string())
        .via(ParseNode::<f64>::new())
        .via(MathNode::new(MathOperation::Mul, 2.0))
        .to(sink(|v: f64| seen.set(v)))
        .unwrap();
    assert_eq!(seen.get(), 43.0);
}

#[test]
fn test_parse_failure_recovered_by_type() {
    let trace = RecordingSink::new();
    let strategy = RecoverStrategy::new()
        .match_type::<std::num::ParseIntError>(source(-1.0))
        .match_type::<ParseFloatError>(source(0.0));

    let flow = source("not a number".to_string())
        .via(ParseNode::<f64>::new())
        .with_recover_traced(strategy.into_recovery(), trace.clone());

    assert_eq!(flow.apply(()).unwrap(), 0.0);
    assert_eq!(trace.recovering_count(), 1);
}

#[test]
fn test_retry_defaults_then_recover() {
    let sleeper = TrackingSleeper::new();
    let calls = Cell::new(0);
    let down = |_: ()| -> FlowResult<String> {
        calls.set(calls.get() + 1);
        Err(FlowError::msg("service down"))
    };
    let failures = RefCell::new(Vec::new());

    let flow = down
        .with_retry(Retry::of_defaults("service").with_sleeper(sleeper.clone()))
        .try_recover(
            |_: &String| {},
            |e| failures.borrow_mut().push(e.to_string()),
            RecoverStrategy::of_any(source("cached".to_string())).into_recovery(),
        );

    assert_eq!(flow.apply(()).unwrap(), "cached");
    assert_eq!(calls.get(), 3);
    assert_eq!(sleeper.waits().len(), 2);
    assert_eq!(*failures.borrow(), vec!["service down".to_string()]);
}

#[test]
fn test_mix_of_nodes() {
    let area = |pi: f64, r: f64| -> FlowResult<f64> { Ok(pi * r * r) };
    let pi = source(std::f64::consts::PI.to_string()).via(ParseNode::<f64>::new());
    let radius = source(2.0).via(LogNode::new("radius", LogLevel::Debug));
    let out = area.mix(pi, radius).apply(()).unwrap();
    assert!((out - std::f64::consts::PI * 4.0).abs() < 1e-9);
}
