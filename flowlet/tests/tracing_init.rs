#![cfg(all(feature = "std", feature = "observe"))]

use flowlet::config::TraceConfig;

#[test]
fn test_init_tracing_follows_trace_config() {
    let disabled = TraceConfig {
        enabled: false,
        filter: Some("flowlet_core=[".to_string()),
    };
    // disabled tracing never touches the filter or the global subscriber
    assert!(flowlet::init_tracing(&disabled).is_ok());

    let invalid = TraceConfig {
        enabled: true,
        filter: Some("flowlet_core=[".to_string()),
    };
    assert!(flowlet::init_tracing(&invalid).is_err());

    let valid = TraceConfig {
        enabled: true,
        filter: Some("warn".to_string()),
    };
    assert!(flowlet::init_tracing(&valid).is_ok());
    // a global subscriber is now set
    assert!(flowlet::init_tracing(&valid).is_err());
}
