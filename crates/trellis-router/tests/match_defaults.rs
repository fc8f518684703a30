//! Default values and parsers in the resolution pipeline.

mod common;

use serde_json::Value;
use trellis_router::{Route, RouteTree};

fn single(route: Route) -> RouteTree {
    let mut tree = RouteTree::new();
    tree.add_root(route).unwrap();
    tree
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_default_makes_param_optional() {
    let tree = single(Route::new("/foo/:id").value("id", "456"));

    let matched = tree.match_path("/foo/123").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("123"));

    let matched = tree.match_path("/foo").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("456"));
}

#[test]
fn test_default_with_assertion_rejects_bad_value() {
    // Without set-default-after-fail, a failing assertion still rejects.
    let tree = single(Route::new("/foo/:id").assert("id", r"^\d+$").value("id", "456"));

    let matched = tree.match_path("/foo/123").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("123"));

    let matched = tree.match_path("/foo").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("456"));

    assert!(tree.match_path("/foo/abc").unwrap().is_none());
}

#[test]
fn test_default_after_fail_replaces_bad_value() {
    let tree = single(
        Route::new("/foo/:id")
            .assert_or_default("id", r"^\d+$")
            .value("id", "456"),
    );

    let matched = tree.match_path("/foo/123").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("123"));

    let matched = tree.match_path("/foo/abc").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("456"));

    let matched = tree.match_path("/foo").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("456"));
}

// =============================================================================
// Parsers
// =============================================================================

#[test]
fn test_parser_converts_to_number() {
    let tree = single(Route::new("/foo/:id").parse("id", |raw| {
        raw.parse::<i64>().map(Value::from).map_err(|e| e.to_string())
    }));

    let matched = tree.match_path("/foo/123").unwrap().unwrap();
    assert_eq!(matched.params.get("id").and_then(Value::as_i64), Some(123));
}

#[test]
fn test_parser_converts_to_object() {
    // A JSON payload packed into one segment.
    let tree = single(Route::new("/foo/:data").parse("data", |raw| {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }));

    let matched = tree
        .match_path("/foo/{\"id\":1,\"slug\":\"foo\"}")
        .unwrap()
        .unwrap();
    let data = matched.params.get("data").unwrap();
    assert_eq!(data.get("id").and_then(Value::as_i64), Some(1));
    assert_eq!(data.get("slug").and_then(Value::as_str), Some("foo"));
}

#[test]
fn test_parser_applies_to_default_value_too() {
    let tree = single(
        Route::new("/foo/:id")
            .value("id", "123")
            .parse("id", |raw| {
                raw.parse::<i64>().map(Value::from).map_err(|e| e.to_string())
            }),
    );

    let matched = tree.match_path("/foo/456").unwrap().unwrap();
    assert_eq!(matched.params.get("id").and_then(Value::as_i64), Some(456));

    let matched = tree.match_path("/foo").unwrap().unwrap();
    assert_eq!(matched.params.get("id").and_then(Value::as_i64), Some(123));
}

#[test]
fn test_parser_error_propagates_as_transform_error() {
    let tree = single(Route::new("/foo/:id").parse("id", |raw| {
        raw.parse::<i64>().map(Value::from).map_err(|e| e.to_string())
    }));

    assert!(tree.match_path("/foo/abc").is_err());
}
