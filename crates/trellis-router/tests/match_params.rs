//! Parameter capture, optional modifiers and assertions.

mod common;

use common::matched_patterns;
use regex::Regex;
use trellis_router::{Assertion, Route, RouteTree};

fn single(route: Route) -> RouteTree {
    let mut tree = RouteTree::new();
    tree.add_root(route).unwrap();
    tree
}

// =============================================================================
// Required parameters
// =============================================================================

#[test]
fn test_required_param_captures_text() {
    let tree = single(Route::new("/foo/:id"));

    let matched = tree.match_path("/foo/123").unwrap().unwrap();
    assert_eq!(matched_patterns(&tree, &matched), ["/foo/:id"]);
    assert_eq!(matched.params.get_str("id"), Some("123"));
}

#[test]
fn test_required_param_does_not_match_without_segment() {
    let tree = single(Route::new("/foo/:id"));
    assert!(tree.match_path("/foo").unwrap().is_none());
}

#[test]
fn test_param_never_spans_separators() {
    let tree = single(Route::new("/foo/:id"));
    assert!(tree.match_path("/foo/1/2").unwrap().is_none());
}

// =============================================================================
// Optional parameters
// =============================================================================

#[test]
fn test_optional_param_with_value() {
    let tree = single(Route::new("/foo/:id?"));

    let matched = tree.match_path("/foo/123").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("123"));
}

#[test]
fn test_optional_param_without_value_is_null() {
    let tree = single(Route::new("/foo/:id?"));

    let matched = tree.match_path("/foo").unwrap().unwrap();
    assert!(matched.params.contains("id"));
    assert_eq!(matched.params.get("id"), Some(&serde_json::Value::Null));
}

// =============================================================================
// Assertions
// =============================================================================

#[test]
fn test_assertion_accepts_and_rejects() {
    let tree = single(Route::new("/foo/:id").assert("id", r"^\d+$"));

    let matched = tree.match_path("/foo/123").unwrap().unwrap();
    assert_eq!(matched.params.get_str("id"), Some("123"));

    assert!(tree.match_path("/foo/abc").unwrap().is_none());
}

#[test]
fn test_assertion_on_optional_param_skips_absent_value() {
    let tree = single(Route::new("/foo/:id?").assert("id", r"^\d+$"));

    assert!(tree.match_path("/foo").unwrap().is_some());
    assert!(tree.match_path("/foo/abc").unwrap().is_none());
}

#[test]
fn test_assertion_with_default_after_fail_but_no_default_rejects() {
    let tree = single(Route::new("/foo/:id?").assert_or_default("id", r"^\d+$"));

    assert!(tree.match_path("/foo/abc").unwrap().is_none());
    assert!(tree.match_path("/foo/123").unwrap().is_some());
}

#[test]
fn test_assertion_from_compiled_regex() {
    let digits = Regex::new(r"^\d+$").unwrap();
    let tree = single(Route::new("/foo/:id").assert("id", digits));

    assert!(tree.match_path("/foo/123").unwrap().is_some());
    assert!(tree.match_path("/foo/abc").unwrap().is_none());
}

#[test]
fn test_assertion_from_predicate() {
    let tree = single(
        Route::new("/foo/:id").assert("id", Assertion::predicate(|value| value.len() == 3)),
    );

    assert!(tree.match_path("/foo/abc").unwrap().is_some());
    assert!(tree.match_path("/foo/abcd").unwrap().is_none());
}

#[test]
fn test_assertion_rejection_fails_whole_node_not_just_param() {
    // Both params capture, but one failing assertion rejects the node.
    let tree = single(
        Route::new("/foo/:id/:slug")
            .assert("id", r"^\d+$")
            .assert("slug", r"^[a-z]+$"),
    );

    assert!(tree.match_path("/foo/123/abc").unwrap().is_some());
    assert!(tree.match_path("/foo/123/42").unwrap().is_none());
}
