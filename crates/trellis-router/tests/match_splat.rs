//! Greedy (splat) parameters spanning multiple segments.

mod common;

use common::matched_patterns;
use trellis_router::{Route, RouteTree};

fn single(route: Route) -> RouteTree {
    let mut tree = RouteTree::new();
    tree.add_root(route).unwrap();
    tree
}

#[test]
fn test_splat_requires_at_least_one_segment() {
    let tree = single(Route::new("/foo/:data*"));
    assert!(tree.match_path("/foo").unwrap().is_none());
}

#[test]
fn test_splat_captures_single_segment() {
    let tree = single(Route::new("/foo/:data*"));

    let matched = tree.match_path("/foo/abc").unwrap().unwrap();
    assert_eq!(matched_patterns(&tree, &matched), ["/foo/:data*"]);
    assert_eq!(matched.params.get_str("data"), Some("abc"));
}

#[test]
fn test_splat_captures_embedded_separators() {
    let tree = single(Route::new("/foo/:data*"));

    let matched = tree.match_path("/foo/abc/def").unwrap().unwrap();
    assert_eq!(matched.params.get_str("data"), Some("abc/def"));
}

#[test]
fn test_splat_with_trailing_literal() {
    let tree = single(Route::new("/foo/:data*/end"));

    assert!(tree.match_path("/foo").unwrap().is_none());
    assert!(tree.match_path("/foo/abc").unwrap().is_none());

    let matched = tree.match_path("/foo/abc/end").unwrap().unwrap();
    assert_eq!(matched.params.get_str("data"), Some("abc"));

    let matched = tree.match_path("/foo/abc/def/end").unwrap().unwrap();
    assert_eq!(matched.params.get_str("data"), Some("abc/def"));
}

#[test]
fn test_splat_value_is_one_string() {
    let tree = single(Route::new("/files/:path*"));

    let matched = tree.match_path("/files/docs/readme.md").unwrap().unwrap();
    assert_eq!(matched.params.get_str("path"), Some("docs/readme.md"));
}
