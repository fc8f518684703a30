//! Locale translation of literal segments and parameter values.

mod common;

use common::{dutch_translator, matched_patterns};
use serde_json::Value;
use trellis_router::{Route, RouteTree};

// =============================================================================
// Without a translator
// =============================================================================

#[test]
fn test_segment_key_matches_literally_without_translator() {
    let mut tree = RouteTree::new();
    tree.add_root(Route::new("/@info")).unwrap();

    assert!(tree.match_path("/info").unwrap().is_none());
    assert!(tree.match_path("/informatie").unwrap().is_none());
    assert!(tree.match_path("/@info").unwrap().is_some());
}

// =============================================================================
// With a translator
// =============================================================================

#[test]
fn test_segment_key_matches_translation_only() {
    let mut tree = RouteTree::new();
    tree.add_root(Route::new("/@info")).unwrap();
    tree.set_translator(dutch_translator());

    assert!(tree.match_path("/info").unwrap().is_none());
    assert!(tree.match_path("/@info").unwrap().is_none());

    let matched = tree.match_path("/informatie").unwrap().unwrap();
    assert_eq!(matched_patterns(&tree, &matched), ["/@info"]);
}

#[test]
fn test_translated_param_decodes_to_canonical_key() {
    let mut tree = RouteTree::new();
    tree.add_root(Route::new("/@info/:@foo")).unwrap();
    tree.set_translator(dutch_translator());

    let matched = tree.match_path("/informatie/foobar").unwrap().unwrap();
    assert_eq!(matched.params.get_str("foo"), Some("fo"));

    let matched = tree.match_path("/informatie/fubar").unwrap().unwrap();
    assert_eq!(matched.params.get_str("foo"), Some("fu"));
}

#[test]
fn test_translated_param_without_mapping_still_matches_as_null() {
    let mut tree = RouteTree::new();
    tree.add_root(Route::new("/@info/:@foo")).unwrap();
    tree.set_translator(dutch_translator());

    let matched = tree.match_path("/informatie/bar").unwrap().unwrap();
    assert_eq!(matched.params.get("foo"), Some(&Value::Null));
}

#[test]
fn test_translator_is_inherited_by_children() {
    let mut tree = RouteTree::new();
    let root = tree.add_root(Route::new("/@info")).unwrap();
    tree.set_translator(dutch_translator());
    tree.insert(Route::new("/:@foo"), root).unwrap();

    let matched = tree.match_path("/informatie/foobar").unwrap().unwrap();
    assert_eq!(matched_patterns(&tree, &matched), ["/@info", "/:@foo"]);
    assert_eq!(matched.params.get_str("foo"), Some("fo"));
}

#[test]
fn test_translation_round_trip() {
    let mut tree = RouteTree::new();
    tree.add_root(Route::new("/@info").name("info")).unwrap();
    tree.set_translator(dutch_translator());

    assert!(tree.match_path("/informatie").unwrap().is_some());
    assert_eq!(
        tree.assemble_by_name("info", &trellis_router::Params::new()).unwrap(),
        "/informatie"
    );
}
