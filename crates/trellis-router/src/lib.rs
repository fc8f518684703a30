//! # trellis-router
//!
//! Nested route-tree matching and URL assembly for single-page
//! applications.
//!
//! This crate provides:
//! - Hierarchical route trees: parents match a path prefix, children
//!   consume the remainder
//! - Typed parameter extraction with per-parameter assertions, defaults,
//!   parsers and stringifiers
//! - The inverse operation: assembling a URL from a route name and a
//!   parameter set
//! - Locale-specific segment translation through a pluggable translator
//!
//! ## Quick Start
//!
//! ```
//! use trellis_router::{Params, Route, RouteTree};
//!
//! let mut tree = RouteTree::new();
//! tree.add_root(
//!     Route::new("/profile/:id")
//!         .name("profile")
//!         .assert("id", r"^\d+$")
//!         .child(Route::new("/posts").name("posts")),
//! )
//! .unwrap();
//!
//! // Match a pathname; the result lists every route that consumed a
//! // piece of the path, root first.
//! let matched = tree.match_path("/profile/42/posts").unwrap().unwrap();
//! assert_eq!(matched.routes.len(), 2);
//! assert_eq!(matched.params.get_str("id"), Some("42"));
//!
//! // Assemble the URL back from the route name.
//! let url = tree
//!     .assemble_by_name("posts", &Params::new().with("id", 42))
//!     .unwrap();
//! assert_eq!(url, "/profile/42/posts");
//! ```
//!
//! ## Pattern Syntax
//!
//! Patterns are matched case-insensitively:
//!
//! | Token | Meaning |
//! |---|---|
//! | `/:name` | required named segment |
//! | `/:name?` | optional named segment (also implied by a default) |
//! | `/:name*` | greedy named segment, may capture embedded `/` |
//! | `/:@name` | translated named segment |
//! | `/@key` | literal segment substituted via the translator |
//! | `*` (whole pattern) | catch-all, matches any remaining path |
//! | `` (empty) | pathless, always matches, consumes nothing |
//! | `(...)` | naive optional group |
//!
//! Parameter names must start with a letter and be at least two
//! characters; anything else stays literal text.
//!
//! ## Parameter configuration
//!
//! ```
//! use trellis_router::{Params, Route, RouteTree};
//!
//! let mut tree = RouteTree::new();
//! tree.add_root(
//!     Route::new("/archive/:page")
//!         .name("archive")
//!         .assert_or_default("page", r"^\d+$")
//!         .value_for_assemble("page", "1")
//!         .parse("page", |raw| {
//!             raw.parse::<i64>().map(Into::into).map_err(|e| e.to_string())
//!         }),
//! )
//! .unwrap();
//!
//! // A failing assertion falls back to the default, and the parser
//! // turns the text into a number.
//! let matched = tree.match_path("/archive/nope").unwrap().unwrap();
//! assert_eq!(matched.params.get("page").and_then(|v| v.as_i64()), Some(1));
//! ```
//!
//! ## Navigation
//!
//! The [`Router`] facade ties a tree to a [`History`] collaborator and
//! exposes an asynchronous boundary (`resolve`, `assemble`,
//! `navigate_to`) for async navigation layers:
//!
//! ```ignore
//! let mut router = Router::new(history);
//! router.add_route(Route::new("/profile/:id").name("profile"))?;
//! router.navigate_to("profile", &Params::new().with("id", 7)).await?;
//! ```

mod error;
mod params;
mod pattern;
mod route;
mod router;
mod translate;
mod tree;

pub use error::{Result, RouterError};
pub use params::{Assertion, DefaultValue, ParamParser, ParamStringifier, Params};
pub use pattern::{CaptureDescriptor, RoutePattern};
pub use route::Route;
pub use router::{History, Router};
pub use translate::{MapTranslator, RouteTranslator};
pub use tree::{MatchStrategy, RouteId, RouteMatch, RouteTree, MAX_MATCH_DEPTH};
