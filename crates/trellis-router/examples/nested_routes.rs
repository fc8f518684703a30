//! Builds a small localized route tree, matches a few pathnames and
//! assembles URLs back from route names.
//!
//! Run with: cargo run --example nested_routes

use std::sync::Arc;

use serde_json::Value;
use trellis_router::{MapTranslator, Params, Route, RouteTree};

fn main() -> trellis_router::Result<()> {
    let mut tree = RouteTree::new();

    tree.add_root(
        Route::pathless()
            .name("app")
            .child(Route::new("/").name("home"))
            .child(
                Route::new("/profile/:id")
                    .name("profile")
                    .assert("id", r"^\d+$")
                    .parse("id", |raw| {
                        raw.parse::<i64>().map(Value::from).map_err(|e| e.to_string())
                    })
                    // The index route goes last: a pathless sibling would
                    // otherwise win the scan and starve deeper matches.
                    .child(Route::new("/posts/:slug?").name("profile-posts"))
                    .child(Route::index()),
            )
            .child(Route::new("/@info").name("info")),
    )?;
    tree.add_root(Route::new("*").name("not-found"))?;

    tree.set_translator(Arc::new(MapTranslator::new().entry("info", "informatie")));

    for pathname in ["/", "/profile/42", "/profile/42/posts", "/informatie", "/nope"] {
        match tree.match_path(pathname)? {
            Some(matched) => {
                let names: Vec<_> = matched
                    .routes
                    .iter()
                    .map(|&id| tree.route(id).map(|r| r.name.clone().unwrap_or_default()))
                    .collect::<Result<_, _>>()?;
                println!("{pathname} -> {names:?} params={:?}", matched.params);
            }
            None => println!("{pathname} -> no match"),
        }
    }

    let url = tree.assemble_by_name("profile-posts", &Params::new().with("id", 42))?;
    println!("assemble(profile-posts, id=42) -> {url}");

    Ok(())
}
