//! Application-facing router: route registration, location resolution
//! and navigation.
//!
//! Matching and assembly are synchronous; the router wraps them in an
//! asynchronous boundary so callers can stay compatible with async
//! navigation layers and future async transforms.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::error::Result;
use crate::params::Params;
use crate::route::Route;
use crate::translate::RouteTranslator;
use crate::tree::{MatchStrategy, RouteId, RouteMatch, RouteTree};

/// Navigation history collaborator (browser history, memory history).
///
/// The router only needs the current pathname and a way to push a new
/// one; listening for external location changes is wiring that lives
/// outside this crate.
pub trait History: Send + Sync {
    /// The current pathname.
    fn pathname(&self) -> String;

    /// Pushes a new pathname onto the history stack.
    fn push(&self, pathname: &str);
}

/// Matches incoming locations against a route tree and assembles URLs
/// for navigation.
///
/// # Example
///
/// ```ignore
/// let mut router = Router::new(history);
/// router.add_route(
///     Route::new("/profile/:id")
///         .name("profile")
///         .assert("id", r"^\d+$"),
/// )?;
///
/// let state = router.resolve("/profile/42").await?;
/// let url = router.assemble("profile", &Params::new().with("id", 7)).await?;
/// router.navigate_to("profile", &Params::new().with("id", 7)).await?;
/// ```
pub struct Router {
    tree: RouteTree,
    history: Arc<dyn History>,
    state: Option<RouteMatch>,
}

impl Router {
    /// Creates a router on top of a history collaborator.
    pub fn new(history: Arc<dyn History>) -> Self {
        Self {
            tree: RouteTree::new(),
            history,
            state: None,
        }
    }

    /// Sets the sibling scan policy of the underlying tree.
    #[must_use]
    pub fn match_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.tree = self.tree.with_strategy(strategy);
        self
    }

    /// Registers a top-level route (and its nested children).
    pub fn add_route(&mut self, route: Route) -> Result<RouteId> {
        self.tree.add_root(route)
    }

    /// Registers several top-level routes.
    pub fn add_routes(&mut self, routes: Vec<Route>) -> Result<Vec<RouteId>> {
        routes.into_iter().map(|route| self.add_route(route)).collect()
    }

    /// Attaches a translator to every registered route; routes added
    /// later inherit it from their parent (top-level routes do not, so
    /// set the translator after registration or call this again).
    pub fn set_translator(&mut self, translator: Arc<dyn RouteTranslator>) {
        self.tree.set_translator(translator);
    }

    /// The underlying route tree.
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// Finds a route by name, searching the whole tree depth first.
    pub fn route_by_name(&self, name: &str) -> Option<RouteId> {
        self.tree.route_by_name(name)
    }

    /// Resolves a pathname against the route tree and stores the result
    /// as the current navigation state.
    pub fn resolve<'a>(&'a mut self, pathname: &str) -> BoxFuture<'a, Result<Option<RouteMatch>>> {
        let pathname = pathname.to_string();
        Box::pin(async move {
            let resolved = self.tree.match_path(&pathname)?;
            if resolved.is_none() {
                debug!(pathname = %pathname, "no route matched");
            }
            self.state = resolved.clone();
            Ok(resolved)
        })
    }

    /// Resolves the history's current location.
    pub fn resolve_current(&mut self) -> BoxFuture<'_, Result<Option<RouteMatch>>> {
        let pathname = self.history.pathname();
        self.resolve(&pathname)
    }

    /// Assembles the URL for a named route.
    pub fn assemble<'a>(&'a self, name: &str, params: &Params) -> BoxFuture<'a, Result<String>> {
        let name = name.to_string();
        let params = params.clone();
        Box::pin(async move { self.tree.assemble_by_name(&name, &params) })
    }

    /// Assembles the URL for a named route, pushes it onto the history
    /// and updates the current navigation state.
    pub fn navigate_to<'a>(
        &'a mut self,
        name: &str,
        params: &Params,
    ) -> BoxFuture<'a, Result<String>> {
        let name = name.to_string();
        let params = params.clone();
        Box::pin(async move {
            let pathname = self.tree.assemble_by_name(&name, &params)?;
            self.history.push(&pathname);
            self.state = self.tree.match_path(&pathname)?;
            Ok(pathname)
        })
    }

    /// Parameters of the current navigation state.
    pub fn params(&self) -> Params {
        self.state
            .as_ref()
            .map(|state| state.params.clone())
            .unwrap_or_default()
    }

    /// Matched route chain of the current navigation state, root first.
    pub fn current_routes(&self) -> &[RouteId] {
        self.state
            .as_ref()
            .map_or(&[], |state| state.routes.as_slice())
    }
}
