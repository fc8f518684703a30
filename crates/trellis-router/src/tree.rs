//! Arena route tree and the recursive tree matcher.
//!
//! The tree owns every node; parents hold ordered child ids and each
//! child keeps a non-owning id back to its parent, used only to compose
//! assembled paths and to inherit the translator at attach time. Match
//! results are returned by value, so concurrent matches against the same
//! tree never interfere.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, RouterError};
use crate::params::Params;
use crate::pattern::RoutePattern;
use crate::route::{NodeMatch, Route};
use crate::translate::RouteTranslator;

/// Upper bound on match recursion, so a chain of zero-consuming pathless
/// nodes cannot recurse unboundedly.
pub const MAX_MATCH_DEPTH: usize = 64;

/// Stable handle to a node in a [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RouteId(usize);

/// Sibling scan policy of the tree matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Commit to the first sibling whose own pattern matches, even if its
    /// subtree later fails to consume the remainder. This mirrors the
    /// historical behavior and can reject a path that a later sibling's
    /// subtree would have matched.
    #[default]
    FirstMatch,
    /// Try every matching sibling in declaration order until one subtree
    /// resolves the whole remainder.
    Backtracking,
}

/// A resolved match: the chain of routes that together consumed the
/// whole path, root first, plus the merged parameters (deeper levels win
/// on name collisions).
#[derive(Debug, Clone, Serialize)]
pub struct RouteMatch {
    /// Matched routes, root to leaf.
    pub routes: Vec<RouteId>,
    /// Merged parameters of the whole chain.
    pub params: Params,
}

struct Node {
    route: Route,
    parent: Option<RouteId>,
    children: Vec<RouteId>,
    translator: Option<Arc<dyn RouteTranslator>>,
}

/// Hierarchical set of routes with exclusive ownership of its nodes.
///
/// # Example
///
/// ```
/// use trellis_router::{Params, Route, RouteTree};
///
/// let mut tree = RouteTree::new();
/// let profile = tree
///     .add_root(Route::new("/profile/:id").name("profile").assert("id", r"^\d+$"))
///     .unwrap();
///
/// let matched = tree.match_path("/profile/42").unwrap().unwrap();
/// assert_eq!(matched.routes, vec![profile]);
/// assert_eq!(matched.params.get_str("id"), Some("42"));
///
/// let path = tree.assemble(profile, &Params::new().with("id", 7)).unwrap();
/// assert_eq!(path, "/profile/7");
/// ```
#[derive(Default)]
pub struct RouteTree {
    nodes: Vec<Node>,
    roots: Vec<RouteId>,
    strategy: MatchStrategy,
}

impl RouteTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sibling scan policy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Adds a top-level route. Siblings are scanned in the order they
    /// were added.
    pub fn add_root(&mut self, route: Route) -> Result<RouteId> {
        self.insert_under(route, None)
    }

    /// Adds a route under an existing parent. The child inherits the
    /// parent's translator, and the parent's matcher is recompiled
    /// because end-anchoring depends on child presence.
    pub fn insert(&mut self, route: Route, parent: RouteId) -> Result<RouteId> {
        self.check(parent)?;
        self.insert_under(route, Some(parent))
    }

    fn insert_under(&mut self, mut route: Route, parent: Option<RouteId>) -> Result<RouteId> {
        let pending = route.take_children();
        let translator = parent.and_then(|p| self.nodes[p.0].translator.clone());

        let id = RouteId(self.nodes.len());
        self.nodes.push(Node {
            route,
            parent,
            children: Vec::new(),
            translator,
        });
        match parent {
            Some(parent) => {
                self.nodes[parent.0].children.push(id);
                self.nodes[parent.0].route.invalidate();
            }
            None => self.roots.push(id),
        }

        for child in pending {
            self.insert_under(child, Some(id))?;
        }
        Ok(id)
    }

    /// Attaches a translator to every node currently in the tree. Nodes
    /// inserted later inherit it from their parent.
    pub fn set_translator(&mut self, translator: Arc<dyn RouteTranslator>) {
        for node in &mut self.nodes {
            node.translator = Some(Arc::clone(&translator));
        }
    }

    /// Top-level route ids in declaration order.
    pub fn roots(&self) -> &[RouteId] {
        &self.roots
    }

    /// Child ids of a node in declaration order.
    pub fn children(&self, id: RouteId) -> Result<&[RouteId]> {
        self.check(id)?;
        Ok(&self.nodes[id.0].children)
    }

    /// Parent of a node, if any.
    pub fn parent(&self, id: RouteId) -> Result<Option<RouteId>> {
        self.check(id)?;
        Ok(self.nodes[id.0].parent)
    }

    /// The route definition behind an id.
    pub fn route(&self, id: RouteId) -> Result<&Route> {
        self.check(id)?;
        Ok(&self.nodes[id.0].route)
    }

    /// Number of routes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no routes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first search for the first route with the given name, self
    /// before descendants, in declaration order.
    pub fn route_by_name(&self, name: &str) -> Option<RouteId> {
        fn dfs(tree: &RouteTree, ids: &[RouteId], name: &str) -> Option<RouteId> {
            for &id in ids {
                if tree.nodes[id.0].route.name.as_deref() == Some(name) {
                    return Some(id);
                }
                if let Some(found) = dfs(tree, &tree.nodes[id.0].children, name) {
                    return Some(found);
                }
            }
            None
        }
        dfs(self, &self.roots, name)
    }

    /// Matches a pathname against the whole tree.
    ///
    /// Returns the chain of routes that together consumed the path, or
    /// `Ok(None)` when nothing matched. A leftover remainder with no
    /// child to consume it fails the candidate subtree as a whole.
    pub fn match_path(&self, pathname: &str) -> Result<Option<RouteMatch>> {
        // History implementations sometimes strip the leading slash.
        let normalized = if pathname.starts_with('/') {
            pathname.to_string()
        } else {
            format!("/{pathname}")
        };
        self.match_level(&self.roots, &normalized, 0)
    }

    fn match_level(
        &self,
        siblings: &[RouteId],
        pathname: &str,
        depth: usize,
    ) -> Result<Option<RouteMatch>> {
        if depth >= MAX_MATCH_DEPTH {
            return Err(RouterError::DepthExceeded { depth });
        }

        for &id in siblings {
            let node = &self.nodes[id.0];
            let has_children = !node.children.is_empty();
            let Some(node_match) =
                node.route
                    .match_prefix(pathname, has_children, node.translator.as_deref())?
            else {
                continue;
            };

            match self.descend(id, node_match, pathname, depth)? {
                Some(matched) => return Ok(Some(matched)),
                None => match self.strategy {
                    // The first matching sibling is committed to; its
                    // subtree failing fails the whole level.
                    MatchStrategy::FirstMatch => return Ok(None),
                    MatchStrategy::Backtracking => {
                        debug!(pathname = %pathname, "subtree failed, backtracking to next sibling");
                    }
                },
            }
        }
        Ok(None)
    }

    fn descend(
        &self,
        id: RouteId,
        node_match: NodeMatch,
        pathname: &str,
        depth: usize,
    ) -> Result<Option<RouteMatch>> {
        let node = &self.nodes[id.0];
        let remainder = &pathname[node_match.consumed..];

        if !remainder.is_empty() {
            if node.children.is_empty() {
                // Leftover path with nothing to consume it.
                return Ok(None);
            }
            let child_match = self.match_level(&node.children, remainder, depth + 1)?;
            return Ok(child_match.map(|child| {
                let mut routes = vec![id];
                routes.extend(child.routes);
                let mut params = node_match.params;
                params.merge(child.params);
                RouteMatch { routes, params }
            }));
        }

        // Whole path consumed. A present index child is appended as the
        // default nested content; other children are not forced to match.
        let index_child = node.children.iter().copied().find(|&child| {
            matches!(self.nodes[child.0].route.pattern(), RoutePattern::Index)
        });
        let routes = match index_child {
            Some(index) => vec![id, index],
            None => vec![id],
        };
        Ok(Some(RouteMatch {
            routes,
            params: node_match.params,
        }))
    }

    /// Whether a single node's own pattern matches the start of the
    /// given pathname, children and remainder aside.
    pub fn is_match(&self, id: RouteId, pathname: &str) -> Result<bool> {
        self.check(id)?;
        let node = &self.nodes[id.0];
        let matched = node.route.match_prefix(
            pathname,
            !node.children.is_empty(),
            node.translator.as_deref(),
        )?;
        Ok(matched.is_some())
    }

    /// Assembles the path for a route by composing the parent chain root
    /// first, then this node's own substituted segment.
    pub fn assemble(&self, id: RouteId, params: &Params) -> Result<String> {
        self.check(id)?;

        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.nodes[current.0].parent;
        }
        chain.reverse();

        let mut path = String::new();
        for current in chain {
            let node = &self.nodes[current.0];
            path.push_str(
                &node
                    .route
                    .assemble_segment(params, node.translator.as_deref())?,
            );
        }
        Ok(path)
    }

    /// Assembles the path for a named route.
    pub fn assemble_by_name(&self, name: &str, params: &Params) -> Result<String> {
        let id = self
            .route_by_name(name)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;
        self.assemble(id, params)
    }

    fn check(&self, id: RouteId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(RouterError::UnknownRoute(id.0))
        }
    }
}
