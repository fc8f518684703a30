//! Route definition and per-node matching/assembly.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::params::{
    assemble_param, resolve_param, Assertion, DefaultValue, ParamConfig, ParamParser,
    ParamStringifier, Params, Requirement, Resolution,
};
use crate::pattern::{
    compile_segments, descriptor_from, translate_path_segments, CompiledPattern, RoutePattern,
    PARAM_RE,
};
use crate::translate::RouteTranslator;

/// Outcome of matching one node against (a remainder of) a pathname:
/// the consumed prefix length and the resolved parameters.
#[derive(Debug, Clone)]
pub(crate) struct NodeMatch {
    pub consumed: usize,
    pub params: Params,
}

/// One route definition: a pattern plus per-parameter configuration.
///
/// Routes are built fluently and then inserted into a
/// [`RouteTree`](crate::RouteTree), which owns them and drives matching
/// and assembly.
///
/// # Example
///
/// ```
/// use trellis_router::Route;
///
/// let route = Route::new("/profile/:id")
///     .name("profile")
///     .assert("id", r"^\d+$")
///     .value("id", "1");
/// assert_eq!(route.name, Some("profile".to_string()));
/// ```
#[derive(Clone)]
pub struct Route {
    /// Route name, used for reverse lookup and assembly.
    pub name: Option<String>,
    pattern: RoutePattern,
    requirements: HashMap<String, Requirement>,
    defaults: HashMap<String, DefaultValue>,
    parsers: HashMap<String, ParamParser>,
    stringifiers: HashMap<String, ParamStringifier>,
    children: Vec<Route>,
    compiled: OnceCell<CompiledPattern>,
}

impl Route {
    /// Creates a route from a raw pattern string. An empty string is the
    /// pathless pattern and `*` the catch-all.
    pub fn new(pattern: &str) -> Self {
        Self::with_pattern(RoutePattern::parse(pattern))
    }

    /// Creates a pathless route: it always matches, consumes nothing and
    /// exists to group children.
    pub fn pathless() -> Self {
        Self::with_pattern(RoutePattern::Pathless)
    }

    /// Creates an index route: the default child selected when a matched
    /// parent has nothing left to consume.
    pub fn index() -> Self {
        Self::with_pattern(RoutePattern::Index).name("_index")
    }

    fn with_pattern(pattern: RoutePattern) -> Self {
        Self {
            name: None,
            pattern,
            requirements: HashMap::new(),
            defaults: HashMap::new(),
            parsers: HashMap::new(),
            stringifiers: HashMap::new(),
            children: Vec::new(),
            compiled: OnceCell::new(),
        }
    }

    /// Sets the route name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds an assertion for a parameter. A failed assertion rejects the
    /// whole match at resolve time and omits the segment at assemble time.
    #[must_use]
    pub fn assert(self, name: &str, assertion: impl Into<Assertion>) -> Self {
        self.add_requirement(name, assertion.into(), false)
    }

    /// Adds an assertion that falls back to the configured default value
    /// when it fails, instead of rejecting.
    #[must_use]
    pub fn assert_or_default(self, name: &str, assertion: impl Into<Assertion>) -> Self {
        self.add_requirement(name, assertion.into(), true)
    }

    fn add_requirement(
        mut self,
        name: &str,
        assertion: Assertion,
        set_default_after_fail: bool,
    ) -> Self {
        assertion.lint(name);
        self.requirements.insert(
            name.to_string(),
            Requirement {
                assertion,
                set_default_after_fail,
            },
        );
        self
    }

    /// Sets a default value for a parameter. A defaulted parameter is
    /// implicitly optional when matching, even without a `?` modifier.
    /// The default is a string, like captured text, and flows through the
    /// configured parser.
    #[must_use]
    pub fn value(self, name: &str, value: impl Into<String>) -> Self {
        self.add_default(name, value.into(), false)
    }

    /// Sets a default value that is also substituted when assembling
    /// without one.
    #[must_use]
    pub fn value_for_assemble(self, name: &str, value: impl Into<String>) -> Self {
        self.add_default(name, value.into(), true)
    }

    fn add_default(mut self, name: &str, value: String, use_for_assemble: bool) -> Self {
        self.defaults.insert(
            name.to_string(),
            DefaultValue {
                value,
                use_for_assemble,
            },
        );
        // A default changes which captures are optional.
        self.compiled = OnceCell::new();
        self
    }

    /// Configures a parser that converts the captured text for a
    /// parameter into an application value.
    #[must_use]
    pub fn parse(
        mut self,
        name: &str,
        parser: impl Fn(&str) -> std::result::Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.parsers.insert(name.to_string(), std::sync::Arc::new(parser));
        self
    }

    /// Configures a stringifier that converts an application value for a
    /// parameter back into path text.
    #[must_use]
    pub fn stringify(
        mut self,
        name: &str,
        stringifier: impl Fn(&Value) -> std::result::Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.stringifiers
            .insert(name.to_string(), std::sync::Arc::new(stringifier));
        self
    }

    /// Nests a child route, fluently. Children are attached in
    /// declaration order when the route is inserted into a tree.
    #[must_use]
    pub fn child(mut self, route: Self) -> Self {
        self.children.push(route);
        self
    }

    /// Nests several child routes.
    #[must_use]
    pub fn children(mut self, routes: Vec<Self>) -> Self {
        self.children.extend(routes);
        self
    }

    /// The route's pattern.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Moves the pending child routes out of this builder.
    pub(crate) fn take_children(&mut self) -> Vec<Self> {
        std::mem::take(&mut self.children)
    }

    /// Discards the memoized matcher so the next match recompiles it.
    /// Called when the child list changes, because end-anchoring depends
    /// on child presence.
    pub(crate) fn invalidate(&mut self) {
        self.compiled = OnceCell::new();
    }

    fn compiled(&self, has_children: bool) -> Result<&CompiledPattern> {
        self.compiled
            .get_or_try_init(|| compile_segments(self.pattern.text(), has_children, &self.defaults))
    }

    fn param_config(&self, name: &str) -> ParamConfig<'_> {
        ParamConfig {
            requirement: self.requirements.get(name),
            default: self.defaults.get(name),
            parser: self.parsers.get(name),
            stringifier: self.stringifiers.get(name),
        }
    }

    /// Matches this node against the start of `pathname`, resolving every
    /// capture through the parameter pipeline. Returns the match by value;
    /// nothing is stored on the node.
    pub(crate) fn match_prefix(
        &self,
        pathname: &str,
        has_children: bool,
        translator: Option<&dyn RouteTranslator>,
    ) -> Result<Option<NodeMatch>> {
        let (consumed, raw) = match &self.pattern {
            RoutePattern::Pathless | RoutePattern::Index => {
                return Ok(Some(NodeMatch {
                    consumed: 0,
                    params: Params::new(),
                }));
            }
            RoutePattern::CatchAll => {
                return Ok(Some(NodeMatch {
                    consumed: pathname.len(),
                    params: Params::new(),
                }));
            }
            RoutePattern::Segments(_) => {
                let compiled = self.compiled(has_children)?;
                let captured = match translator {
                    Some(translator) => {
                        let derived = compiled.derive_translated(translator)?;
                        capture_raw(&derived, compiled, pathname)
                    }
                    None => capture_raw(compiled.regex(), compiled, pathname),
                };
                match captured {
                    Some(captured) => captured,
                    None => return Ok(None),
                }
            }
        };

        let compiled = self.compiled(has_children)?;
        let mut params = Params::new();
        for (descriptor, raw_value) in compiled.captures().iter().zip(&raw) {
            let resolution = resolve_param(
                descriptor,
                raw_value.as_deref(),
                &self.param_config(&descriptor.name),
                translator,
            )?;
            match resolution {
                Resolution::Value(value) => params.insert(descriptor.name.clone(), value),
                Resolution::Reject => {
                    debug!(pattern = %self.pattern.text(), param = %descriptor.name, "match rejected by param resolution");
                    return Ok(None);
                }
            }
        }

        Ok(Some(NodeMatch { consumed, params }))
    }

    /// Assembles this node's own path contribution: the pattern text with
    /// every parameter occurrence substituted in declaration order, then
    /// `/@key` literals translated. Parent segments are composed by the
    /// owning tree.
    pub(crate) fn assemble_segment(
        &self,
        params: &Params,
        translator: Option<&dyn RouteTranslator>,
    ) -> Result<String> {
        let text = match &self.pattern {
            RoutePattern::Pathless | RoutePattern::Index => return Ok(String::new()),
            // The catch-all has nothing to substitute; its literal text is
            // kept, matching the historical behavior.
            RoutePattern::CatchAll => return Ok("*".to_string()),
            RoutePattern::Segments(text) => text,
        };

        let mut failure = None;
        let assembled = PARAM_RE.replace_all(text, |caps: &Captures<'_>| {
            let descriptor = descriptor_from(caps, &self.defaults);
            let segment = assemble_param(
                &descriptor,
                params.get(&descriptor.name),
                &self.param_config(&descriptor.name),
                translator,
                text,
            );
            match segment {
                Ok(segment) => segment,
                Err(err) => {
                    failure.get_or_insert(err);
                    String::new()
                }
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }

        let assembled = match translator {
            Some(translator) if !assembled.is_empty() => {
                translate_path_segments(&assembled, translator)
            }
            _ => assembled.into_owned(),
        };

        Ok(assembled)
    }
}

/// Runs a matcher against a pathname and extracts the consumed length
/// plus the raw text of every named capture, in descriptor order.
fn capture_raw(
    regex: &Regex,
    compiled: &CompiledPattern,
    pathname: &str,
) -> Option<(usize, Vec<Option<String>>)> {
    let caps = regex.captures(pathname)?;
    let consumed = caps.get(0).map_or(0, |m| m.end());
    let raw = compiled
        .captures()
        .iter()
        .map(|d| caps.name(&d.name).map(|m| m.as_str().to_string()))
        .collect();
    Some((consumed, raw))
}
