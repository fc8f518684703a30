//! Route pattern compilation.
//!
//! A pattern string is turned into an anchored, case-insensitive regular
//! expression plus an ordered list of capture descriptors. The compiled
//! matcher only anchors at the end of input when the route has no children:
//! parent routes are open ended because they match a prefix and hand the
//! remainder to their children.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

use crate::error::{Result, RouterError};
use crate::params::DefaultValue;
use crate::translate::RouteTranslator;

/// One `/:name` parameter occurrence, with optional `@` translation marker
/// and `?`/`*` modifier. Names must start with a letter and be at least two
/// characters; anything else stays literal text.
pub(crate) static PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/:(@?)([A-Za-z][A-Za-z0-9]+)([?*])?").expect("param token regex is valid")
});

/// A `/@key` literal segment, substituted through the translator.
static SEGMENT_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/@([A-Za-z]+)").expect("segment key regex is valid"));

/// A `(...)` substring, made optional by appending `?`. Naive on purpose:
/// nested special syntax inside the parentheses is not parsed.
static OPTIONAL_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*\)").expect("optional group regex is valid"));

/// The kind of path pattern a route carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// Empty pattern: always matches, consumes nothing. Used to group
    /// children under a synthetic non-consuming ancestor.
    Pathless,
    /// Pathless default child, selected when a matched parent has nothing
    /// left to consume.
    Index,
    /// `*`: consumes any remaining path, no captures.
    CatchAll,
    /// Pattern text with literal and parameter segments.
    Segments(String),
}

impl RoutePattern {
    /// Classifies a raw pattern string.
    pub fn parse(pattern: &str) -> Self {
        match pattern {
            "" => Self::Pathless,
            "*" => Self::CatchAll,
            _ => Self::Segments(pattern.to_string()),
        }
    }

    /// Returns the pattern text as written.
    pub fn text(&self) -> &str {
        match self {
            Self::Pathless | Self::Index => "",
            Self::CatchAll => "*",
            Self::Segments(text) => text,
        }
    }

    /// Whether this pattern consumes no characters at all.
    pub fn is_pathless(&self) -> bool {
        matches!(self, Self::Pathless | Self::Index)
    }
}

/// Metadata for one named capture in a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDescriptor {
    /// Parameter name.
    pub name: String,
    /// Declared with `?` or `*`, or implied by a configured default.
    pub optional: bool,
    /// Declared with `*`: may capture embedded path separators.
    pub greedy: bool,
    /// Declared with `:@`: value passes through the translator.
    pub translated: bool,
}

/// A compiled matcher: anchored case-insensitive regex plus ordered
/// capture descriptors.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    /// Substituted body before anchoring; kept to derive the
    /// translator-specific matcher.
    body: String,
    end_anchored: bool,
    source: String,
    captures: Vec<CaptureDescriptor>,
}

impl CompiledPattern {
    /// The compiled regular expression.
    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Capture descriptors in declaration order.
    pub(crate) fn captures(&self) -> &[CaptureDescriptor] {
        &self.captures
    }

    /// Derives the matcher with `/@key` literals replaced by their current
    /// translations. Re-derived on every match because the translator's
    /// underlying data may change between calls; capture descriptors are
    /// reused unchanged.
    pub(crate) fn derive_translated(&self, translator: &dyn RouteTranslator) -> Result<Regex> {
        let body = SEGMENT_KEY_RE.replace_all(&self.body, |caps: &Captures<'_>| {
            let key = &caps[1];
            match translator.value_for(key) {
                Some(value) => format!("/{}", regex::escape(&value)),
                None => {
                    warn!(key = %key, pattern = %self.source, "no translation for segment key");
                    format!("/{}", regex::escape(key))
                }
            }
        });
        let anchored = format!("(?i)^{body}{}", self.end_suffix());
        Regex::new(&anchored).map_err(|err| RouterError::InvalidPattern {
            pattern: self.source.clone(),
            reason: err.to_string(),
        })
    }

    fn end_suffix(&self) -> &'static str {
        if self.end_anchored {
            "/?$"
        } else {
            ""
        }
    }
}

/// Builds a capture descriptor from one `PARAM_RE` match. A configured
/// default makes the capture optional even without a `?` modifier.
pub(crate) fn descriptor_from(
    caps: &Captures<'_>,
    defaults: &HashMap<String, DefaultValue>,
) -> CaptureDescriptor {
    let translated = &caps[1] == "@";
    let name = caps[2].to_string();
    let modifier = caps.get(3).map(|m| m.as_str());
    let greedy = modifier == Some("*");
    let optional = greedy || modifier == Some("?") || defaults.contains_key(&name);
    CaptureDescriptor {
        name,
        optional,
        greedy,
        translated,
    }
}

/// Compiles segment pattern text into a matcher.
///
/// Substitution rules, in order:
/// 1. `(...)` becomes an optional group.
/// 2. Each `/:name` occurrence becomes a named capture wrapper: required
///    (`one non-separator segment`), optional (zero or one) when declared
///    `?` or defaulted, or greedy (`*`, non-greedy text so trailing
///    literals still match) spanning one or more segments.
/// 3. Remaining text is used verbatim.
///
/// The result anchors at `^` and, when the route has no children, at
/// `/?$`.
pub(crate) fn compile_segments(
    text: &str,
    has_children: bool,
    defaults: &HashMap<String, DefaultValue>,
) -> Result<CompiledPattern> {
    let grouped = OPTIONAL_GROUP_RE.replace_all(text, "${0}?");

    let mut captures = Vec::new();
    let body = PARAM_RE
        .replace_all(&grouped, |caps: &Captures<'_>| {
            let descriptor = descriptor_from(caps, defaults);
            let wrapper = if descriptor.greedy {
                format!("(?:/(?P<{}>.*?))", descriptor.name)
            } else if descriptor.optional {
                format!("(?:/(?P<{}>[^/]+))?", descriptor.name)
            } else {
                format!("(?:/(?P<{}>[^/]+))", descriptor.name)
            };
            captures.push(descriptor);
            wrapper
        })
        .into_owned();

    let end_anchored = !has_children;
    let anchored = format!(
        "(?i)^{body}{}",
        if end_anchored { "/?$" } else { "" }
    );
    let regex = Regex::new(&anchored).map_err(|err| RouterError::InvalidPattern {
        pattern: text.to_string(),
        reason: err.to_string(),
    })?;

    Ok(CompiledPattern {
        regex,
        body,
        end_anchored,
        source: text.to_string(),
        captures,
    })
}

/// Replaces `/@key` literal segments in an assembled path with their
/// translations. Unknown keys fall back to the raw key.
pub(crate) fn translate_path_segments(path: &str, translator: &dyn RouteTranslator) -> String {
    SEGMENT_KEY_RE
        .replace_all(path, |caps: &Captures<'_>| {
            let key = &caps[1];
            match translator.value_for(key) {
                Some(value) => format!("/{value}"),
                None => {
                    warn!(key = %key, "no translation for segment key");
                    format!("/{key}")
                }
            }
        })
        .into_owned()
}
