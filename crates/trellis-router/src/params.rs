//! Parameter values, assertions and the per-parameter pipelines.
//!
//! Matching and assembly are symmetric per-parameter transforms:
//! resolution runs assert → default → parse on a captured value, assembly
//! runs default → assert → stringify → translate on a supplied value.
//! Resolution failure rejects the whole node's match; assembly failure
//! only omits the segment and the overall path keeps building.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{Result, RouterError};
use crate::pattern::CaptureDescriptor;
use crate::translate::RouteTranslator;

/// Parameter values keyed by capture name.
///
/// Captured text is stored as [`Value::String`]; configured parsers may
/// replace it with numbers, objects or anything else JSON-shaped. A
/// matched optional parameter without a value is present as
/// [`Value::Null`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Params {
    params: HashMap<String, Value>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(name.into(), value.into());
    }

    /// Inserts a parameter value, fluently.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Gets a parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Gets a parameter as text, if it is a string value.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Whether a parameter is present (including as `Null`).
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over name/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges another set into this one; the other side wins on
    /// collisions (deeper match levels override shallower ones).
    pub(crate) fn merge(&mut self, other: Self) {
        self.params.extend(other.params);
    }
}

/// Renders a value the way it should appear in a path segment: strings
/// bare, scalars via their display form, everything else as JSON text.
pub(crate) fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A validation rule for a captured or supplied parameter value.
#[derive(Clone)]
pub enum Assertion {
    /// Pattern source, compiled case-insensitively on each check.
    Pattern(String),
    /// Pre-compiled regular expression, used as given.
    Regex(Regex),
    /// Custom predicate.
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Assertion {
    /// Wraps a predicate function.
    pub fn predicate(check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(check))
    }

    /// Checks a value against this rule.
    pub(crate) fn check(&self, name: &str, value: &str) -> Result<bool> {
        match self {
            Self::Pattern(source) => {
                let regex = Regex::new(&format!("(?i){source}")).map_err(|err| {
                    RouterError::InvalidAssertion {
                        name: name.to_string(),
                        reason: err.to_string(),
                    }
                })?;
                Ok(regex.is_match(value))
            }
            Self::Regex(regex) => Ok(regex.is_match(value)),
            Self::Predicate(check) => Ok(check(value)),
        }
    }

    /// Flags likely configuration mistakes: a pattern without `^`/`$`
    /// anchors usually matches more than intended. Diagnostic only.
    pub(crate) fn lint(&self, name: &str) {
        let source = match self {
            Self::Pattern(source) => source.as_str(),
            Self::Regex(regex) => regex.as_str(),
            Self::Predicate(_) => return,
        };
        if !source.starts_with('^') {
            warn!(param = %name, pattern = %source, "assertion is missing ^ at the start, this might be unintentional");
        }
        if !source.ends_with('$') {
            warn!(param = %name, pattern = %source, "assertion is missing $ at the end, this might be unintentional");
        }
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(source) => f.debug_tuple("Pattern").field(source).finish(),
            Self::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            Self::Predicate(_) => f.debug_tuple("Predicate").finish(),
        }
    }
}

impl From<&str> for Assertion {
    fn from(source: &str) -> Self {
        Self::Pattern(source.to_string())
    }
}

impl From<String> for Assertion {
    fn from(source: String) -> Self {
        Self::Pattern(source)
    }
}

impl From<Regex> for Assertion {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

/// An assertion plus its failure policy.
#[derive(Debug, Clone)]
pub(crate) struct Requirement {
    pub assertion: Assertion,
    /// On failure, fall back to the configured default instead of
    /// rejecting.
    pub set_default_after_fail: bool,
}

/// A configured fallback value for a parameter.
///
/// Defaults are strings, like captured text, and flow through the
/// configured parser the same way.
#[derive(Debug, Clone)]
pub struct DefaultValue {
    /// The fallback value.
    pub value: String,
    /// Also substitute this value when assembling without one.
    pub use_for_assemble: bool,
}

/// Converts captured text into an application value.
pub type ParamParser = Arc<dyn Fn(&str) -> std::result::Result<Value, String> + Send + Sync>;

/// Converts an application value back into path text.
pub type ParamStringifier = Arc<dyn Fn(&Value) -> std::result::Result<String, String> + Send + Sync>;

/// Per-parameter configuration view, borrowed from the owning route.
pub(crate) struct ParamConfig<'a> {
    pub requirement: Option<&'a Requirement>,
    pub default: Option<&'a DefaultValue>,
    pub parser: Option<&'a ParamParser>,
    pub stringifier: Option<&'a ParamStringifier>,
}

/// Outcome of resolving one captured parameter.
pub(crate) enum Resolution {
    /// The parameter resolved to a value (possibly `Null` when absent).
    Value(Value),
    /// The assertion failed; the whole node's match is rejected.
    Reject,
}

/// Match-time pipeline for one parameter: translate → assert → default →
/// parse.
pub(crate) fn resolve_param(
    descriptor: &CaptureDescriptor,
    raw: Option<&str>,
    config: &ParamConfig<'_>,
    translator: Option<&dyn RouteTranslator>,
) -> Result<Resolution> {
    let name = &descriptor.name;
    let mut value: Option<String> = None;

    match raw {
        Some(raw) => {
            let decoded = match translator {
                Some(translator) if descriptor.translated => translator.key_for(raw),
                _ => Some(raw.to_string()),
            };
            match decoded {
                Some(decoded) => {
                    if let Some(requirement) = config.requirement {
                        if requirement.assertion.check(name, &decoded)? {
                            value = Some(decoded);
                        } else if requirement.set_default_after_fail && config.default.is_some() {
                            value = config.default.map(|d| d.value.clone());
                        } else {
                            debug!(param = %name, value = %decoded, "assertion failed, rejecting match");
                            return Ok(Resolution::Reject);
                        }
                    } else {
                        value = Some(decoded);
                    }
                }
                // A translated capture with no reverse mapping resolves to
                // no value; it does not fall back to the default.
                None => {
                    if let Some(requirement) = config.requirement {
                        if requirement.set_default_after_fail && config.default.is_some() {
                            value = config.default.map(|d| d.value.clone());
                        } else {
                            debug!(param = %name, value = %raw, "no translation key for asserted param, rejecting match");
                            return Ok(Resolution::Reject);
                        }
                    }
                }
            }
        }
        None => {
            value = config.default.map(|d| d.value.clone());
        }
    }

    let resolved = match value {
        Some(value) => match config.parser {
            Some(parser) => parser(&value).map_err(|reason| RouterError::Transform {
                name: name.clone(),
                reason,
            })?,
            None => Value::String(value),
        },
        None => Value::Null,
    };

    Ok(Resolution::Value(resolved))
}

/// Build-time pipeline for one parameter: default → assert → stringify →
/// translate. Returns `/segment` text, or an empty string when the
/// segment is omitted.
pub(crate) fn assemble_param(
    descriptor: &CaptureDescriptor,
    supplied: Option<&Value>,
    config: &ParamConfig<'_>,
    translator: Option<&dyn RouteTranslator>,
    pattern: &str,
) -> Result<String> {
    let name = &descriptor.name;
    let supplied = supplied.filter(|value| !value.is_null());
    let value: Value;

    match supplied {
        Some(given) => {
            if let Some(requirement) = config.requirement {
                if requirement.assertion.check(name, &plain_string(given))? {
                    value = given.clone();
                } else {
                    let fallback = config
                        .default
                        .filter(|d| d.use_for_assemble && requirement.set_default_after_fail);
                    match fallback {
                        Some(default) => value = Value::String(default.value.clone()),
                        None => {
                            error!(param = %name, value = %given, route = %pattern, "failed assertion while assembling, omitting segment");
                            return Ok(String::new());
                        }
                    }
                }
            } else {
                value = given.clone();
            }
        }
        None => {
            if descriptor.optional {
                match config.default.filter(|d| d.use_for_assemble) {
                    Some(default) => value = Value::String(default.value.clone()),
                    None => return Ok(String::new()),
                }
            } else {
                error!(param = %name, route = %pattern, "missing required param while assembling, omitting segment");
                return Ok(String::new());
            }
        }
    }

    let mut text = match config.stringifier {
        Some(stringifier) => stringifier(&value).map_err(|reason| {
            error!(param = %name, reason = %reason, route = %pattern, "stringifier failed while assembling");
            RouterError::Transform {
                name: name.clone(),
                reason,
            }
        })?,
        None => plain_string(&value),
    };

    if descriptor.translated {
        if let Some(translator) = translator {
            match translator.value_for(&text) {
                Some(translated) => text = translated,
                None => {
                    warn!(param = %name, value = %text, "no translation value for param, using it untranslated");
                }
            }
        }
    }

    Ok(format!("/{text}"))
}
