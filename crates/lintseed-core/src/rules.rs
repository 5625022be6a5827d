//! Rule trait, rule metadata and the rule catalog
//!
//! A rule inspects one [`SourceUnit`] under a concrete options tuple and
//! reports [`Violation`]s. Each rule also describes its option schema so
//! candidate configurations can be generated from it.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::config::{LintConfig, RuleSetting};
use crate::source::{SourceUnit, Token};

/// Categories for organizing rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCategory {
    /// Code that is most likely wrong
    Correctness,
    /// Suspicious patterns that often indicate bugs
    Suspicious,
    /// Style preferences for how code is written
    Style,
    /// Whitespace, line breaks and other layout concerns
    Layout,
    /// Custom category using a bespoke slug
    Custom(String),
}

impl RuleCategory {
    /// Return the kebab-case slug used for filtering
    pub fn slug(&self) -> &str {
        match self {
            RuleCategory::Correctness => "correctness",
            RuleCategory::Suspicious => "suspicious",
            RuleCategory::Style => "style",
            RuleCategory::Layout => "layout",
            RuleCategory::Custom(name) => name.as_str(),
        }
    }

    /// Create a category from its slug, mapping unknown slugs to custom categories
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "correctness" | "problem" => RuleCategory::Correctness,
            "suspicious" => RuleCategory::Suspicious,
            "style" | "suggestion" => RuleCategory::Style,
            "layout" | "formatting" => RuleCategory::Layout,
            other => RuleCategory::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

/// Value domain of one property of an object option
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "camelCase")]
pub enum PropertyKind {
    /// One of a fixed list of values
    Enum(Vec<Value>),
    /// `true` or `false`
    Boolean,
    /// Anything else; never enumerated
    Opaque,
}

/// One named property of an object option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertySchema {
    pub fn enumeration<V: Into<Value>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Enum(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Boolean,
        }
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Opaque,
        }
    }

    /// Values this property takes during candidate enumeration
    pub fn candidate_values(&self) -> Option<Vec<Value>> {
        match &self.kind {
            PropertyKind::Enum(values) if !values.is_empty() => Some(values.clone()),
            PropertyKind::Boolean => Some(vec![Value::Bool(true), Value::Bool(false)]),
            _ => None,
        }
    }
}

/// Schema of one option position after the severity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OptionSchema {
    /// A scalar drawn from a fixed list
    Enum { values: Vec<Value> },
    /// An object whose properties are enumerated independently
    Object { properties: Vec<PropertySchema> },
    /// A value that cannot be enumerated (numbers, patterns, lists)
    Opaque { description: String },
}

impl OptionSchema {
    pub fn enumeration<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        OptionSchema::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn object(properties: impl IntoIterator<Item = PropertySchema>) -> Self {
        OptionSchema::Object {
            properties: properties.into_iter().collect(),
        }
    }

    pub fn opaque(description: impl Into<String>) -> Self {
        OptionSchema::Opaque {
            description: description.into(),
        }
    }
}

impl fmt::Display for OptionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSchema::Enum { values } => {
                let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "one of {}", rendered.join(" | "))
            }
            OptionSchema::Object { properties } => {
                let rendered: Vec<String> = properties
                    .iter()
                    .map(|p| match &p.kind {
                        PropertyKind::Enum(values) => {
                            let values: Vec<String> = values.iter().map(Value::to_string).collect();
                            format!("{}: {}", p.name, values.join(" | "))
                        }
                        PropertyKind::Boolean => format!("{}: boolean", p.name),
                        PropertyKind::Opaque => format!("{}: any", p.name),
                    })
                    .collect();
                write!(f, "{{ {} }}", rendered.join(", "))
            }
            OptionSchema::Opaque { description } => f.write_str(description),
        }
    }
}

/// Metadata associated with a rule
#[derive(Debug, Clone, Serialize)]
pub struct RuleMetadata {
    /// Unique identifier for the rule
    pub id: String,
    /// Human-readable name for the rule
    pub name: String,
    /// Detailed description of what the rule checks
    pub description: String,
    /// Category this rule belongs to
    pub category: RuleCategory,
    /// Enabled at `error` severity by the recommended configuration
    pub recommended: bool,
    /// Option positions after the severity, in declaration order
    pub schema: Vec<OptionSchema>,
}

impl RuleMetadata {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: RuleCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            recommended: false,
            schema: Vec::new(),
        }
    }

    pub fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }

    pub fn with_option(mut self, schema: OptionSchema) -> Self {
        self.schema.push(schema);
        self
    }
}

/// A problem reported by a rule, without file or severity context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

impl Violation {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    /// Violation positioned at the start of `token`
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        Self::new(message, token.line, token.column)
    }
}

/// Read-only view over the options that follow a rule's severity
#[derive(Debug, Clone, Copy)]
pub struct RuleOptions<'a> {
    values: &'a [Value],
}

impl<'a> RuleOptions<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn get(&self, position: usize) -> Option<&'a Value> {
        self.values.get(position)
    }

    /// String option at `position`, or `default`
    pub fn string(&self, position: usize, default: &'a str) -> &'a str {
        self.get(position).and_then(Value::as_str).unwrap_or(default)
    }

    pub fn integer(&self, position: usize) -> Option<i64> {
        self.get(position).and_then(Value::as_i64)
    }

    /// Boolean property `key` of the object option at `position`, or `default`
    pub fn flag(&self, position: usize, key: &str, default: bool) -> bool {
        self.get(position)
            .and_then(|v| v.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// String property `key` of the object option at `position`
    pub fn property_str(&self, position: usize, key: &str) -> Option<&'a str> {
        self.get(position)
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A lint rule
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Check one unit under the given options
    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation>;

    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// Ordered collection of known rules
///
/// Iteration follows registration order, which is also the order in which
/// candidate configurations are generated and evaluated.
#[derive(Clone, Default)]
pub struct RuleCatalog {
    rules: IndexMap<String, Arc<dyn Rule>>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; a second rule with the same id is ignored
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        let id = rule.id().to_string();
        if self.rules.contains_key(&id) {
            tracing::warn!("Rule '{}' is already registered, ignoring duplicate", id);
            return;
        }
        self.rules.insert(id, rule);
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.register(Arc::new(rule));
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_recommended(&self, id: &str) -> bool {
        self.get(id).is_some_and(|rule| rule.metadata().recommended)
    }

    pub fn recommended_ids(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|rule| rule.metadata().recommended)
            .map(|rule| rule.id())
    }

    /// Configuration enabling every recommended rule at `error`
    pub fn recommended_config(&self) -> LintConfig {
        let rules = self
            .recommended_ids()
            .map(|id| (id.to_string(), RuleSetting::error()))
            .collect();
        LintConfig::default().with_rules(rules)
    }
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCatalog")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_rules {
    //! Small rules driven by marker comments, used by the engine tests

    use super::*;

    /// Reports every line comment whose text matches the configured word
    pub struct ForbidWord {
        meta: RuleMetadata,
        default: &'static str,
    }

    impl ForbidWord {
        pub fn new(id: &str, words: &[&'static str], default: &'static str) -> Self {
            Self {
                meta: RuleMetadata::new(id, id, "Forbids a marker word", RuleCategory::Style)
                    .with_option(OptionSchema::enumeration(words.iter().copied())),
                default,
            }
        }

        pub fn recommended(mut self) -> Self {
            self.meta.recommended = true;
            self
        }
    }

    impl Rule for ForbidWord {
        fn metadata(&self) -> &RuleMetadata {
            &self.meta
        }

        fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
            let word = options.string(0, self.default);
            unit.tokens()
                .iter()
                .filter(|t| t.kind.is_comment() && t.text.contains(word))
                .map(|t| Violation::at(t, format!("Found '{word}'")))
                .collect()
        }
    }

    /// Reports a fixed marker comment regardless of options
    pub struct Marker {
        meta: RuleMetadata,
        marker: &'static str,
    }

    impl Marker {
        pub fn new(id: &str, marker: &'static str) -> Self {
            Self {
                meta: RuleMetadata::new(id, id, "Reports a marker", RuleCategory::Correctness),
                marker,
            }
        }

        pub fn recommended(mut self) -> Self {
            self.meta.recommended = true;
            self
        }
    }

    impl Rule for Marker {
        fn metadata(&self) -> &RuleMetadata {
            &self.meta
        }

        fn check(&self, unit: &SourceUnit, _options: RuleOptions<'_>) -> Vec<Violation> {
            unit.tokens()
                .iter()
                .filter(|t| t.kind.is_comment() && t.text.contains(self.marker))
                .map(|t| Violation::at(t, format!("Found marker '{}'", self.marker)))
                .collect()
        }
    }
}
