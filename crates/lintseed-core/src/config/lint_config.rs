//! Configuration types for lintseed
//!
//! A [`LintConfig`] is both the input of a lint run and the output of
//! automatic configuration. Rule settings follow the familiar
//! `severity | [severity, ...options]` shape.

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Rule severity levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "SeverityRepr")]
pub enum Severity {
    /// Disable the rule
    #[default]
    Off,
    /// Warning (doesn't fail the run)
    Warn,
    /// Error (fails the run)
    Error,
}

impl Severity {
    /// Numeric level (`0`, `1`, `2`)
    pub fn level(self) -> u8 {
        match self {
            Severity::Off => 0,
            Severity::Warn => 1,
            Severity::Error => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Severity::Off
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted on-disk spellings of a severity
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Level(u64),
    Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = String;

    fn try_from(repr: SeverityRepr) -> Result<Self, String> {
        match repr {
            SeverityRepr::Level(0) => Ok(Severity::Off),
            SeverityRepr::Level(1) => Ok(Severity::Warn),
            SeverityRepr::Level(2) => Ok(Severity::Error),
            SeverityRepr::Level(other) => Err(format!("invalid severity level {other}")),
            SeverityRepr::Name(name) => match name.to_ascii_lowercase().as_str() {
                "off" => Ok(Severity::Off),
                "warn" | "warning" => Ok(Severity::Warn),
                "error" => Ok(Severity::Error),
                other => Err(format!("invalid severity '{other}'")),
            },
        }
    }
}

impl JsonSchema for Severity {
    fn schema_name() -> Cow<'static, str> {
        "Severity".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "description": "Rule severity: off/warn/error or 0/1/2",
            "oneOf": [
                { "type": "string", "enum": ["off", "warn", "error"] },
                { "type": "integer", "enum": [0, 1, 2] }
            ]
        })
    }
}

/// A rule setting: severity alone, or severity followed by rule options
///
/// Serialized as a bare severity when there are no options and as a
/// `[severity, ...options]` array otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleSetting {
    pub fn new(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }

    pub fn severity(severity: Severity) -> Self {
        Self::new(severity, Vec::new())
    }

    pub fn off() -> Self {
        Self::severity(Severity::Off)
    }

    pub fn error() -> Self {
        Self::severity(Severity::Error)
    }

    pub fn is_enabled(&self) -> bool {
        self.severity.is_enabled()
    }
}

impl fmt::Display for RuleSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_empty() {
            return write!(f, "\"{}\"", self.severity);
        }
        write!(f, "[\"{}\"", self.severity)?;
        for option in &self.options {
            write!(f, ", {option}")?;
        }
        f.write_str("]")
    }
}

impl Serialize for RuleSetting {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.options.is_empty() {
            return self.severity.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
        seq.serialize_element(&self.severity)?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleSettingRepr {
    Bare(Severity),
    List(Vec<Value>),
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RuleSettingRepr::deserialize(deserializer)? {
            RuleSettingRepr::Bare(severity) => Ok(RuleSetting::severity(severity)),
            RuleSettingRepr::List(mut items) => {
                if items.is_empty() {
                    return Err(D::Error::custom("rule setting array must start with a severity"));
                }
                let head = items.remove(0);
                let severity = Severity::deserialize(head).map_err(D::Error::custom)?;
                Ok(RuleSetting::new(severity, items))
            }
        }
    }
}

impl JsonSchema for RuleSetting {
    fn schema_name() -> Cow<'static, str> {
        "RuleSetting".into()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        let severity = generator.subschema_for::<Severity>();
        schemars::json_schema!({
            "description": "Severity, or an array of severity followed by rule options",
            "oneOf": [
                severity,
                { "type": "array", "minItems": 1 }
            ]
        })
    }
}

/// Files configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfiguration {
    /// Glob patterns to include
    #[schemars(description = "Glob patterns for files to include")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude
    #[schemars(description = "Glob patterns for files to exclude")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// File extensions picked up when a directory is given
    #[schemars(description = "Extensions collected when walking directories")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

impl FilesConfiguration {
    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude
            .clone()
            .unwrap_or_else(|| vec!["**/node_modules/**".to_string()])
    }

    pub fn extension_list(&self) -> Vec<String> {
        self.extensions.clone().unwrap_or_else(|| {
            ["js", "mjs", "cjs"]
                .iter()
                .map(|ext| ext.to_string())
                .collect()
        })
    }
}

/// Linter configuration
///
/// `rules` is kept sorted by rule id so that two runs over the same
/// inputs serialize byte-for-byte identically.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LintConfig {
    /// Shared configuration this one builds on
    #[schemars(description = "Name of a shared configuration to extend")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Plugin names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    /// Environment flags
    #[schemars(description = "Environments whose globals are predefined")]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, bool>,

    /// Parser options passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<Value>,

    /// File discovery configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,

    /// Rule settings
    #[schemars(description = "Rule severity and option configuration")]
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,
}

impl LintConfig {
    /// Look up the setting for a rule
    pub fn rule(&self, rule_id: &str) -> Option<&RuleSetting> {
        self.rules.get(rule_id)
    }

    /// Copy of this configuration with `rules` replaced
    pub fn with_rules(&self, rules: BTreeMap<String, RuleSetting>) -> Self {
        Self {
            rules,
            ..self.clone()
        }
    }

    /// Number of rules whose severity is not `off`
    pub fn enabled_rule_count(&self) -> usize {
        self.rules.values().filter(|s| s.is_enabled()).count()
    }

    /// Files configuration with defaults
    pub fn files_config(&self) -> FilesConfiguration {
        self.files.clone().unwrap_or_default()
    }
}
