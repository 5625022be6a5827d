//! Candidate configuration generation
//!
//! Every rule gets a short, ordered list of candidate settings derived from
//! its option schema. The order is part of the contract: it is the
//! tie-break when several candidates of the same tier survive.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::config::{RuleSetting, Severity};
use crate::rules::{OptionSchema, RuleCatalog, RuleMetadata};

/// How many option positions a candidate fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SpecificityTier {
    /// Severity only
    SeverityOnly = 1,
    /// Severity and exactly one option
    SingleOption = 2,
    /// Severity and two or more options
    MultiOption = 3,
}

impl SpecificityTier {
    pub fn for_option_count(count: usize) -> Self {
        match count {
            0 => SpecificityTier::SeverityOnly,
            1 => SpecificityTier::SingleOption,
            _ => SpecificityTier::MultiOption,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SpecificityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", self.number())
    }
}

/// One proposed setting for a rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateConfig {
    pub rule_id: String,
    pub options: Vec<Value>,
    pub tier: SpecificityTier,
}

impl CandidateConfig {
    pub fn new(rule_id: impl Into<String>, options: Vec<Value>) -> Self {
        let tier = SpecificityTier::for_option_count(options.len());
        Self {
            rule_id: rule_id.into(),
            options,
            tier,
        }
    }

    /// The candidate as a rule setting at `error` severity
    pub fn setting(&self) -> RuleSetting {
        RuleSetting::new(Severity::Error, self.options.clone())
    }
}

impl fmt::Display for CandidateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule_id, self.setting())
    }
}

/// A rule and its candidates in canonical order
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub rule_id: String,
    pub recommended: bool,
    pub candidates: Vec<CandidateConfig>,
}

impl RuleEntry {
    /// Derive the candidates of one rule from its schema
    ///
    /// Severity-only default first, then every option prefix in schema
    /// declaration order. An opaque position, or an object without an
    /// enumerable property, ends the walk.
    pub fn from_metadata(meta: &RuleMetadata) -> Self {
        let mut tuples: Vec<Vec<Value>> = Vec::new();

        for schema in &meta.schema {
            let values = match schema {
                OptionSchema::Enum { values } if !values.is_empty() => values.clone(),
                OptionSchema::Object { properties } => match object_values(properties) {
                    Some(objects) => objects,
                    None => break,
                },
                _ => break,
            };
            tuples = extend_tuples(tuples, &values);
        }

        let candidates = std::iter::once(Vec::new())
            .chain(tuples)
            .map(|options| CandidateConfig::new(&meta.id, options))
            .collect();

        Self {
            rule_id: meta.id.clone(),
            recommended: meta.recommended,
            candidates,
        }
    }

    pub fn default_candidate(&self) -> &CandidateConfig {
        &self.candidates[0]
    }
}

/// Keep every existing tuple and add each one extended with every value
fn extend_tuples(tuples: Vec<Vec<Value>>, values: &[Value]) -> Vec<Vec<Value>> {
    if tuples.is_empty() {
        return values.iter().map(|value| vec![value.clone()]).collect();
    }

    let mut extended = tuples.clone();
    for tuple in &tuples {
        for value in values {
            let mut next = tuple.clone();
            next.push(value.clone());
            extended.push(next);
        }
    }
    extended
}

/// Cartesian product of every enumerable property, in declaration order
fn object_values(properties: &[crate::rules::PropertySchema]) -> Option<Vec<Value>> {
    let enumerable: Vec<(&str, Vec<Value>)> = properties
        .iter()
        .filter_map(|p| p.candidate_values().map(|values| (p.name.as_str(), values)))
        .collect();
    if enumerable.is_empty() {
        return None;
    }

    let mut objects = vec![Map::new()];
    for (name, values) in enumerable {
        objects = objects
            .into_iter()
            .flat_map(|object| {
                values.iter().map(move |value| {
                    let mut next = object.clone();
                    next.insert(name.to_string(), value.clone());
                    next
                })
            })
            .collect();
    }
    Some(objects.into_iter().map(Value::Object).collect())
}

/// Candidates for every catalog rule, in catalog order
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    entries: Vec<RuleEntry>,
}

impl CandidateRegistry {
    pub fn build(catalog: &RuleCatalog) -> Self {
        let entries: Vec<RuleEntry> = catalog
            .iter()
            .map(|rule| RuleEntry::from_metadata(rule.metadata()))
            .collect();
        tracing::debug!(
            "Generated {} candidate(s) for {} rule(s)",
            entries.iter().map(|e| e.candidates.len()).sum::<usize>(),
            entries.len()
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn entry(&self, rule_id: &str) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.rule_id == rule_id)
    }

    pub fn candidate_count(&self) -> usize {
        self.entries.iter().map(|e| e.candidates.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PropertySchema, RuleCategory};
    use serde_json::json;

    fn meta(schema: Vec<OptionSchema>) -> RuleMetadata {
        let mut meta = RuleMetadata::new("rule", "Rule", "test", RuleCategory::Style);
        meta.schema = schema;
        meta
    }

    fn options(entry: &RuleEntry) -> Vec<Vec<Value>> {
        entry.candidates.iter().map(|c| c.options.clone()).collect()
    }

    #[test]
    fn test_rule_without_options_has_only_default() {
        let entry = RuleEntry::from_metadata(&meta(vec![]));
        assert_eq!(entry.candidates.len(), 1);
        assert_eq!(entry.default_candidate().tier, SpecificityTier::SeverityOnly);
        assert_eq!(entry.default_candidate().setting(), RuleSetting::error());
    }

    #[test]
    fn test_single_enum_position() {
        let entry = RuleEntry::from_metadata(&meta(vec![OptionSchema::enumeration([
            "always", "never",
        ])]));
        assert_eq!(options(&entry), vec![vec![], vec![json!("always")], vec![json!("never")]]);
        let tiers: Vec<u8> = entry.candidates.iter().map(|c| c.tier.number()).collect();
        assert_eq!(tiers, vec![1, 2, 2]);
    }

    #[test]
    fn test_enum_followed_by_object_keeps_prefixes() {
        let entry = RuleEntry::from_metadata(&meta(vec![
            OptionSchema::enumeration(["double", "single"]),
            OptionSchema::object([PropertySchema::boolean("avoidEscape")]),
        ]));

        assert_eq!(
            options(&entry),
            vec![
                vec![],
                vec![json!("double")],
                vec![json!("single")],
                vec![json!("double"), json!({ "avoidEscape": true })],
                vec![json!("double"), json!({ "avoidEscape": false })],
                vec![json!("single"), json!({ "avoidEscape": true })],
                vec![json!("single"), json!({ "avoidEscape": false })],
            ]
        );
        assert_eq!(entry.candidates[3].tier, SpecificityTier::MultiOption);
    }

    #[test]
    fn test_object_product_skips_opaque_properties() {
        let entry = RuleEntry::from_metadata(&meta(vec![OptionSchema::object([
            PropertySchema::enumeration("mode", ["a", "b"]),
            PropertySchema::opaque("ignore"),
            PropertySchema::boolean("strict"),
        ])]));

        assert_eq!(
            options(&entry),
            vec![
                vec![],
                vec![json!({ "mode": "a", "strict": true })],
                vec![json!({ "mode": "a", "strict": false })],
                vec![json!({ "mode": "b", "strict": true })],
                vec![json!({ "mode": "b", "strict": false })],
            ]
        );
    }

    #[test]
    fn test_opaque_position_stops_enumeration() {
        let entry = RuleEntry::from_metadata(&meta(vec![
            OptionSchema::opaque("a list of names"),
            OptionSchema::enumeration(["x"]),
        ]));
        assert_eq!(entry.candidates.len(), 1);

        let entry = RuleEntry::from_metadata(&meta(vec![
            OptionSchema::enumeration(["tab", "space"]),
            OptionSchema::object([PropertySchema::opaque("ignored")]),
            OptionSchema::enumeration(["never reached"]),
        ]));
        assert_eq!(entry.candidates.len(), 3);
    }

    #[test]
    fn test_registry_follows_catalog_order() {
        use crate::rules::test_rules::{ForbidWord, Marker};

        let catalog = RuleCatalog::new()
            .with_rule(ForbidWord::new("words", &["foo", "bar"], "foo"))
            .with_rule(Marker::new("marker", "FIXME").recommended());
        let registry = CandidateRegistry::build(&catalog);

        let ids: Vec<&str> = registry.entries().iter().map(|e| e.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["words", "marker"]);
        assert_eq!(registry.candidate_count(), 4);
        assert!(registry.entry("marker").unwrap().recommended);
        assert_eq!(
            registry.entry("words").unwrap().candidates[1].to_string(),
            "words: [\"error\", \"foo\"]"
        );
    }
}
