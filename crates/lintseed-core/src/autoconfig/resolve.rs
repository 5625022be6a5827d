//! Reducing survivors to one setting per rule

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::candidates::{CandidateConfig, CandidateRegistry, SpecificityTier};
use super::classify::Partition;
use crate::config::RuleSetting;

/// Why a rule received its setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// The only clean candidate
    Unambiguous,
    /// First clean candidate with one option
    SingleOption,
    /// First clean candidate with several options
    MultiOption,
    /// The severity-only default was clean
    Default,
    /// No clean candidate, kept at `error` as a recommended rule
    ForcedError,
    /// No clean candidate, turned off
    Disabled,
}

impl Decision {
    /// Merge layer; higher layers are applied later and win
    fn layer(self) -> u8 {
        match self {
            Decision::ForcedError | Decision::Disabled => 0,
            Decision::Default => 1,
            Decision::MultiOption => 2,
            Decision::SingleOption => 3,
            Decision::Unambiguous => 4,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Unambiguous => "only clean candidate",
            Decision::SingleOption => "first clean single-option candidate",
            Decision::MultiOption => "first clean multi-option candidate",
            Decision::Default => "clean default",
            Decision::ForcedError => "no clean candidate, kept as recommended",
            Decision::Disabled => "no clean candidate, disabled",
        })
    }
}

/// The setting chosen for one rule and the reason for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDecision {
    pub rule_id: String,
    pub setting: RuleSetting,
    pub decision: Decision,
    /// Number of clean candidates
    pub survivors: usize,
    /// Number of candidates tried
    pub candidates: usize,
}

impl fmt::Display for RuleDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}, {}/{} clean)",
            self.rule_id, self.setting, self.decision, self.survivors, self.candidates
        )
    }
}

/// Final rule settings plus the decision behind each
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub rules: BTreeMap<String, RuleSetting>,
    /// In registry order
    pub decisions: Vec<RuleDecision>,
}

/// Pick one survivor: unambiguous, then tier 2, then tier 3, then the default
pub fn select(survivors: &[CandidateConfig]) -> Option<(&CandidateConfig, Decision)> {
    if let [only] = survivors {
        return Some((only, Decision::Unambiguous));
    }
    let first_of = |tier| survivors.iter().find(|c| c.tier == tier);

    first_of(SpecificityTier::SingleOption)
        .map(|c| (c, Decision::SingleOption))
        .or_else(|| first_of(SpecificityTier::MultiOption).map(|c| (c, Decision::MultiOption)))
        .or_else(|| first_of(SpecificityTier::SeverityOnly).map(|c| (c, Decision::Default)))
}

/// Setting for a rule no candidate of which survived
pub fn fallback(recommended: bool) -> (RuleSetting, Decision) {
    if recommended {
        (RuleSetting::error(), Decision::ForcedError)
    } else {
        (RuleSetting::off(), Decision::Disabled)
    }
}

/// Resolve every registry rule and merge the results layer by layer
pub fn resolve(partition: &Partition, registry: &CandidateRegistry) -> Resolution {
    let passing: BTreeMap<&str, &[CandidateConfig]> = partition
        .passing
        .iter()
        .map(|(id, survivors)| (id.as_str(), survivors.as_slice()))
        .collect();

    let mut decisions = Vec::with_capacity(registry.len());
    for entry in registry.entries() {
        let survivors = passing.get(entry.rule_id.as_str()).copied().unwrap_or_default();
        let (setting, decision) = match select(survivors) {
            Some((candidate, decision)) => (candidate.setting(), decision),
            None => fallback(entry.recommended),
        };
        decisions.push(RuleDecision {
            rule_id: entry.rule_id.clone(),
            setting,
            decision,
            survivors: survivors.len(),
            candidates: entry.candidates.len(),
        });
    }

    let mut rules = BTreeMap::new();
    for layer in 0..=Decision::Unambiguous.layer() {
        for decision in decisions.iter().filter(|d| d.decision.layer() == layer) {
            rules.insert(decision.rule_id.clone(), decision.setting.clone());
        }
    }

    Resolution { rules, decisions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Severity;
    use serde_json::json;

    fn candidate(options: Vec<serde_json::Value>) -> CandidateConfig {
        CandidateConfig::new("rule", options)
    }

    #[test]
    fn test_single_survivor_wins_regardless_of_tier() {
        let survivors = vec![candidate(vec![json!("a"), json!({ "b": true })])];
        let (chosen, decision) = select(&survivors).unwrap();
        assert_eq!(decision, Decision::Unambiguous);
        assert_eq!(chosen.tier, SpecificityTier::MultiOption);
    }

    #[test]
    fn test_tier_two_preferred_over_tier_three_and_default() {
        let survivors = vec![
            candidate(vec![]),
            candidate(vec![json!("x"), json!({ "y": false })]),
            candidate(vec![json!("second")]),
            candidate(vec![json!("third")]),
        ];
        let (chosen, decision) = select(&survivors).unwrap();
        assert_eq!(decision, Decision::SingleOption);
        assert_eq!(chosen.options, vec![json!("second")]);
    }

    #[test]
    fn test_tier_three_before_default() {
        let survivors = vec![
            candidate(vec![]),
            candidate(vec![json!("x"), json!({ "y": true })]),
            candidate(vec![json!("x"), json!({ "y": false })]),
        ];
        let (chosen, decision) = select(&survivors).unwrap();
        assert_eq!(decision, Decision::MultiOption);
        assert_eq!(chosen.options[1], json!({ "y": true }));
    }

    #[test]
    fn test_default_fallback_and_empty() {
        let survivors = vec![candidate(vec![]), candidate(vec![])];
        assert_eq!(select(&survivors).unwrap().1, Decision::Default);
        assert!(select(&[]).is_none());
    }

    #[test]
    fn test_fallback_policy() {
        assert_eq!(fallback(true), (RuleSetting::error(), Decision::ForcedError));
        assert_eq!(fallback(false), (RuleSetting::off(), Decision::Disabled));
    }

    #[test]
    fn test_resolve_builds_every_rule() {
        use crate::autoconfig::classify::partition;
        use crate::autoconfig::trial::{SurvivorSet, TrialResult};
        use crate::rules::RuleCatalog;
        use crate::rules::test_rules::{ForbidWord, Marker};

        let catalog = RuleCatalog::new()
            .with_rule(ForbidWord::new("words", &["foo", "bar"], "foo"))
            .with_rule(Marker::new("kept", "A").recommended())
            .with_rule(Marker::new("dropped", "B"));
        let registry = CandidateRegistry::build(&catalog);

        let words = &registry.entry("words").unwrap().candidates;
        let results = vec![
            TrialResult { candidate: words[0].clone(), clean: true },
            TrialResult { candidate: words[1].clone(), clean: true },
            TrialResult { candidate: words[2].clone(), clean: true },
        ];
        let survivors = SurvivorSet::from_results(&registry, &results);
        let resolution = resolve(&partition(&survivors, &registry), &registry);

        assert_eq!(
            resolution.rules.get("words"),
            Some(&RuleSetting::new(Severity::Error, vec![json!("foo")]))
        );
        assert_eq!(resolution.rules.get("kept"), Some(&RuleSetting::error()));
        assert_eq!(resolution.rules.get("dropped"), Some(&RuleSetting::off()));

        let order: Vec<(&str, Decision)> = resolution
            .decisions
            .iter()
            .map(|d| (d.rule_id.as_str(), d.decision))
            .collect();
        assert_eq!(
            order,
            vec![
                ("words", Decision::SingleOption),
                ("kept", Decision::ForcedError),
                ("dropped", Decision::Disabled),
            ]
        );
        assert_eq!(
            resolution.decisions[0].to_string(),
            "words: [\"error\", \"foo\"] (first clean single-option candidate, 3/3 clean)"
        );
    }
}
