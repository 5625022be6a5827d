//! Failing-rule classification

use std::collections::BTreeSet;

use super::candidates::{CandidateConfig, CandidateRegistry};
use super::trial::SurvivorSet;

/// Ids of rules without a single clean candidate
///
/// A registry rule missing from `survivors` counts as failing.
pub fn classify(survivors: &SurvivorSet, registry: &CandidateRegistry) -> BTreeSet<String> {
    registry
        .entries()
        .iter()
        .filter(|entry| survivors.get(&entry.rule_id).is_empty())
        .map(|entry| entry.rule_id.clone())
        .collect()
}

/// Rules split by whether any candidate survived
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Rules with no survivor, sorted by id
    pub failing: BTreeSet<String>,
    /// Rules with survivors, in registry order
    pub passing: Vec<(String, Vec<CandidateConfig>)>,
}

pub fn partition(survivors: &SurvivorSet, registry: &CandidateRegistry) -> Partition {
    let failing = classify(survivors, registry);
    let passing = registry
        .entries()
        .iter()
        .filter(|entry| !failing.contains(&entry.rule_id))
        .map(|entry| (entry.rule_id.clone(), survivors.get(&entry.rule_id).to_vec()))
        .collect();
    Partition { failing, passing }
}
