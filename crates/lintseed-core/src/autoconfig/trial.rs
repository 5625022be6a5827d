//! Trial evaluation of candidates against a corpus

use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

use super::candidates::{CandidateConfig, CandidateRegistry};
use crate::config::LintConfig;
use crate::corpus::Corpus;
use crate::error::LintseedError;
use crate::linter::Linter;
use crate::progress::{CancellationToken, ProgressSink};
use crate::result::Result;
use crate::rules::RuleCatalog;

/// Outcome of one candidate over the whole corpus
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    pub candidate: CandidateConfig,
    pub clean: bool,
}

/// Clean candidates per rule, in registry order
///
/// Every registry rule is present; a rule whose candidates all failed maps
/// to an empty list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurvivorSet {
    survivors: IndexMap<String, Vec<CandidateConfig>>,
}

impl SurvivorSet {
    /// Collect the clean candidates out of trial results
    pub fn from_results(registry: &CandidateRegistry, results: &[TrialResult]) -> Self {
        let mut survivors: IndexMap<String, Vec<CandidateConfig>> = registry
            .entries()
            .iter()
            .map(|entry| (entry.rule_id.clone(), Vec::new()))
            .collect();
        for result in results.iter().filter(|r| r.clean) {
            survivors
                .entry(result.candidate.rule_id.clone())
                .or_default()
                .push(result.candidate.clone());
        }
        Self { survivors }
    }

    pub fn get(&self, rule_id: &str) -> &[CandidateConfig] {
        self.survivors.get(rule_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains_rule(&self, rule_id: &str) -> bool {
        self.survivors.contains_key(rule_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CandidateConfig])> {
        self.survivors
            .iter()
            .map(|(id, candidates)| (id.as_str(), candidates.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }
}

/// Lints the corpus once per candidate, one rule at a time
pub struct TrialRunner<'a> {
    catalog: &'a RuleCatalog,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> TrialRunner<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self {
            catalog,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Evaluate every candidate of `registry` against `corpus`
    ///
    /// Each (candidate, unit) pair is one unit of work; progress reports
    /// sum to 1.0 whatever the outcome of the trials.
    pub fn run(
        &self,
        registry: &CandidateRegistry,
        corpus: &Corpus,
        base: &LintConfig,
        progress: &mut dyn ProgressSink,
    ) -> Result<SurvivorSet> {
        let total_candidates = registry.candidate_count();
        let total_units = total_candidates * corpus.len();
        let share = if total_units == 0 {
            0.0
        } else {
            1.0 / total_units as f64
        };

        let mut results = Vec::with_capacity(total_candidates);
        for entry in registry.entries() {
            if !self.catalog.contains(&entry.rule_id) {
                return Err(LintseedError::rule_error(
                    &entry.rule_id,
                    "not found in the rule catalog",
                ));
            }

            for candidate in &entry.candidates {
                if self.cancellation.is_some_and(CancellationToken::is_cancelled) {
                    return Err(LintseedError::Cancelled {
                        completed: results.len(),
                        total: total_candidates,
                    });
                }

                let failing_unit = self.first_failing_unit(candidate, corpus, base, &mut |_| {
                    progress.report(share);
                });
                if let Some(skipped) = failing_unit.map(|idx| corpus.len() - idx - 1) {
                    progress.report(share * skipped as f64);
                }

                results.push(TrialResult {
                    candidate: candidate.clone(),
                    clean: failing_unit.is_none(),
                });
            }

            debug!(
                "Rule '{}': {} of {} candidate(s) clean",
                entry.rule_id,
                results
                    .iter()
                    .filter(|r| r.clean && r.candidate.rule_id == entry.rule_id)
                    .count(),
                entry.candidates.len()
            );
        }

        Ok(SurvivorSet::from_results(registry, &results))
    }

    /// Whether `candidate` yields no finding of its own rule on any unit
    pub fn is_clean(&self, candidate: &CandidateConfig, corpus: &Corpus, base: &LintConfig) -> bool {
        self.first_failing_unit(candidate, corpus, base, &mut |_| {})
            .is_none()
    }

    /// Index of the first unit with a finding, calling `on_unit` for
    /// every unit actually linted
    fn first_failing_unit(
        &self,
        candidate: &CandidateConfig,
        corpus: &Corpus,
        base: &LintConfig,
        on_unit: &mut dyn FnMut(usize),
    ) -> Option<usize> {
        let trial_config =
            base.with_rules(BTreeMap::from([(candidate.rule_id.clone(), candidate.setting())]));
        let linter = Linter::new(self.catalog);

        corpus.iter().enumerate().find_map(|(idx, unit)| {
            let failing = linter
                .verify(unit, &trial_config)
                .iter()
                .any(|finding| finding.rule_id == candidate.rule_id);
            on_unit(idx);
            failing.then_some(idx)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoconfig::candidates::SpecificityTier;
    use crate::config::RuleSetting;
    use crate::progress::NoProgress;
    use crate::rules::test_rules::{ForbidWord, Marker};
    use crate::source::SourceUnit;
    use serde_json::json;

    fn corpus(files: &[(&str, &str)]) -> Corpus {
        Corpus::from_units(
            files
                .iter()
                .map(|(path, text)| SourceUnit::parse(*path, *text).unwrap())
                .collect(),
        )
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::new()
            .with_rule(ForbidWord::new("words", &["foo", "bar"], "foo"))
            .with_rule(Marker::new("marker", "FIXME"))
    }

    #[test]
    fn test_survivors_follow_candidate_order() {
        let catalog = catalog();
        let registry = CandidateRegistry::build(&catalog);
        let corpus = corpus(&[("a.js", "// bar\nx();\n"), ("b.js", "// FIXME later\n")]);

        let survivors = TrialRunner::new(&catalog)
            .run(&registry, &corpus, &LintConfig::default(), &mut NoProgress)
            .unwrap();

        let words: Vec<Vec<serde_json::Value>> =
            survivors.get("words").iter().map(|c| c.options.clone()).collect();
        assert_eq!(words, vec![vec![], vec![json!("foo")]]);
        assert!(survivors.get("marker").is_empty());
        assert!(survivors.contains_rule("marker"));
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn test_other_rules_in_base_config_stay_inert() {
        let catalog = catalog();
        let registry = CandidateRegistry::build(&catalog);
        let corpus = corpus(&[("a.js", "// FIXME foo\n")]);

        let mut base = LintConfig::default();
        base.rules.insert("words".to_string(), RuleSetting::new(
            crate::config::Severity::Error,
            vec![json!("bar")],
        ));
        base.env.insert("node".to_string(), true);

        let survivors = TrialRunner::new(&catalog)
            .run(&registry, &corpus, &base, &mut NoProgress)
            .unwrap();
        let words: Vec<SpecificityTier> =
            survivors.get("words").iter().map(|c| c.tier).collect();
        assert_eq!(words, vec![SpecificityTier::SingleOption]);
        assert_eq!(survivors.get("words")[0].options, vec![json!("bar")]);
        assert_eq!(base.rules.len(), 1, "base config is never modified");
    }

    #[test]
    fn test_progress_sums_to_one_even_when_trials_stop_early() {
        let catalog = catalog();
        let registry = CandidateRegistry::build(&catalog);
        let corpus = corpus(&[
            ("a.js", "// foo FIXME\n"),
            ("b.js", "b();\n"),
            ("c.js", "c();\n"),
        ]);

        let mut reports = Vec::new();
        let mut sink = |increment: f64| reports.push(increment);
        TrialRunner::new(&catalog)
            .run(&registry, &corpus, &LintConfig::default(), &mut sink)
            .unwrap();

        assert!(reports.iter().all(|r| *r >= 0.0));
        let total: f64 = reports.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "total was {total}");
    }

    #[test]
    fn test_cancellation_between_trials() {
        let catalog = catalog();
        let registry = CandidateRegistry::build(&catalog);
        let corpus = corpus(&[("a.js", "a();\n")]);
        let token = CancellationToken::new();
        token.cancel();

        let err = TrialRunner::new(&catalog)
            .with_cancellation(&token)
            .run(&registry, &corpus, &LintConfig::default(), &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, LintseedError::Cancelled { completed: 0, total: 4 }));
    }

    #[test]
    fn test_registry_from_another_catalog_is_rejected() {
        let registry = CandidateRegistry::build(&catalog());
        let smaller = RuleCatalog::new().with_rule(Marker::new("marker", "FIXME"));
        let corpus = corpus(&[("a.js", "a();\n")]);

        let err = TrialRunner::new(&smaller)
            .run(&registry, &corpus, &LintConfig::default(), &mut NoProgress)
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Rule);
    }

    #[test]
    fn test_is_clean() {
        let catalog = catalog();
        let corpus = corpus(&[("a.js", "// bar\n")]);
        let runner = TrialRunner::new(&catalog);
        let base = LintConfig::default();

        assert!(runner.is_clean(&CandidateConfig::new("words", vec![json!("foo")]), &corpus, &base));
        assert!(!runner.is_clean(&CandidateConfig::new("words", vec![json!("bar")]), &corpus, &base));
    }
}
