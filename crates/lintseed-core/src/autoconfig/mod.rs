//! Automatic rule configuration
//!
//! Discovers, for every catalog rule, a setting that produces no finding on
//! a corpus of source files:
//!
//! 1. [`CandidateRegistry`] derives each rule's candidate settings from its
//!    option schema, tagged with a [`SpecificityTier`].
//! 2. [`CorpusLoader`] resolves the file patterns and parses every file.
//! 3. [`TrialRunner`] lints the corpus once per candidate with only that
//!    candidate's rule enabled.
//! 4. [`classify::partition`] separates rules without any clean candidate.
//! 5. [`resolve::resolve`] picks one setting per rule and merges them into
//!    a new configuration.
//!
//! Every stage consumes the previous stage's output by reference and
//! builds a new value; nothing is mutated after construction.

pub mod candidates;
pub mod classify;
pub mod resolve;
pub mod trial;

pub use candidates::{CandidateConfig, CandidateRegistry, RuleEntry, SpecificityTier};
pub use classify::{Partition, classify, partition};
pub use resolve::{Decision, Resolution, RuleDecision, resolve};
pub use trial::{SurvivorSet, TrialResult, TrialRunner};

use std::path::PathBuf;
use tracing::info;

use crate::config::{LintConfig, RuleSetting, Severity};
use crate::corpus::CorpusLoader;
use crate::progress::{CancellationToken, ProgressSink, ScaledProgress};
use crate::result::Result;
use crate::rules::RuleCatalog;

/// Name under which the recommended configuration is extended
pub const RECOMMENDED_CONFIG_NAME: &str = "lintseed:recommended";

/// Share of progress spent loading the corpus
pub const LOADING_WEIGHT: f64 = 0.2;

/// Share of progress spent running trials
pub const TRIALS_WEIGHT: f64 = 0.8;

/// Result of a discovery run
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryOutcome {
    /// The base configuration with discovered rule settings
    pub config: LintConfig,
    /// One decision per catalog rule, in catalog order
    pub decisions: Vec<RuleDecision>,
    pub files_analyzed: usize,
}

impl DiscoveryOutcome {
    /// "Enabled X out of Y rules based on N file(s)"
    pub fn summary(&self) -> String {
        format!(
            "Enabled {} out of {} rules based on {} file{}.",
            self.config.enabled_rule_count(),
            self.decisions.len(),
            self.files_analyzed,
            if self.files_analyzed == 1 { "" } else { "s" }
        )
    }
}

/// Discovers a rule configuration for a corpus
pub struct AutoConfigurator<'a> {
    catalog: &'a RuleCatalog,
    loader: CorpusLoader,
    cancellation: Option<CancellationToken>,
}

impl<'a> AutoConfigurator<'a> {
    /// Configurator resolving patterns relative to `root_dir`
    pub fn new(catalog: &'a RuleCatalog, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            loader: CorpusLoader::new(root_dir),
            cancellation: None,
        }
    }

    pub fn with_loader(mut self, loader: CorpusLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run discovery over the files matching `patterns`
    ///
    /// Fails without producing a configuration when no file matches, when
    /// any file cannot be parsed, or when cancelled. Progress reports sum
    /// to 1.0 on success.
    pub fn discover(
        &self,
        base: &LintConfig,
        patterns: &[String],
        progress: &mut dyn ProgressSink,
    ) -> Result<DiscoveryOutcome> {
        let registry = CandidateRegistry::build(self.catalog);

        info!("Loading corpus");
        let corpus = self
            .loader
            .load(patterns, &mut ScaledProgress::new(progress, LOADING_WEIGHT))?;

        info!(
            "Running {} trial(s) over {} file(s)",
            registry.candidate_count(),
            corpus.len()
        );
        let mut runner = TrialRunner::new(self.catalog);
        if let Some(token) = &self.cancellation {
            runner = runner.with_cancellation(token);
        }
        let survivors = runner.run(
            &registry,
            &corpus,
            base,
            &mut ScaledProgress::new(progress, TRIALS_WEIGHT),
        )?;

        let partition = partition(&survivors, &registry);
        let resolution = resolve(&partition, &registry);

        let outcome = DiscoveryOutcome {
            config: base.with_rules(resolution.rules),
            decisions: resolution.decisions,
            files_analyzed: corpus.len(),
        };
        info!("{}", outcome.summary());
        Ok(outcome)
    }
}

/// Rebase a discovered configuration on the recommended configuration
///
/// Sets `extends` to [`RECOMMENDED_CONFIG_NAME`] and drops every rule whose
/// setting the recommended configuration already provides.
pub fn extend_from_recommended(config: &LintConfig, catalog: &RuleCatalog) -> LintConfig {
    let recommended = catalog.recommended_config();
    let rules = config
        .rules
        .iter()
        .filter(|(id, setting)| {
            !(recommended.rules.contains_key(*id) && is_recommended_default(setting))
        })
        .map(|(id, setting)| (id.clone(), setting.clone()))
        .collect();

    LintConfig {
        extends: Some(RECOMMENDED_CONFIG_NAME.to_string()),
        ..config.with_rules(rules)
    }
}

fn is_recommended_default(setting: &RuleSetting) -> bool {
    setting.severity == Severity::Error && setting.options.is_empty()
}
