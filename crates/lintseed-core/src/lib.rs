//! lintseed core
//!
//! Token-based linting for JavaScript-style sources and automatic rule
//! configuration: given a corpus of files, find for every rule a setting
//! that produces no finding.
//!
//! The pieces, leaf first:
//!
//! - [`source`]: lexer and [`SourceUnit`]
//! - [`rules`]: the [`Rule`] trait, option schemas and the [`RuleCatalog`]
//! - [`linter`]: runs a [`LintConfig`] against a unit
//! - [`corpus`]: resolves patterns and parses files into a [`Corpus`]
//! - [`autoconfig`]: candidate generation, trials and the merge policy
//! - [`config`]: configuration model, loading and writing

pub mod autoconfig;
pub mod config;
pub mod corpus;
pub mod error;
pub mod linter;
pub mod progress;
pub mod result;
pub mod rules;
pub mod source;

pub use autoconfig::{
    AutoConfigurator, CandidateConfig, CandidateRegistry, Decision, DiscoveryOutcome,
    RECOMMENDED_CONFIG_NAME, RuleDecision, RuleEntry, SpecificityTier, SurvivorSet, TrialRunner,
    extend_from_recommended,
};
pub use config::{
    ConfigFormat, ConfigLoader, FilesConfiguration, LintConfig, RuleSetting, Severity,
    config_json_schema,
};
pub use corpus::{Corpus, CorpusLoader, split_patterns};
pub use error::{ErrorKind, LintseedError};
pub use linter::{Finding, Linter};
pub use progress::{CancellationToken, NoProgress, ProgressSink, ScaledProgress};
pub use result::{Result, ResultExt};
pub use rules::{
    OptionSchema, PropertyKind, PropertySchema, Rule, RuleCatalog, RuleCategory, RuleMetadata,
    RuleOptions, Violation,
};
pub use source::{BraceKind, LineInfo, SourceUnit, SyntaxError, Token, TokenKind};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
pub fn init_tracing_with_default(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout carries command output only
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
