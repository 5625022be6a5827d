//! CLI command implementations
//!
//! `init` lives in its own module; the smaller commands are implemented here.

pub mod init;

use lintseed_core::{
    CandidateRegistry, ConfigFormat, ConfigLoader, CorpusLoader, Finding, LintConfig,
    LintseedError, Linter, RECOMMENDED_CONFIG_NAME, Result, ResultExt, RuleCatalog, RuleCategory,
    Severity, SourceUnit, config_json_schema,
};
use lintseed_rules::builtin_catalog;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::OutputFormat;
use crate::output::{LintSummary, OutputFormatter, utils::format_duration};

/// Lint command implementation
///
/// Exits with status 1 when any error-level finding is reported.
pub fn lint_command(
    paths: Vec<String>,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Running lint command on paths: {:?}", paths);
    let root = std::env::current_dir().map_err(|e| LintseedError::io_error(".", e))?;
    let catalog = builtin_catalog();
    let config = load_resolved_config(config_path.as_deref(), &root, &catalog)?;

    let loader = CorpusLoader::new(&root).with_files_config(config.files_config());
    let files = loader.resolve(&paths)?;
    if files.is_empty() {
        return Err(LintseedError::config_error(
            "No files found to lint. Check the paths and the include/exclude settings.",
        ));
    }
    info!("Linting {} file(s)", files.len());

    let start = Instant::now();
    let linter = Linter::new(&catalog);
    let mut findings: Vec<Finding> = files
        .par_iter()
        .filter_map(|path| lint_file(&linter, &config, &root, path).log_and_continue())
        .flatten()
        .collect();
    findings.sort_by(|a, b| (&a.path, a.line, a.column).cmp(&(&b.path, b.line, b.column)));
    debug!("Linted in {}", format_duration(start.elapsed()));

    let summary = LintSummary::from_findings(files.len(), &findings);
    OutputFormatter::new(format).print_results(&findings, &summary)?;

    if summary.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

/// Lint one file; a file that does not tokenize yields a single finding
fn lint_file(
    linter: &Linter<'_>,
    config: &LintConfig,
    root: &Path,
    path: &Path,
) -> Result<Vec<Finding>> {
    let text = std::fs::read_to_string(path).map_err(|e| LintseedError::io_error(path, e))?;
    let display_path = path.strip_prefix(root).unwrap_or(path);
    match SourceUnit::parse(display_path, text) {
        Ok(unit) => Ok(linter.verify(&unit, config)),
        Err(err) => Ok(vec![Finding {
            rule_id: "syntax".to_string(),
            severity: Severity::Error,
            message: format!("Parsing error: {}", err.message),
            path: display_path.to_path_buf(),
            line: err.line,
            column: err.column,
        }]),
    }
}

/// Load the configuration and apply its `extends` setting
fn load_resolved_config(
    config_path: Option<&Path>,
    root: &Path,
    catalog: &RuleCatalog,
) -> Result<LintConfig> {
    let mut config = ConfigLoader::load(config_path, Some(root))?;
    match config.extends.as_deref() {
        Some(RECOMMENDED_CONFIG_NAME) => config.merge_with(catalog.recommended_config()),
        Some(other) => warn!("Ignoring unknown base configuration '{}'", other),
        None => {}
    }
    Ok(config)
}

/// Rules list command implementation
pub fn rules_list_command(detailed: bool, category: Option<String>) -> Result<()> {
    debug!("Listing available rules");

    let catalog = builtin_catalog();
    let registry = CandidateRegistry::build(&catalog);
    let filter = category.as_deref().map(RuleCategory::from_slug);

    println!("Available Rules:");
    println!("================");

    let mut count = 0;
    for rule in catalog.iter() {
        let meta = rule.metadata();
        if let Some(ref filter) = filter
            && &meta.category != filter
        {
            continue;
        }
        count += 1;

        let marker = if meta.recommended { " (recommended)" } else { "" };
        if detailed {
            println!("\n{}{}", meta.id, marker);
            println!("  Description: {}", meta.description);
            println!("  Category: {}", meta.category);
            for (position, schema) in meta.schema.iter().enumerate() {
                println!("  Option {}: {}", position + 1, schema);
            }
            if let Some(entry) = registry.entry(&meta.id) {
                println!("  Candidates: {}", entry.candidates.len());
            }
        } else {
            println!("  {}{} - {}", meta.id, marker, meta.description);
        }
    }

    if count == 0 {
        println!("\nNo rules found matching the specified filters.");
    } else {
        println!("\nTotal: {count} rules");
    }

    Ok(())
}

/// Rules explain command implementation
pub fn rules_explain_command(rule_id: &str) -> Result<()> {
    debug!("Explaining rule: {}", rule_id);

    let catalog = builtin_catalog();
    let Some(rule) = catalog.get(rule_id) else {
        println!("Rule '{rule_id}' not found.");
        println!();
        println!("Use 'lintseed rules' to list all available rules.");
        return Ok(());
    };
    let meta = rule.metadata();

    println!("Rule: {}", meta.id);
    println!("{}", "=".repeat(meta.id.len() + 6));
    println!();
    println!("Name: {}", meta.name);
    println!("Category: {}", meta.category);
    println!("Recommended: {}", if meta.recommended { "yes" } else { "no" });
    println!("Description: {}", meta.description);

    if !meta.schema.is_empty() {
        println!();
        println!("Options:");
        for (position, schema) in meta.schema.iter().enumerate() {
            println!("  {}. {}", position + 1, schema);
        }
    }

    if let Some(entry) = CandidateRegistry::build(&catalog).entry(rule_id) {
        println!();
        println!("Candidate configurations ({}):", entry.candidates.len());
        for candidate in &entry.candidates {
            let options = serde_json::to_string(&candidate.options).unwrap_or_default();
            println!("  tier {}  {}", candidate.tier.number(), options);
        }
    }

    Ok(())
}

/// Config schema command implementation
pub fn config_schema_command() -> Result<()> {
    let schema = serde_json::to_string_pretty(&config_json_schema()).map_err(|e| {
        LintseedError::internal_error(format!("Failed to serialize schema: {e}"))
    })?;
    println!("{schema}");
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(format: ConfigFormat, config_path: Option<PathBuf>) -> Result<()> {
    debug!("Showing configuration as {:?}", format);
    let root = std::env::current_dir().map_err(|e| LintseedError::io_error(".", e))?;
    let config = load_resolved_config(config_path.as_deref(), &root, &builtin_catalog())?;
    print!("{}", format.render(&config)?);
    Ok(())
}
