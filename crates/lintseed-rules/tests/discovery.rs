//! Automatic configuration of the built-in rules over small corpora

use std::fs;

use lintseed_core::{
    AutoConfigurator, Decision, DiscoveryOutcome, LintConfig, NoProgress, RuleSetting, Severity,
    extend_from_recommended,
};
use lintseed_rules::builtin_catalog;
use serde_json::{Value, json};
use tempfile::TempDir;

const GREETER: &str = "const greeting = \"hello\";\nfunction greet(name) {\n  if (name === greeting) {\n    return name;\n  }\n  return greeting;\n}\ngreet(\"world\");\n";

const TOTALS: &str = "const items = [1, 2, 3];\nconst total = items.length;\nlet unused = 4;\nconsole.log(total);\n";

fn corpus(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (name, content) in files {
        let path = temp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    temp
}

fn discover(temp: &TempDir, patterns: &[&str]) -> DiscoveryOutcome {
    let catalog = builtin_catalog();
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
    AutoConfigurator::new(&catalog, temp.path())
        .discover(&LintConfig::default(), &patterns, &mut NoProgress)
        .unwrap()
}

fn error_with(options: &[Value]) -> RuleSetting {
    RuleSetting::new(Severity::Error, options.to_vec())
}

#[test]
fn test_discovers_project_conventions() {
    let temp = corpus(&[("src/greeter.js", GREETER), ("src/totals.js", TOTALS)]);
    let outcome = discover(&temp, &["src"]);
    let rules = &outcome.config.rules;

    assert_eq!(rules.get("semi"), Some(&error_with(&[json!("always")])));
    assert_eq!(rules.get("quotes"), Some(&error_with(&[json!("double")])));
    assert_eq!(rules.get("indent"), Some(&error_with(&[json!(2)])));
    assert_eq!(rules.get("eqeqeq"), Some(&error_with(&[json!("always")])));
    assert_eq!(rules.get("eol-last"), Some(&error_with(&[json!("always")])));
    assert_eq!(rules.get("comma-dangle"), Some(&error_with(&[json!("never")])));
    assert_eq!(rules.get("linebreak-style"), Some(&error_with(&[json!("unix")])));
    assert_eq!(rules.get("no-var"), Some(&RuleSetting::error()));
    assert_eq!(rules.get("no-debugger"), Some(&RuleSetting::error()));
    assert_eq!(rules.get("no-console"), Some(&RuleSetting::off()));
}

#[test]
fn test_failing_recommended_rule_is_forced_to_error() {
    let temp = corpus(&[("totals.js", TOTALS)]);
    let outcome = discover(&temp, &["*.js"]);

    assert_eq!(outcome.config.rule("no-unused-vars"), Some(&RuleSetting::error()));
    let decision = outcome
        .decisions
        .iter()
        .find(|d| d.rule_id == "no-unused-vars")
        .unwrap();
    assert_eq!(decision.decision, Decision::ForcedError);
    assert_eq!(decision.survivors, 0);
}

#[test]
fn test_unindented_corpus_prefers_tabs() {
    let temp = corpus(&[("flat.js", "start();\nstop();\n")]);
    let outcome = discover(&temp, &["flat.js"]);
    assert_eq!(outcome.config.rule("indent"), Some(&error_with(&[json!("tab")])));
}

#[test]
fn test_every_rule_is_configured() {
    let temp = corpus(&[("a.js", GREETER), ("b.js", TOTALS)]);
    let outcome = discover(&temp, &["."]);
    let catalog = builtin_catalog();

    assert_eq!(outcome.config.rules.len(), catalog.len());
    assert_eq!(outcome.decisions.len(), catalog.len());
    assert_eq!(outcome.files_analyzed, 2);
    assert_eq!(outcome.summary(), "Enabled 12 out of 13 rules based on 2 files.");
}

#[test]
fn test_extending_recommended_drops_redundant_rules() {
    let temp = corpus(&[("a.js", GREETER), ("b.js", TOTALS)]);
    let outcome = discover(&temp, &["*.js"]);
    let extended = extend_from_recommended(&outcome.config, &builtin_catalog());

    assert!(extended.rule("no-unused-vars").is_none());
    assert!(extended.rule("no-debugger").is_none());
    assert!(extended.rule("semi").is_some());
    assert!(extended.rule("no-console").is_some());
}
