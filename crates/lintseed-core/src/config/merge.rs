//! Configuration merging logic
//!
//! Combines a configuration with the one it builds on.

use super::lint_config::{FilesConfiguration, LintConfig};

impl LintConfig {
    /// Merge a parent config into this one (current takes precedence)
    ///
    /// - Rule settings and env flags from the parent are added only when
    ///   this config does not set them
    /// - Plugins are appended without duplicates
    /// - `extends` is file-specific and never merged
    pub fn merge_with(&mut self, parent: LintConfig) {
        for (rule, setting) in parent.rules {
            self.rules.entry(rule).or_insert(setting);
        }

        for (env, enabled) in parent.env {
            self.env.entry(env).or_insert(enabled);
        }

        for plugin in parent.plugins {
            if !self.plugins.contains(&plugin) {
                self.plugins.push(plugin);
            }
        }

        if self.parser_options.is_none() {
            self.parser_options = parent.parser_options;
        }

        if let Some(parent_files) = parent.files {
            if let Some(ref mut files) = self.files {
                files.merge_with(parent_files);
            } else {
                self.files = Some(parent_files);
            }
        }
    }
}

impl FilesConfiguration {
    /// Merge files configuration (current takes precedence)
    pub fn merge_with(&mut self, other: FilesConfiguration) {
        if self.include.is_none() {
            self.include = other.include;
        }
        if self.exclude.is_none() {
            self.exclude = other.exclude;
        }
        if self.extensions.is_none() {
            self.extensions = other.extensions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RuleSetting, Severity};
    use serde_json::json;

    #[test]
    fn test_child_rules_take_precedence() {
        let mut child = LintConfig::default();
        child.rules.insert("semi".to_string(), RuleSetting::off());
        child.plugins.push("local".to_string());

        let mut parent = LintConfig::default();
        parent.rules.insert(
            "semi".to_string(),
            RuleSetting::new(Severity::Error, vec![json!("always")]),
        );
        parent.rules.insert("no-var".to_string(), RuleSetting::error());
        parent.plugins.push("local".to_string());
        parent.plugins.push("shared".to_string());
        parent.extends = Some("lintseed:recommended".to_string());

        child.merge_with(parent);

        assert_eq!(child.rule("semi"), Some(&RuleSetting::off()));
        assert_eq!(child.rule("no-var"), Some(&RuleSetting::error()));
        assert_eq!(child.plugins, vec!["local".to_string(), "shared".to_string()]);
        assert!(child.extends.is_none());
    }

    #[test]
    fn test_files_merge_fills_gaps() {
        let mut child = FilesConfiguration {
            include: Some(vec!["src/**/*.js".to_string()]),
            ..Default::default()
        };
        child.merge_with(FilesConfiguration {
            include: Some(vec!["**/*.js".to_string()]),
            exclude: Some(vec!["dist/**".to_string()]),
            extensions: None,
        });

        assert_eq!(child.include, Some(vec!["src/**/*.js".to_string()]));
        assert_eq!(child.exclude, Some(vec!["dist/**".to_string()]));
    }
}
