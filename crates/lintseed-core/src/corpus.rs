//! Corpus loading
//!
//! Resolves file patterns against a root directory and parses every match
//! into a [`SourceUnit`]. A corpus is all-or-nothing: a single unreadable
//! or unparseable file fails the whole load.

use glob::{Pattern, glob};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::FilesConfiguration;
use crate::error::LintseedError;
use crate::progress::ProgressSink;
use crate::result::Result;
use crate::source::SourceUnit;

/// Name of the optional ignore file read from the corpus root
pub const IGNORE_FILE_NAME: &str = ".lintseedignore";

/// Split a whitespace-separated pattern string
pub fn split_patterns(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

/// The parsed files of one run, sorted by path
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    units: Vec<SourceUnit>,
}

impl Corpus {
    pub fn from_units(mut units: Vec<SourceUnit>) -> Self {
        units.sort_by(|a, b| a.path().cmp(b.path()));
        Self { units }
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.units.iter().map(SourceUnit::path)
    }
}

/// Resolves patterns to files and parses them
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    root_dir: PathBuf,
    files: FilesConfiguration,
}

impl CorpusLoader {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            files: FilesConfiguration::default(),
        }
    }

    pub fn with_files_config(mut self, files: FilesConfiguration) -> Self {
        self.files = files;
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Resolve patterns to a sorted, de-duplicated list of files
    ///
    /// Each pattern is a file, a directory (walked for the configured
    /// extensions) or a glob relative to the root. With no patterns the
    /// configured `include` globs are used, or the whole root is walked.
    pub fn resolve(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let extensions = self.files.extension_list();
        let mut files = BTreeSet::new();

        let defaults;
        let patterns = if patterns.is_empty() {
            defaults = self
                .files
                .include
                .clone()
                .unwrap_or_else(|| vec![".".to_string()]);
            defaults.as_slice()
        } else {
            patterns
        };

        for pattern in patterns {
            let candidate = if pattern == "." {
                self.root_dir.clone()
            } else {
                self.root_dir.join(pattern)
            };
            if candidate.is_file() {
                files.insert(candidate);
            } else if candidate.is_dir() {
                files.extend(walk_directory(&candidate, &extensions));
            } else {
                files.extend(self.expand_glob(pattern)?);
            }
        }

        let mut excluded = compile_patterns(&self.files.exclude_patterns(), "exclude")?;
        excluded.extend(self.load_ignore_patterns());

        let resolved: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| !self.is_ignored(path, &excluded))
            .collect();

        debug!("Resolved {} file(s) from {:?}", resolved.len(), patterns);
        Ok(resolved)
    }

    /// Resolve and parse every file matching `patterns`
    ///
    /// Reports one equal share of progress per parsed file.
    pub fn load(&self, patterns: &[String], progress: &mut dyn ProgressSink) -> Result<Corpus> {
        let paths = self.resolve(patterns)?;
        if paths.is_empty() {
            return Err(LintseedError::empty_corpus(patterns));
        }

        info!("Parsing {} file(s)", paths.len());
        let parsed: Vec<Result<SourceUnit>> =
            paths.par_iter().map(|path| self.parse_file(path)).collect();

        let share = 1.0 / paths.len() as f64;
        let mut units = Vec::with_capacity(parsed.len());
        for result in parsed {
            units.push(result?);
            progress.report(share);
        }

        Ok(Corpus::from_units(units))
    }

    /// Read and parse one file, naming it relative to the root
    pub fn parse_file(&self, path: &Path) -> Result<SourceUnit> {
        let text = std::fs::read_to_string(path).map_err(|e| LintseedError::io_error(path, e))?;
        let display_path = path.strip_prefix(&self.root_dir).unwrap_or(path);
        SourceUnit::parse(display_path, text).map_err(|err| {
            LintseedError::corpus_parse(display_path, err.line, err.column, err.message)
        })
    }

    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            format!("{}/{}", self.root_dir.display(), pattern)
        };

        let entries = glob(&full_pattern).map_err(|e| {
            LintseedError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("Glob entry error: {}", e),
            }
        }
        Ok(files)
    }

    /// Patterns from the ignore file at the root, gitignore style
    fn load_ignore_patterns(&self) -> Vec<Pattern> {
        let ignore_path = self.root_dir.join(IGNORE_FILE_NAME);
        if !ignore_path.is_file() {
            return Vec::new();
        }

        match std::fs::read_to_string(&ignore_path) {
            Ok(content) => {
                let patterns: Vec<Pattern> = content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .filter_map(|line| Pattern::new(&ignore_line_to_glob(line)).ok())
                    .collect();
                debug!("Loaded {} patterns from {}", patterns.len(), IGNORE_FILE_NAME);
                patterns
            }
            Err(e) => {
                warn!("Failed to read {}: {}", IGNORE_FILE_NAME, e);
                Vec::new()
            }
        }
    }

    fn is_ignored(&self, path: &Path, patterns: &[Pattern]) -> bool {
        let relative = path.strip_prefix(&self.root_dir).unwrap_or(path);
        let relative = relative.to_string_lossy();
        patterns.iter().any(|pattern| pattern.matches(&relative))
    }
}

fn walk_directory(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| extensions.iter().any(|allowed| allowed.to_lowercase() == ext))
        })
        .map(|entry| entry.into_path())
        .collect()
}

fn compile_patterns(patterns: &[String], what: &str) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                LintseedError::config_error(format!("Invalid {what} pattern '{p}': {e}"))
            })
        })
        .collect()
}

/// `dir/` becomes `dir/**`, a bare name matches at any depth
fn ignore_line_to_glob(line: &str) -> String {
    if line.ends_with('/') {
        format!("{line}**")
    } else if !line.contains('*') && !line.contains('?') && !line.contains('/') {
        format!("**/{line}")
    } else {
        line.to_string()
    }
}
