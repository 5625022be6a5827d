//! Init command implementation
//!
//! Runs automatic configuration over the project's sources and writes the
//! discovered configuration.

use colored::Colorize;
use lintseed_core::{
    AutoConfigurator, CancellationToken, ConfigFormat, ConfigLoader, CorpusLoader, LintseedError,
    Result, extend_from_recommended, split_patterns,
};
use lintseed_rules::builtin_catalog;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::output::{ProgressReporter, print_decisions, utils::format_duration};

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub patterns: Vec<String>,
    pub format: ConfigFormat,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub extend_recommended: bool,
    pub show_progress: bool,
    pub timeout: Option<u64>,
    pub explain: bool,
    pub config_path: Option<PathBuf>,
}

/// Discover a configuration for the current directory
pub fn init_command(options: InitOptions) -> Result<()> {
    let root = std::env::current_dir().map_err(|e| LintseedError::io_error(".", e))?;

    let to_stdout = options.output.as_deref() == Some(Path::new("-"));
    let target = options
        .output
        .clone()
        .unwrap_or_else(|| root.join(options.format.file_name()));
    if !to_stdout && target.exists() && !options.force {
        return Err(LintseedError::config_error(format!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            target.display()
        )));
    }

    let base = ConfigLoader::load(options.config_path.as_deref(), Some(root.as_path()))?;
    let patterns: Vec<String> = options
        .patterns
        .iter()
        .flat_map(|p| split_patterns(p))
        .collect();
    debug!("Discovering configuration for patterns {:?}", patterns);

    let catalog = builtin_catalog();
    let token = CancellationToken::new();
    match options.timeout {
        Some(0) => token.cancel(),
        Some(seconds) => spawn_timeout(token.clone(), Duration::from_secs(seconds)),
        None => {}
    }

    let start = Instant::now();
    let mut progress = ProgressReporter::new(options.show_progress, "Analyzing");
    let result = AutoConfigurator::new(&catalog, &root)
        .with_loader(CorpusLoader::new(&root).with_files_config(base.files_config()))
        .with_cancellation(token)
        .discover(&base, &patterns, &mut progress);
    progress.finish();
    let outcome = result?;
    info!("Discovery finished in {}", format_duration(start.elapsed()));

    let config = if options.extend_recommended {
        extend_from_recommended(&outcome.config, &catalog)
    } else {
        outcome.config.clone()
    };

    if options.explain {
        print_decisions(&outcome.decisions);
    }

    if to_stdout {
        print!("{}", options.format.render(&config)?);
        eprintln!("{}", outcome.summary());
    } else {
        ConfigLoader::write(&target, &config, options.format)?;
        println!("{}", outcome.summary());
        println!(
            "{} Created configuration file: {}",
            "✅".green(),
            target.display()
        );
    }

    Ok(())
}

/// Cancel `token` once `after` has elapsed
fn spawn_timeout(token: CancellationToken, after: Duration) {
    thread::spawn(move || {
        thread::sleep(after);
        if !token.is_cancelled() {
            warn!("Discovery timed out after {}s", after.as_secs());
            token.cancel();
        }
    });
}
