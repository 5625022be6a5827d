//! lintseed CLI
//!
//! Command-line interface for discovering and applying lint configurations

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use lintseed_core::{Result, init_tracing_with_default};
use std::io;
use std::path::PathBuf;
use tracing::error;

use commands::init::InitOptions;

#[derive(Parser)]
#[command(name = "lintseed")]
#[command(about = "lintseed: discover a lint configuration that fits your code")]
#[command(version = lintseed_core::VERSION)]
#[command(
    long_about = "lintseed tries every candidate setting of every rule against your sources\n\
and writes the most specific configuration that produces no findings.\n\
\n\
Examples:\n  \
lintseed init                      # Discover a config for the current directory\n  \
lintseed init 'src/**/*.js' --format yaml\n  \
lintseed lint src/                 # Lint with the discovered config\n  \
lintseed rules explain indent      # Show a rule's options and candidates"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.lintseedrc.json/.yaml/.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover a rule configuration from existing source files
    Init {
        /// Files, directories or glob patterns to analyze
        #[arg(help = "Patterns to analyze (default: configured include or current directory)")]
        patterns: Vec<String>,

        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Output file, or '-' for stdout
        #[arg(short, long, help = "Output path, '-' prints to stdout")]
        output: Option<PathBuf>,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,

        /// Extend the recommended configuration instead of listing every rule
        #[arg(long, help = "Extend lintseed:recommended and omit rules it already sets")]
        extend_recommended: bool,

        /// Hide the progress bar
        #[arg(long, help = "Do not show a progress bar")]
        no_progress: bool,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS", help = "Cancel discovery after SECS seconds")]
        timeout: Option<u64>,

        /// Print the decision taken for each rule
        #[arg(long, help = "Explain the setting chosen for each rule")]
        explain: bool,
    },

    /// Lint files with the current configuration
    #[command(alias = "check")]
    Lint {
        /// Files, directories or glob patterns to lint
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<String>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for findings"
        )]
        format: OutputFormat,
    },

    /// Inspect the rule catalog
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,

        /// Show detailed rule information
        #[arg(long, help = "Show options and candidate counts for each rule")]
        detailed: bool,

        /// Filter rules by category
        #[arg(long, help = "Filter rules by category (correctness, suspicious, style, layout)")]
        category: Option<String>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the JSON Schema of configuration files
    Schema,

    /// Show current configuration
    Show {
        /// Output format
        #[arg(long, default_value = "json", help = "Format to print the configuration in")]
        format: ConfigFormat,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List all available rules
    List,

    /// Show detailed information about a specific rule
    Explain {
        /// Rule ID to explain
        #[arg(help = "Rule ID to show detailed information for")]
        rule_id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// Compact one-line summary
    Compact,
    /// GitHub Actions format
    Github,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// YAML configuration format
    Yaml,
    /// TOML configuration format
    Toml,
}

impl From<ConfigFormat> for lintseed_core::ConfigFormat {
    fn from(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Json => lintseed_core::ConfigFormat::Json,
            ConfigFormat::Yaml => lintseed_core::ConfigFormat::Yaml,
            ConfigFormat::Toml => lintseed_core::ConfigFormat::Toml,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    // Initialize colored output
    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    // RUST_LOG still takes precedence over -v
    let log_level = match cli.verbose {
        0 => "lintseed=error",
        1 => "lintseed=warn",
        2 => "lintseed=info",
        3 => "lintseed=debug",
        _ => "lintseed=trace",
    };
    init_tracing_with_default(log_level);

    // Set thread pool size if specified
    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        error!("lintseed failed: {}", e);
        std::process::exit(1);
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init {
            patterns,
            format,
            output,
            force,
            extend_recommended,
            no_progress,
            timeout,
            explain,
        }) => commands::init::init_command(InitOptions {
            patterns,
            format: format.into(),
            output,
            force,
            extend_recommended,
            show_progress: !no_progress,
            timeout,
            explain,
            config_path: cli.config,
        }),

        Some(Commands::Lint { paths, format }) => {
            commands::lint_command(paths, format, cli.config)
        }

        Some(Commands::Rules {
            action,
            detailed,
            category,
        }) => match action {
            Some(RulesAction::List) | None => commands::rules_list_command(detailed, category),
            Some(RulesAction::Explain { rule_id }) => commands::rules_explain_command(&rule_id),
        },

        Some(Commands::Config { action }) => match action {
            ConfigAction::Schema => commands::config_schema_command(),
            ConfigAction::Show { format } => {
                commands::config_show_command(format.into(), cli.config)
            }
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("lintseed {}", lintseed_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!("  Built-in rules: {}", lintseed_rules::builtin_catalog().len());
            } else {
                println!("{}", lintseed_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()
                .map_err(|e| lintseed_core::LintseedError::io_error("<stdout>", e))?;
            Ok(())
        }
    }
}
