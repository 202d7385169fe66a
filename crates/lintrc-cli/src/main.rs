//! lintrc CLI
//!
//! Command-line interface for resolving and inspecting lint policies

mod commands; // resolve, rules, config, schema
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use lintrc_core::{Result, init_tracing_with};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "lintrc")]
#[command(about = "lintrc: resolve layered lint configuration into per-file policies")]
#[command(version = lintrc_core::VERSION)]
#[command(
    long_about = "lintrc composes policy documents (extends chains, environments, plugins\n\
and path-scoped overrides) into the effective rule set for each file.\n\
\n\
Examples:\n  \
lintrc resolve src/app.ts          # Effective policy for one file\n  \
lintrc resolve --format json a.js  # Same, as JSON\n  \
lintrc config validate             # Check the nearest .lintrc file\n  \
lintrc rules --detailed            # List all known rules\n  \
lintrc config init                 # Create a configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        env = "LINTRC_CONFIG",
        help = "Use only this configuration file instead of the .lintrc files above each target"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Fail on unknown rules and environments
    #[arg(
        long,
        global = true,
        help = "Treat unknown rules and environments as errors"
    )]
    strict: bool,

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
    /// Print the effective policy for one or more files
    Resolve {
        /// Files to resolve
        #[arg(required = true, help = "Files to compute the effective policy for")]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,

        /// Leave disabled rules out of the output
        #[arg(long, help = "Only show rules that are not turned off")]
        only_enabled: bool,
    },

    /// Inspect the built-in rule catalog
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,

        /// Show detailed rule information
        #[arg(long, help = "Show detailed information for each rule")]
        detailed: bool,

        /// Filter rules by category
        #[arg(long, help = "Filter rules by category (problem, suggestion, layout)")]
        category: Option<String>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the JSON Schema of configuration documents
    Schema,

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
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,

        /// Include example rules and settings
        #[arg(long, help = "Include example rules, environments and overrides")]
        with_examples: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(help = "Path to configuration file (default: search for .lintrc)")]
        path: Option<PathBuf>,
    },

    /// Show current configuration
    Show {
        /// Show resolved configuration (after inheritance and merging)
        #[arg(long, help = "Show configuration after resolving extends")]
        resolved: bool,
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

    /// Search rules by name or description
    Search {
        /// Search query
        #[arg(help = "Search query for rule names or descriptions")]
        query: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
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

fn main() {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "lintrc=error",
        1 => "lintrc=warn",
        2 => "lintrc=info",
        3 => "lintrc=debug",
        _ => "lintrc=trace",
    };
    init_tracing_with(log_level);

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        error!("lintrc failed: {}", e);
        std::process::exit(1);
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> Result<()> {
    let use_colors = !cli.no_color && std::env::var("NO_COLOR").is_err();

    match cli.command {
        Some(Commands::Resolve {
            files,
            format,
            only_enabled,
        }) => commands::resolve_command(
            files,
            format,
            only_enabled,
            cli.strict,
            cli.config,
            use_colors,
        ),

        Some(Commands::Rules {
            action,
            detailed,
            category,
        }) => match action {
            Some(RulesAction::List) | None => commands::rules_list_command(detailed, category),
            Some(RulesAction::Explain { rule_id }) => commands::rules_explain_command(rule_id),
            Some(RulesAction::Search { query }) => commands::rules_search_command(query),
        },

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init {
                format,
                force,
                with_examples,
            } => commands::config::init_command(format, force, with_examples),
            ConfigAction::Validate { path } => {
                commands::config::validate_command(path.or(cli.config), cli.strict)
            }
            ConfigAction::Show { resolved } => commands::config::show_command(resolved, cli.config),
        },

        Some(Commands::Schema) => commands::schema_command(),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("lintrc {}", lintrc_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!(
                    "  Rules: {} built-in, {} plugins",
                    lintrc_rules::BuiltinRules::all_rules().len(),
                    lintrc_rules::KNOWN_PLUGINS.len()
                );
                println!(
                    "  Presets: {}",
                    lintrc_rules::Presets::new()
                        .names()
                        .map(|name| format!("lintrc:{name}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            } else {
                println!("{}", lintrc_core::VERSION);
            }
            Ok(())
        }

        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
