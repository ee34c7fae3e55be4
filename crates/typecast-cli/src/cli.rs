//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Typecast CLI - coerce loosely-typed JSON records into typed database columns
///
/// Detects the type of every value, validates it against the destination
/// column, converts it, and formats it for the destination dialect.
#[derive(Parser, Debug)]
#[command(
    name = "typecast",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TYPECAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform JSON records against a column schema
    Transform(TransformArgs),

    /// Report the detected source type of a value
    Detect(DetectArgs),

    /// Report the target type a declared column type normalizes to
    Normalize(NormalizeArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Column schema: a JSON or YAML list of `{name, type, nullable}`
    #[arg(short, long, value_name = "SCHEMA_FILE")]
    pub schema: PathBuf,

    /// JSON file holding an array of records
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Destination dialect (postgresql, mysql, sqlite, mssql, ...)
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Destination table name
    #[arg(short, long)]
    pub table: Option<String>,

    /// Stop at the first value that fails validation or conversion
    #[arg(long)]
    pub fail_fast: bool,

    /// Print only the batch report
    #[arg(long)]
    pub report_only: bool,

    /// Write the transformed rows to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// The value to classify; parsed as JSON unless --raw is given
    pub value: String,

    /// Treat the value as a plain string
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the normalize command
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Declared column type, e.g. "VARCHAR(255)"
    #[arg(value_name = "DECLARED_TYPE")]
    pub declared_type: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Target path (defaults to ./typecast.yaml)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Initialize the user config (~/.config/typecast/config.yaml)
    #[arg(long, conflicts_with = "path")]
    pub user: bool,

    /// Force overwrite of an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Normalize(NormalizeArgs {
                declared_type: "INT".to_string(),
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_transform_args() {
        let cli = Cli::parse_from([
            "typecast",
            "-o",
            "json",
            "transform",
            "--schema",
            "columns.yaml",
            "--input",
            "rows.json",
            "--dialect",
            "mysql",
            "--fail-fast",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Transform(args) => {
                assert_eq!(args.schema, PathBuf::from("columns.yaml"));
                assert_eq!(args.dialect.as_deref(), Some("mysql"));
                assert!(args.fail_fast);
                assert!(!args.report_only);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
