//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};

/// Storm on Demand API CLI
#[derive(Parser, Debug)]
#[command(name = "stormctl")]
#[command(version, about = "Storm on Demand API CLI", long_about = None)]
pub struct Cli {
    /// API user (overrides config file)
    #[arg(short, long)]
    pub user: Option<String>,

    /// API password (overrides config file)
    #[arg(long)]
    pub password: Option<String>,

    /// API base URL (overrides config file)
    #[arg(short, long)]
    pub api_url: Option<String>,

    /// API version (overrides config file)
    #[arg(long)]
    pub api_version: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bracketed path breadcrumbs, one line per value
    Breadcrumbs,
    /// JSON output
    Json,
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Breadcrumbs => crate::format::OutputFormat::Breadcrumbs,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call an API method once and display the response
    Call {
        /// API method, e.g. "storm/server/list"
        method: String,

        /// Method parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },

    /// List every method the API publishes
    Methods,

    /// Show parameter requirements for a method
    Params {
        /// API method, e.g. "storm/server/create"
        method: String,
    },

    /// Start an interactive session
    Shell {
        /// Initial API method (prompted for when omitted)
        method: Option<String>,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,
}
