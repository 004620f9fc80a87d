//! CLI command definitions.

pub mod config;
pub mod credits;
pub mod customers;
pub mod health;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI client for the store credit admin API.
#[derive(Debug, Parser)]
#[command(name = "storecredit-client")]
#[command(about = "CLI client for the store credit admin API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "STORECREDIT_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Admin API bearer token.
    #[arg(long, env = "STORECREDIT_ADMIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Balances and ledger entries.
    Credits(credits::CreditsCommand),
    /// Customers and their effective rates.
    Customers(customers::CustomersCommand),
    /// Default value per credit.
    Config(config::ConfigCommand),
    /// Server health checks.
    Health(health::HealthCommand),
}
