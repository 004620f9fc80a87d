//! Rate configuration CLI commands.

use clap::{Parser, Subcommand};

/// Configuration commands.
#[derive(Debug, Parser)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Available configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the default value per credit.
    Get,
    /// Set the default value per credit.
    Set {
        /// Money value of one credit.
        value: f64,
    },
}
