use clap::{Parser, Subcommand};

/// Customer commands.
#[derive(Debug, Parser)]
pub struct CustomersCommand {
    #[command(subcommand)]
    pub action: CustomersAction,
}

#[derive(Debug, Subcommand)]
pub enum CustomersAction {
    /// List customers with their effective value per credit.
    List,
}
