//! Balance CLI commands.

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use storecredit_core::credit::CreditOperationRequest;

/// Balance and ledger commands.
#[derive(Debug, Parser)]
pub struct CreditsCommand {
    #[command(subcommand)]
    pub action: CreditsAction,
}

/// Arguments shared by add and deduct.
#[derive(Debug, Args)]
pub struct OperationArgs {
    /// Customer ID.
    pub customer_id: Uuid,
    /// Money amount; converted to credits by the server.
    #[arg(long)]
    pub amount: f64,
    /// Reason recorded in the ledger.
    #[arg(long)]
    pub reason: Option<String>,
    /// Related order ID.
    #[arg(long)]
    pub order_id: Option<Uuid>,
    /// Currency ID.
    #[arg(long)]
    pub currency_id: Option<Uuid>,
}

impl From<OperationArgs> for CreditOperationRequest {
    fn from(args: OperationArgs) -> Self {
        Self {
            customer_id: args.customer_id,
            amount: args.amount,
            reason: args.reason,
            order_id: args.order_id,
            currency_id: args.currency_id,
        }
    }
}

/// Available balance actions.
#[derive(Debug, Subcommand)]
pub enum CreditsAction {
    /// List all balances.
    List,
    /// Add credit to a customer.
    Add(OperationArgs),
    /// Deduct credit from a customer.
    Deduct(OperationArgs),
    /// Show a customer's balance.
    Balance {
        /// Customer ID.
        customer_id: Uuid,
    },
    /// Show the ledger of a balance, newest first.
    History {
        /// Store credit ID.
        id: Uuid,
    },
    /// Delete a balance and its history.
    Delete {
        /// Store credit ID.
        id: Uuid,
    },
}
