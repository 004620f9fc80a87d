//! storecredit_client - CLI client for the store credit admin API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;

pub use client::StoreCreditClient;
pub use error::{ClientError, Result};
