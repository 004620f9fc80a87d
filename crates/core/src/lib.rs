//! Functional core for the store credit ledger.
//!
//! Pure domain types and decisions with no I/O. The server crate supplies the
//! repository implementations and drives these functions.

pub mod auth;
pub mod credit;
pub mod custom_field;
pub mod serde;
pub mod state_machine;
pub mod storage;
