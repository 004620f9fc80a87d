//! Plugin services: the credit ledger, the return-state installer and the
//! custom-field migration.

mod installer;
mod manager;
mod migration;

pub use installer::OrderStateInstaller;
pub use manager::StoreCreditManager;
pub use migration::CustomFieldMigration;
