mod definitions;
mod error;
mod types;

pub use definitions::{
    set_relation, store_credit_set, value_per_unit_field, MIGRATION_TIMESTAMP, RELATED_ENTITIES,
    STORE_CREDIT_SET,
};
pub use error::MigrationError;
pub use types::{CustomField, CustomFieldSet, CustomFieldSetRelation, MigrationOutcome};
