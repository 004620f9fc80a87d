//! Custom-field migration for per-customer and per-group credit rates.

use std::sync::Arc;

use chrono::Utc;

use storecredit_core::credit::VALUE_PER_UNIT_FIELD;
use storecredit_core::custom_field::{
    set_relation, store_credit_set, value_per_unit_field, MigrationError, MigrationOutcome,
    MIGRATION_TIMESTAMP, RELATED_ENTITIES, STORE_CREDIT_SET,
};
use storecredit_core::storage::CustomFieldRepository;

/// Creates the `store_credit` custom-field set with the value-per-credit
/// field and attaches it to customers and customer groups.
#[derive(Clone)]
pub struct CustomFieldMigration {
    repo: Arc<dyn CustomFieldRepository>,
}

impl CustomFieldMigration {
    pub fn new(repo: Arc<dyn CustomFieldRepository>) -> Self {
        Self { repo }
    }

    pub fn creation_timestamp(&self) -> i64 {
        MIGRATION_TIMESTAMP
    }

    pub async fn update(&self) -> Result<MigrationOutcome, MigrationError> {
        if !self.repo.custom_fields_available().await? {
            tracing::warn!(
                migration = MIGRATION_TIMESTAMP,
                "Custom field tables missing, skipping migration"
            );
            return Ok(MigrationOutcome::skipped());
        }

        let now = Utc::now();
        let mut outcome = MigrationOutcome::default();

        let set = match self.repo.find_set(STORE_CREDIT_SET).await? {
            Some(set) => set,
            None => {
                let set = store_credit_set(now);
                self.repo.create_set(&set).await?;
                outcome.set_created = true;
                set
            }
        };

        if self.repo.find_field(VALUE_PER_UNIT_FIELD).await?.is_none() {
            self.repo
                .create_field(&value_per_unit_field(set.id, now))
                .await?;
            outcome.field_created = true;
        }

        for entity in RELATED_ENTITIES {
            if !self.repo.relation_exists(set.id, entity).await? {
                self.repo
                    .create_relation(&set_relation(set.id, entity, now))
                    .await?;
                outcome.relations_created.push(entity.to_string());
            }
        }

        tracing::info!(
            migration = MIGRATION_TIMESTAMP,
            set_created = outcome.set_created,
            field_created = outcome.field_created,
            relations_created = ?outcome.relations_created,
            "Custom field migration applied"
        );
        Ok(outcome)
    }

    pub async fn update_destructive(&self) -> Result<(), MigrationError> {
        Ok(())
    }

    /// Detaches the set from every entity, keeping the definitions.
    pub async fn detach(&self) -> Result<u64, MigrationError> {
        let Some(set) = self.repo.find_set(STORE_CREDIT_SET).await? else {
            return Ok(0);
        };
        let removed = self.repo.delete_relations(set.id).await?;
        tracing::info!(removed, "Detached store credit custom field set");
        Ok(removed)
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;

    #[tokio::test]
    async fn test_update_creates_everything_once() {
        let repo = InMemoryRepository::new();
        let migration = CustomFieldMigration::new(Arc::new(repo.clone()));

        let first = migration.update().await.unwrap();
        assert!(first.set_created);
        assert!(first.field_created);
        assert_eq!(first.relations_created, vec!["customer", "customer_group"]);

        let second = migration.update().await.unwrap();
        assert!(!second.changed_anything());
        assert!(!second.skipped);

        let field = repo.find_field(VALUE_PER_UNIT_FIELD).await.unwrap().unwrap();
        let set = repo.find_set(STORE_CREDIT_SET).await.unwrap().unwrap();
        assert_eq!(field.set_id, set.id);
        assert_eq!(field.field_type, "float");
    }

    #[tokio::test]
    async fn test_update_skips_without_tables() {
        let repo = InMemoryRepository::new().without_custom_fields();
        let migration = CustomFieldMigration::new(Arc::new(repo.clone()));

        let outcome = migration.update().await.unwrap();

        assert_eq!(outcome, MigrationOutcome::skipped());
        assert!(repo.find_set(STORE_CREDIT_SET).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_detach_removes_relations_only() {
        let repo = InMemoryRepository::new();
        let migration = CustomFieldMigration::new(Arc::new(repo.clone()));
        migration.update().await.unwrap();

        assert_eq!(migration.detach().await.unwrap(), 2);

        let set = repo.find_set(STORE_CREDIT_SET).await.unwrap().unwrap();
        assert!(!repo.relation_exists(set.id, "customer").await.unwrap());
        assert!(repo.find_field(VALUE_PER_UNIT_FIELD).await.unwrap().is_some());

        let reattached = migration.update().await.unwrap();
        assert_eq!(reattached.relations_created.len(), 2);
    }

    #[tokio::test]
    async fn test_timestamp_and_destructive_noop() {
        let migration = CustomFieldMigration::new(Arc::new(InMemoryRepository::new()));
        assert_eq!(migration.creation_timestamp(), 1_769_640_000);
        migration.update_destructive().await.unwrap();
    }
}
