use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A named group of custom fields shown together in the admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldSet {
    pub id: Uuid,
    pub name: String,
    pub config: Value,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: Uuid,
    pub name: String,
    pub field_type: String,
    pub config: Value,
    pub active: bool,
    pub set_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Attaches a set to an entity such as `customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldSetRelation {
    pub id: Uuid,
    pub set_id: Uuid,
    pub entity_name: String,
    pub created_at: DateTime<Utc>,
}

/// What a migration run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationOutcome {
    /// The custom-field tables were missing; nothing was done.
    pub skipped: bool,
    pub set_created: bool,
    pub field_created: bool,
    pub relations_created: Vec<String>,
}

impl MigrationOutcome {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn changed_anything(&self) -> bool {
        self.set_created || self.field_created || !self.relations_created.is_empty()
    }
}
