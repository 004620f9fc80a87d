//! Definitions of the store-credit custom-field set and its field.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::types::{CustomField, CustomFieldSet, CustomFieldSetRelation};
use crate::credit::VALUE_PER_UNIT_FIELD;

/// Creation timestamp identifying the migration.
pub const MIGRATION_TIMESTAMP: i64 = 1_769_640_000;

pub const STORE_CREDIT_SET: &str = "store_credit";

/// Entities the set is attached to.
pub const RELATED_ENTITIES: [&str; 2] = ["customer", "customer_group"];

const DEFAULT_LOCALE: &str = "en-GB";

pub fn store_credit_set(now: DateTime<Utc>) -> CustomFieldSet {
    CustomFieldSet {
        id: Uuid::new_v4(),
        name: STORE_CREDIT_SET.to_string(),
        config: json!({ "label": { DEFAULT_LOCALE: "Store credit" } }),
        active: true,
        created_at: now,
    }
}

pub fn value_per_unit_field(set_id: Uuid, now: DateTime<Utc>) -> CustomField {
    CustomField {
        id: Uuid::new_v4(),
        name: VALUE_PER_UNIT_FIELD.to_string(),
        field_type: "float".to_string(),
        config: json!({
            "label": { DEFAULT_LOCALE: "Value per 1 credit" },
            "helpText": {
                DEFAULT_LOCALE: "Overrides the default value per credit. Can be set on customers and customer groups (e.g. 1 = $1 per credit, 3 = $3 per credit)."
            },
            "componentName": "sw-field",
            "customFieldType": "float",
        }),
        active: true,
        set_id,
        created_at: now,
    }
}

pub fn set_relation(set_id: Uuid, entity_name: &str, now: DateTime<Utc>) -> CustomFieldSetRelation {
    CustomFieldSetRelation {
        id: Uuid::new_v4(),
        set_id,
        entity_name: entity_name.to_string(),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_is_float_in_store_credit_set() {
        let now = Utc::now();
        let set = store_credit_set(now);
        let field = value_per_unit_field(set.id, now);

        assert_eq!(set.name, "store_credit");
        assert_eq!(set.config["label"]["en-GB"], "Store credit");
        assert_eq!(field.name, "store_credit_value_per_unit");
        assert_eq!(field.field_type, "float");
        assert_eq!(field.set_id, set.id);
        assert_eq!(field.config["label"]["en-GB"], "Value per 1 credit");
        assert_eq!(field.config["componentName"], "sw-field");
        assert!(field.config["helpText"]["en-GB"]
            .as_str()
            .unwrap()
            .starts_with("Overrides the default value per credit"));
    }

    #[test]
    fn test_relation_targets_entity() {
        let relation = set_relation(Uuid::nil(), "customer_group", Utc::now());
        assert_eq!(relation.entity_name, "customer_group");
        assert_eq!(relation.set_id, Uuid::nil());
    }
}
