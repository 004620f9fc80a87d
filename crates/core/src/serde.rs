//! Serde helper functions for request deserialization.
//!
//! Admin forms send empty strings for untouched optional inputs; these
//! helpers treat them as absent.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional UUID, treating empty strings as None.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => Uuid::parse_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        reason: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        order_id: Option<Uuid>,
    }

    #[test]
    fn test_empty_strings_become_none() {
        let payload: Payload =
            serde_json::from_str(r#"{"reason": "  ", "order_id": ""}"#).unwrap();
        assert_eq!(payload.reason, None);
        assert_eq!(payload.order_id, None);
    }

    #[test]
    fn test_missing_fields_become_none() {
        let payload: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.reason, None);
        assert_eq!(payload.order_id, None);
    }

    #[test]
    fn test_values_are_kept() {
        let payload: Payload = serde_json::from_str(
            r#"{"reason": "Refund", "order_id": "550e8400-e29b-41d4-a716-446655440000"}"#,
        )
        .unwrap();
        assert_eq!(payload.reason.as_deref(), Some("Refund"));
        assert_eq!(
            payload.order_id.unwrap().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_invalid_uuid_is_rejected() {
        let result: Result<Payload, _> = serde_json::from_str(r#"{"order_id": "nope"}"#);
        assert!(result.is_err());
    }
}
