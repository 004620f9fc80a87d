use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    /// A compare-and-swap write found state different from what was read.
    #[error("{entity_type} was modified concurrently: {id}")]
    Conflict {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "StoreCredit",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "StoreCredit not found: abc-123");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "StoreCredit",
            id: "customer-1".to_string(),
        };
        assert_eq!(error.to_string(), "StoreCredit already exists: customer-1");
    }

    #[test]
    fn test_repository_error_conflict_display() {
        let error = RepositoryError::Conflict {
            entity_type: "StoreCredit",
            id: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "StoreCredit was modified concurrently: abc");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("balance is NaN".to_string());
        assert_eq!(error.to_string(), "Invalid data: balance is NaN");
    }
}
