use thiserror::Error;

use crate::storage::RepositoryError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
