//! Application state with repository-based storage.
//!
//! The state holds the service layer and the repositories the handlers read
//! directly. Exactly one storage backend is compiled in, selected by feature
//! flag.

use std::sync::Arc;

use storecredit_core::auth::SessionRepository;
use storecredit_core::storage::{
    CustomFieldRepository, CustomerRepository, HistoryRepository, SettingsRepository,
    StateMachineRepository, StoreCreditRepository,
};

use crate::config::Config;
use crate::service::{CustomFieldMigration, OrderStateInstaller, StoreCreditManager};

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

/// Shared application state.
///
/// Cloned for each request handler; everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: StoreCreditManager,
    pub installer: OrderStateInstaller,
    pub migration: CustomFieldMigration,
    pub customers: Arc<dyn CustomerRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl AppState {
    /// Wires the services around a single repository implementing every port.
    pub fn from_repository<R>(repo: Arc<R>, config: Config) -> Self
    where
        R: StoreCreditRepository
            + HistoryRepository
            + CustomerRepository
            + SettingsRepository
            + SessionRepository
            + StateMachineRepository
            + CustomFieldRepository
            + 'static,
    {
        let store_credits: Arc<dyn StoreCreditRepository> = repo.clone();
        let history: Arc<dyn HistoryRepository> = repo.clone();
        let customers: Arc<dyn CustomerRepository> = repo.clone();
        let settings: Arc<dyn SettingsRepository> = repo.clone();
        let sessions: Arc<dyn SessionRepository> = repo.clone();
        let state_machines: Arc<dyn StateMachineRepository> = repo.clone();
        let custom_fields: Arc<dyn CustomFieldRepository> = repo;

        let manager = StoreCreditManager::new(
            store_credits,
            history,
            customers.clone(),
            settings,
            config.ledger_max_attempts,
        );
        let installer =
            OrderStateInstaller::new(state_machines, config.state_machine_name.clone());
        let migration = CustomFieldMigration::new(custom_fields);

        Self {
            config: Arc::new(config),
            manager,
            installer,
            migration,
            customers,
            sessions,
        }
    }
}

// ============================================================================
// Backend-specific constructors
// ============================================================================

#[cfg(feature = "inmemory")]
impl AppState {
    /// Creates the state on an in-memory store seeded with the host's
    /// return state machine.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        use crate::storage::InMemoryRepository;

        tracing::info!("Using in-memory storage");
        let repo = Arc::new(InMemoryRepository::with_host_defaults());
        Ok(Self::from_repository(repo, config))
    }
}

#[cfg(feature = "sqlite")]
impl AppState {
    /// Opens (or creates) the SQLite database at `config.sqlite_path`.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        use crate::storage::SqliteRepository;

        tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
        let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
        Ok(Self::from_repository(repo, config))
    }
}

#[cfg(all(test, feature = "inmemory"))]
pub(crate) mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;

    /// State over a fresh in-memory store with the host defaults.
    pub fn test_state(config: Config) -> AppState {
        AppState::from_repository(Arc::new(InMemoryRepository::with_host_defaults()), config)
    }
}
