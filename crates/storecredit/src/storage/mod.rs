//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `storecredit_core::storage`, selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): HashMaps behind `tokio::sync::RwLock`
//! - `sqlite`: SQLite using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p storecredit --no-default-features --features sqlite
//! ```

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
