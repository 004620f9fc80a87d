//! In-memory storage backend.
//!
//! Stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. Useful for tests
//! and local development where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use storecredit::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::with_host_defaults();
//! ```

mod repository;

pub use repository::InMemoryRepository;
