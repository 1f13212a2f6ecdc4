//! SQLite storage backend.
//!
//! Every namespace of a [`tax_core::db::KeyValueRepository`] is one row of
//! the `kv_store` table.

mod factory;
mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
