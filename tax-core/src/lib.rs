pub mod calculations;
pub mod chat;
pub mod clock;
pub mod db;
pub mod history;
pub mod models;
pub mod state;

pub use calculations::TaxEstimator;
pub use chat::{ChatMessage, ChatRole};
pub use db::{KeyValueRepository, RepositoryError};
pub use history::{HistoryError, HistoryFilter, HistoryStore};
pub use models::*;
pub use state::{AppState, StateError};
