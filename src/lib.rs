pub mod comments;
pub mod error;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod score;
pub mod store;

// Re-export commonly used items for tests / external users
pub use routes::{config, AppState};
pub use store::{DocumentStore, FsDocumentStore};
