//! Todos Module
//! Mission: Ownership-scoped task CRUD backed by SQLite

pub mod api;
pub mod models;
pub mod store;

pub use api::TodoState;
pub use store::TodoStore;
