//! Authentication Module
//! Mission: Secure API access with JWT tokens and ownership-scoped identities

pub mod api;
pub mod guard;
pub mod jwt;
pub mod models;
pub mod user_store;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use models::CurrentUser;
pub use user_store::UserStore;
