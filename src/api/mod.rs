// API layer - HTTP endpoints
pub mod auth;

pub use auth::AuthenticationApi;
