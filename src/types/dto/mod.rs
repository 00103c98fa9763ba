// DTOs - Request/response models for the HTTP surface
pub mod auth;
