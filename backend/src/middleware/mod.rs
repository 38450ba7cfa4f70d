//! Middleware for the Slab Marketplace Platform

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
