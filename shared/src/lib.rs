//! Shared types and models for the Slab Marketplace Platform
//!
//! This crate contains the domain models, status state machines, and
//! validation helpers shared between the backend and other components
//! of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
