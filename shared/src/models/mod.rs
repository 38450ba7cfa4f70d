//! Domain models for the Slab Marketplace Platform

pub mod batch;
pub mod industry;
pub mod lead;
pub mod reservation;
pub mod sale;
pub mod user;

pub use batch::*;
pub use industry::*;
pub use lead::*;
pub use reservation::*;
pub use sale::*;
pub use user::*;
