//! Business logic services for the Slab Marketplace Platform

pub mod auth;
pub mod batch;
pub mod industry;
pub mod lead;
pub mod reservation;
pub mod sale;

pub use auth::AuthService;
pub use batch::BatchService;
pub use industry::IndustryService;
pub use lead::LeadService;
pub use reservation::ReservationService;
pub use sale::SaleService;
