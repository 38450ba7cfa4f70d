//! HTTP handlers for the Slab Marketplace Platform

pub mod auth;
pub mod batch;
pub mod health;
pub mod industry;
pub mod lead;
pub mod reservation;
pub mod sale;

pub use auth::{login, refresh, register};
pub use batch::{
    archive_batch, create_batch, get_batch, get_batch_price, list_batches, update_batch,
};
pub use health::health_check;
pub use industry::get_my_industry;
pub use lead::{create_lead, get_lead, list_leads};
pub use reservation::{
    cancel_reservation, confirm_sale, create_reservation, expire_reservations, get_reservation,
    list_active_reservations,
};
pub use sale::{get_reservation_sale, get_sale, list_sales};
