//! Persistence layer for batches, reservations, and the sale ledger
//!
//! Store functions come in two explicit flavors: `*_tx` variants take a
//! `&mut PgConnection` and run inside a caller-owned transaction, while
//! pool variants open their own connection and autocommit. The locking
//! read `find_by_id_for_update` requires a `Transaction` parameter, so a
//! row lock without a transaction boundary cannot be expressed.

pub mod batch;
pub mod reservation;
pub mod sale;
