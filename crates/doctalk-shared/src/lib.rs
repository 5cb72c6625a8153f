//! # doctalk-shared
//!
//! Identifier newtypes, delivery states and protocol constants shared by the
//! doctalk crates.  This crate performs no I/O.

pub mod constants;
pub mod types;

pub use types::{ClientId, DeliveryState, DocumentId};
