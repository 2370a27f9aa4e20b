//! Core traits for the IP address pool
//!
//! - [`AddressStore`]: Durable keyed storage of address records

pub mod address_store;

pub use address_store::{AddressStore, SwapOutcome};
