// # ipam-core
//
// Core library for tracking ownership of individual IP addresses drawn
// from administrator-supplied CIDR ranges.
//
// ## Architecture Overview
//
// - **AddressStore**: Trait for durable keyed storage of address records
// - **MemoryAddressStore / FileAddressStore**: Bundled store implementations
// - **AddressPool**: CIDR expansion and the acquire/release state machine
//
// ## Design Principles
//
// 1. **Stateless Pool**: All durable state lives behind `AddressStore`
// 2. **Insert-Only Registration**: Re-registering a range never resets a record
// 3. **Guarded Acquire**: Concurrent acquires on one address yield one winner
// 4. **Library-First**: Transports are thin shims over `AddressPool`

pub mod config;
pub mod error;
pub mod model;
pub mod pool;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{IpamConfig, PoolConfig, StoreConfig};
pub use error::{Error, Result};
pub use model::{Address, AddressStatus};
pub use pool::AddressPool;
pub use store::{FileAddressStore, MemoryAddressStore, open_store};
pub use traits::{AddressStore, SwapOutcome};
