//! The two-phase discovery engine.
//!
//! * [`network`]: single-host socket work (connect probe, query exchange).
//! * [`scanner`]: bounded fan-out of that work over many hosts.
//! * [`classifier`]: turning raw replies into accessory records.
//! * [`discovery`]: the coordinator driving a whole run.
//! * [`store`]: file persistence for confirmed accessories.

pub mod classifier;
pub mod discovery;
pub mod network;
pub mod scanner;
pub mod store;

pub use discovery::{DiscoveryReport, DiscoveryService, Phase};
pub use store::FileAccessoryStore;
