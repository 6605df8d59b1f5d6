//! Shared building blocks for accessory discovery.
//!
//! Everything here is free of sockets and runtimes: the immutable run
//! [`config::Config`], the data model that flows between the scan phases,
//! the persistence port and the CIDR expansion used to build the host list.

pub mod accessory;
pub mod config;
pub mod error;
pub mod network;
pub mod summary;

pub use config::Config;
pub use error::DiscoveryError;
