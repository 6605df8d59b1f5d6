//! Classified query results and the port through which confirmed accessories
//! leave the core.

use std::fmt;
use std::io;
use std::net::Ipv4Addr;

/// A host confirmed to run the accessory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryRecord {
    pub host: Ipv4Addr,
    /// Normalized attribute string, e.g. `iPerf Remote MAC=AA:BB:CC:DD:EE:FF`.
    pub attributes: String,
}

impl AccessoryRecord {
    pub fn new(host: Ipv4Addr, attributes: String) -> Self {
        Self { host, attributes }
    }
}

/// Renders the persisted line format `<host>: <attributes>`.
impl fmt::Display for AccessoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.host, self.attributes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    NoResponse,
    DecodeError,
    MarkerNotFound,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason: &str = match self {
            InvalidReason::NoResponse => "no response",
            InvalidReason::DecodeError => "decode error",
            InvalidReason::MarkerNotFound => "marker not found",
        };
        f.write_str(reason)
    }
}

/// A queried host that did not turn out to be an accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResponse {
    pub host: Ipv4Addr,
    pub reason: InvalidReason,
    /// Decoded reply, kept for diagnostics only.
    pub text: Option<String>,
}

/// Persistence collaborator receiving the confirmed accessories of a run.
pub trait AccessoryStore: Send {
    fn append(&mut self, records: &[AccessoryRecord]) -> io::Result<()>;
}

impl AccessoryStore for Vec<AccessoryRecord> {
    fn append(&mut self, records: &[AccessoryRecord]) -> io::Result<()> {
        self.extend_from_slice(records);
        Ok(())
    }
}
