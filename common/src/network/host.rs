use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

/// Outcome of the connect probe against one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    pub host: Ipv4Addr,
    pub reachable: bool,
    pub latency: Duration,
}

impl ScanResult {
    pub fn reachable(host: Ipv4Addr, latency: Duration) -> Self {
        Self {
            host,
            reachable: true,
            latency,
        }
    }

    pub fn unreachable(host: Ipv4Addr, latency: Duration) -> Self {
        Self {
            host,
            reachable: false,
            latency,
        }
    }
}

/// Why a query produced no usable reply.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFailure {
    #[error("connect timed out")]
    ConnectTimeout,

    #[error("connect failed: {0}")]
    ConnectFailed(ErrorKind),

    #[error("write failed: {0}")]
    WriteFailed(ErrorKind),

    #[error("read failed: {0}")]
    ReadFailed(ErrorKind),

    #[error("no reply before the query timeout")]
    ReplyTimeout,

    #[error("query task aborted")]
    Aborted,
}

/// Raw result of the query exchange with one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub host: Ipv4Addr,
    /// Bytes received from the peer, possibly empty.
    pub reply: Vec<u8>,
    pub failure: Option<QueryFailure>,
}

impl QueryOutcome {
    pub fn replied(host: Ipv4Addr, reply: Vec<u8>) -> Self {
        Self {
            host,
            reply,
            failure: None,
        }
    }

    pub fn failed(host: Ipv4Addr, reply: Vec<u8>, failure: QueryFailure) -> Self {
        Self {
            host,
            reply,
            failure: Some(failure),
        }
    }
}
