//! Run configuration.
//!
//! A [`Config`] is built once before a run and shared read-only with every
//! probe and query task. The probe timeout is the only value a user can
//! tune at runtime; it comes from the command line or an options file and is
//! validated against [`MIN_SCAN_TIMEOUT`]..=[`MAX_SCAN_TIMEOUT`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::error::DiscoveryError;

/// TCP port the test accessories listen on.
pub const DISCOVERY_PORT: u16 = 2359;
/// Query written to every responsive host.
pub const QUERY_PAYLOAD: &[u8] = b"TA:getattrlong";
/// Substring identifying an accessory reply.
pub const REPLY_MARKER: &str = "iPerf Remote";
pub const MAX_REPLY_BYTES: usize = 4096;

/// Lower bound for the probe timeout in seconds (10 ms).
pub const MIN_SCAN_TIMEOUT: f64 = 0.010;
/// Upper bound for the probe timeout in seconds (160 ms).
pub const MAX_SCAN_TIMEOUT: f64 = 0.160;
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONCURRENCY: usize = 256;

pub const DEFAULT_OPTIONS_FILE: &str = "/mnt/mmc3/iperfaccessory.conf";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub probe_timeout: Duration,
    pub query_timeout: Duration,
    pub payload: &'static [u8],
    pub marker: &'static str,
    pub max_reply_bytes: usize,
    /// Upper bound on simultaneously open sockets per phase.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DISCOVERY_PORT,
            probe_timeout: Duration::from_secs_f64(MIN_SCAN_TIMEOUT),
            query_timeout: QUERY_TIMEOUT,
            payload: QUERY_PAYLOAD,
            marker: REPLY_MARKER,
            max_reply_bytes: MAX_REPLY_BYTES,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Checks a probe timeout given in seconds.
pub fn validate_scan_timeout(secs: f64) -> Result<Duration, DiscoveryError> {
    if (MIN_SCAN_TIMEOUT..=MAX_SCAN_TIMEOUT).contains(&secs) {
        Ok(Duration::from_secs_f64(secs))
    } else {
        Err(DiscoveryError::TimeoutOutOfRange(secs))
    }
}

/// Picks the probe timeout for a run.
///
/// Starts from the default, lets a valid options-file value replace it and
/// finally applies the command-line override. An out-of-range override is
/// logged and ignored.
pub fn resolve_scan_timeout(from_options: Option<Duration>, from_cli: Option<f64>) -> Duration {
    let mut timeout: Duration = from_options.unwrap_or(Duration::from_secs_f64(MIN_SCAN_TIMEOUT));

    if let Some(secs) = from_cli {
        match validate_scan_timeout(secs) {
            Ok(valid) => timeout = valid,
            Err(_) => warn!(
                "Timeout {secs:.3}s out of range ({MIN_SCAN_TIMEOUT:.3}-{MAX_SCAN_TIMEOUT:.3}), using default {:.3}s",
                timeout.as_secs_f64()
            ),
        }
    }

    timeout
}

/// Reads the `timeout=` setting from an options file.
///
/// Problems are logged and reported as `None`; the options file can never
/// fail a run.
pub fn read_options_timeout(path: &Path) -> Option<Duration> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let timeout = parse_options_timeout(&contents);
            match timeout {
                Some(t) => debug!("Parsed timeout from {}: {:.3}s", path.display(), t.as_secs_f64()),
                None => debug!("No valid timeout found in {}", path.display()),
            }
            timeout
        }
        Err(e) => {
            error!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

/// Returns the first in-range `timeout=` value of an options file body.
pub fn parse_options_timeout(contents: &str) -> Option<Duration> {
    for line in contents.lines().map(str::trim) {
        if !line.starts_with("timeout=") {
            continue;
        }

        let value: &str = line.split('=').nth(1).unwrap_or_default().trim();
        match value.parse::<f64>() {
            Ok(secs) => match validate_scan_timeout(secs) {
                Ok(timeout) => return Some(timeout),
                Err(_) => warn!("Timeout out of range: {secs:.3}s"),
            },
            Err(_) => error!("Invalid timeout format in options file: {line}"),
        }
    }
    None
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
