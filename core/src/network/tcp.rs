//! Connect probe used to find hosts with the discovery port open.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Instant;

use tadisc_common::Config;
use tadisc_common::network::host::ScanResult;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Attempts a bare TCP handshake with `host` on the configured port.
///
/// The stream is dropped as soon as the handshake completes, nothing is
/// written. Every failure maps to an unreachable result.
pub async fn probe(host: Ipv4Addr, cfg: &Config) -> ScanResult {
    let socket_addr: SocketAddr = SocketAddr::from((host, cfg.port));
    let started: Instant = Instant::now();

    match timeout(cfg.probe_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            debug!("Host {host} has port {} open", cfg.port);
            ScanResult::reachable(host, started.elapsed())
        }
        Ok(Err(e)) => {
            debug!("Failed to connect to {socket_addr}: {e}");
            ScanResult::unreachable(host, started.elapsed())
        }
        Err(_elapsed) => {
            debug!("Failed to connect to {socket_addr}: timed out");
            ScanResult::unreachable(host, started.elapsed())
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
