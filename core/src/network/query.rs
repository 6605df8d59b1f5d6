//! Application-level query against a host that passed the probe.

use std::net::{Ipv4Addr, SocketAddr};

use tadisc_common::Config;
use tadisc_common::network::host::{QueryFailure, QueryOutcome};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error};

/// Sends the query payload to `host` and collects the reply.
///
/// A fresh connection is opened; probe connections are never reused. Connect,
/// write and read all share a single deadline of `cfg.query_timeout`. Reading
/// stops at `cfg.max_reply_bytes` or when the peer closes. If the deadline
/// passes or the connection breaks after part of a reply arrived, that part
/// is the reply.
pub async fn query(host: Ipv4Addr, cfg: &Config) -> QueryOutcome {
    let socket_addr: SocketAddr = SocketAddr::from((host, cfg.port));
    let deadline: Instant = Instant::now() + cfg.query_timeout;

    let mut stream: TcpStream = match timeout_at(deadline, TcpStream::connect(socket_addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return failed(host, QueryFailure::ConnectFailed(e.kind())),
        Err(_elapsed) => return failed(host, QueryFailure::ConnectTimeout),
    };

    let mut reply: Vec<u8> = Vec::with_capacity(cfg.max_reply_bytes);
    let exchanged = timeout_at(deadline, exchange(&mut stream, cfg, &mut reply)).await;

    match exchanged {
        Ok(Ok(())) => replied(host, reply),
        Ok(Err(failure)) => failed(host, failure),
        Err(_elapsed) if !reply.is_empty() => replied(host, reply),
        Err(_elapsed) => failed(host, QueryFailure::ReplyTimeout),
    }
}

async fn exchange(
    stream: &mut TcpStream,
    cfg: &Config,
    reply: &mut Vec<u8>,
) -> Result<(), QueryFailure> {
    stream
        .write_all(cfg.payload)
        .await
        .map_err(|e| QueryFailure::WriteFailed(e.kind()))?;

    let mut chunk: Vec<u8> = vec![0; cfg.max_reply_bytes];
    while reply.len() < cfg.max_reply_bytes {
        let room: usize = cfg.max_reply_bytes - reply.len();
        match stream.read(&mut chunk[..room]).await {
            Ok(0) => break,
            Ok(n) => reply.extend_from_slice(&chunk[..n]),
            Err(e) if !reply.is_empty() => {
                debug!("Connection dropped after {} reply bytes: {e}", reply.len());
                break;
            }
            Err(e) => return Err(QueryFailure::ReadFailed(e.kind())),
        }
    }
    Ok(())
}

fn replied(host: Ipv4Addr, reply: Vec<u8>) -> QueryOutcome {
    debug!(
        "Received response from {host}: {:?}",
        String::from_utf8_lossy(&reply)
    );
    QueryOutcome::replied(host, reply)
}

fn failed(host: Ipv4Addr, failure: QueryFailure) -> QueryOutcome {
    error!("Query failed for {host}: {failure}");
    QueryOutcome::failed(host, Vec::new(), failure)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
