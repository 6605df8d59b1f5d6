//! Bounded fan-out of per-host work.
//!
//! Both discovery phases run one task per host. Tasks are spawned into a
//! [`JoinSet`] and gated by a semaphore, so at most `Config::concurrency`
//! sockets are open at any time. Dropping the future returned by
//! [`fan_out`] drops the set, which aborts every in-flight task and closes
//! its socket.

use std::collections::HashMap;
use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use tadisc_common::Config;
use tadisc_common::network::host::{QueryFailure, QueryOutcome, ScanResult};
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::error;

use crate::network::{query, tcp};

/// Runs `work` for every host with at most `limit` tasks in flight.
///
/// Results come back in completion order. A task that dies is replaced by
/// `fallback(host)` so every host yields exactly one result.
pub async fn fan_out<T, F, Fut>(
    hosts: Vec<Ipv4Addr>,
    limit: usize,
    work: F,
    fallback: fn(Ipv4Addr) -> T,
) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(Ipv4Addr) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    let semaphore: Arc<Semaphore> = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks: JoinSet<T> = JoinSet::new();
    let mut owners: HashMap<task::Id, Ipv4Addr> = HashMap::with_capacity(hosts.len());
    let mut results: Vec<T> = Vec::with_capacity(hosts.len());

    for host in hosts {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            results.push(fallback(host));
            continue;
        };

        let job = work(host);
        let handle = tasks.spawn(async move {
            let _permit = permit;
            job.await
        });
        owners.insert(handle.id(), host);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_id, value)) => results.push(value),
            Err(e) => {
                error!("Host task failed: {e}");
                if let Some(host) = owners.get(&e.id()) {
                    results.push(fallback(*host));
                }
            }
        }
    }

    results
}

/// Probes every host and returns the results in ascending host order.
pub async fn scan_hosts(hosts: Vec<Ipv4Addr>, cfg: Arc<Config>) -> Vec<ScanResult> {
    let limit: usize = cfg.concurrency;
    let mut results: Vec<ScanResult> = fan_out(
        hosts,
        limit,
        move |host| {
            let cfg = cfg.clone();
            async move { tcp::probe(host, &cfg).await }
        },
        |host| ScanResult::unreachable(host, Duration::ZERO),
    )
    .await;

    results.sort_by_key(|result| result.host);
    results
}

/// Queries every host of the worklist and returns the outcomes in ascending host order.
pub async fn query_hosts(worklist: Vec<Ipv4Addr>, cfg: Arc<Config>) -> Vec<QueryOutcome> {
    let limit: usize = cfg.concurrency;
    let mut outcomes: Vec<QueryOutcome> = fan_out(
        worklist,
        limit,
        move |host| {
            let cfg = cfg.clone();
            async move { query::query(host, &cfg).await }
        },
        |host| QueryOutcome::failed(host, Vec::new(), QueryFailure::Aborted),
    )
    .await;

    outcomes.sort_by_key(|outcome| outcome.host);
    outcomes
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
