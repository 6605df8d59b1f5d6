//! # Discovery Coordinator
//!
//! Drives one run through `Idle → Scanning → Querying → Reporting → Done`.
//!
//! The probe phase finishes for every host before the first query is sent,
//! and every query finishes before the summary is built. Per-host failures
//! are data and never stop the run; only an invalid network (before any
//! scanning) or the shutdown signal end it early.

use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tadisc_common::accessory::{AccessoryRecord, AccessoryStore, InvalidReason, InvalidResponse};
use tadisc_common::network::host::{QueryOutcome, ScanResult};
use tadisc_common::network::range;
use tadisc_common::summary::DiscoverySummary;
use tadisc_common::{Config, DiscoveryError};
use tracing::{debug, error, info};

use crate::{classifier, scanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning,
    Querying,
    Reporting,
    Done,
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub accessories: Vec<AccessoryRecord>,
    pub invalid: Vec<InvalidResponse>,
    pub summary: DiscoverySummary,
}

pub struct DiscoveryService {
    cfg: Arc<Config>,
    phase: Phase,
}

impl DiscoveryService {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg: Arc::new(cfg),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs a full discovery over `network` and hands the accessories to `store`.
    ///
    /// If `shutdown` resolves before the query phase is over, every in-flight
    /// probe and query is aborted, nothing is written and
    /// [`DiscoveryError::Interrupted`] is returned.
    pub async fn run<S>(
        &mut self,
        network: &str,
        store: &mut dyn AccessoryStore,
        shutdown: S,
    ) -> Result<DiscoveryReport, DiscoveryError>
    where
        S: Future<Output = ()>,
    {
        let started: Instant = Instant::now();
        let hosts: Vec<Ipv4Addr> = range::expand(network)?;

        let report: DiscoveryReport = tokio::select! {
            biased;
            _ = shutdown => {
                info!("Scan interrupted by user");
                return Err(DiscoveryError::Interrupted);
            }
            report = self.discover(network, hosts, started) => report,
        };

        self.transition(Phase::Reporting);
        if let Err(e) = store.append(&report.accessories) {
            error!("Failed to write accessory list: {e}");
        }
        report.summary.log(self.cfg.port);

        self.transition(Phase::Done);
        Ok(report)
    }

    async fn discover(&mut self, network: &str, hosts: Vec<Ipv4Addr>, started: Instant) -> DiscoveryReport {
        let total_hosts: usize = hosts.len();

        self.transition(Phase::Scanning);
        info!("Starting TCP port scan on {network}");
        let scan_started: Instant = Instant::now();
        let scan_results: Vec<ScanResult> = scanner::scan_hosts(hosts, self.cfg.clone()).await;
        let scan_time: Duration = scan_started.elapsed();

        let worklist: Vec<Ipv4Addr> = scan_results
            .iter()
            .filter(|result| result.reachable)
            .map(|result| result.host)
            .collect();
        info!(
            "TCP scan completed: {}/{} hosts active ({:.3}s)",
            worklist.len(),
            total_hosts,
            scan_time.as_secs_f64()
        );

        self.transition(Phase::Querying);
        info!("Starting iPerf query on {} hosts", worklist.len());
        let query_started: Instant = Instant::now();
        let reachable: usize = worklist.len();
        let outcomes: Vec<QueryOutcome> = scanner::query_hosts(worklist, self.cfg.clone()).await;
        let (accessories, invalid) = self.classify_all(&outcomes);
        let query_time: Duration = query_started.elapsed();

        info!(
            "iPerf query completed: {} valid, {} invalid ({:.3}s)",
            accessories.len(),
            invalid.len(),
            query_time.as_secs_f64()
        );

        let summary = DiscoverySummary {
            total_hosts,
            reachable,
            valid: accessories.len(),
            invalid: invalid.len(),
            scan_time,
            query_time,
            total_time: started.elapsed(),
        };

        DiscoveryReport {
            accessories,
            invalid,
            summary,
        }
    }

    fn classify_all(&self, outcomes: &[QueryOutcome]) -> (Vec<AccessoryRecord>, Vec<InvalidResponse>) {
        let mut accessories: Vec<AccessoryRecord> = Vec::new();
        let mut invalid: Vec<InvalidResponse> = Vec::new();

        for outcome in outcomes {
            match classifier::classify_outcome(outcome, self.cfg.marker) {
                Ok(record) => {
                    debug!("Valid iPerf Remote at {}: {}", record.host, record.attributes);
                    accessories.push(record);
                }
                Err(rejected) => {
                    match rejected.reason {
                        InvalidReason::NoResponse => debug!("No response from {}", rejected.host),
                        InvalidReason::DecodeError => {
                            error!("Failed to decode response from {}", rejected.host)
                        }
                        InvalidReason::MarkerNotFound => info!(
                            "Invalid iPerf Remote at {}: {}",
                            rejected.host,
                            rejected.text.as_deref().unwrap_or_default()
                        ),
                    }
                    invalid.push(rejected);
                }
            }
        }

        (accessories, invalid)
    }

    fn transition(&mut self, next: Phase) {
        debug!("Discovery phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
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
