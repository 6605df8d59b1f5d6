use std::time::Duration;

use tracing::info;

/// Counters and timings of one finished discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    pub total_hosts: usize,
    pub reachable: usize,
    pub valid: usize,
    pub invalid: usize,
    pub scan_time: Duration,
    pub query_time: Duration,
    pub total_time: Duration,
}

impl DiscoverySummary {
    /// Number of hosts that went through the query phase.
    pub fn queried(&self) -> usize {
        self.valid + self.invalid
    }

    pub fn log(&self, port: u16) {
        info!("Summary:");
        info!("  Total IPs scanned: {}", self.total_hosts);
        info!("  Hosts with port {port} open: {}", self.reachable);
        info!("  Valid iPerf Remotes: {}", self.valid);
        info!("  Invalid responses: {}", self.invalid);
        info!("  TCP scan time: {:.3}s", self.scan_time.as_secs_f64());
        info!("  iPerf query time: {:.3}s", self.query_time.as_secs_f64());
        info!("  Total time: {:.3}s", self.total_time.as_secs_f64());
    }
}
