use std::time::{Duration, Instant};

use tadisc_common::accessory::AccessoryRecord;
use tadisc_common::{Config, DiscoveryError};
use tadisc_core::{DiscoveryService, Phase};

use crate::utils::{Behavior, MockAccessory, PeerEvent, StalledListener};

#[tokio::test]
async fn interrupt_during_query_closes_sockets_and_discards_results() {
    let mut mock = MockAccessory::start(Behavior::Hold).await;
    let cfg = Config::default()
        .with_port(mock.port)
        .with_probe_timeout(Duration::from_millis(160));
    let mut service = DiscoveryService::new(cfg);
    let mut store: Vec<AccessoryRecord> = Vec::new();

    let started = Instant::now();
    let shutdown = async {
        mock.wait_for(PeerEvent::Queried, Duration::from_secs(3)).await;
    };
    let result = service.run("127.0.0.1/32", &mut store, shutdown).await;

    assert!(matches!(result, Err(DiscoveryError::Interrupted)));
    assert!(started.elapsed() < Duration::from_secs(4), "run outlived the interrupt");
    assert!(
        mock.wait_for(PeerEvent::Closed, Duration::from_secs(1)).await,
        "query socket left open after interrupt"
    );
    assert!(store.is_empty());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn interrupt_during_scan_returns_promptly() {
    let stalled = StalledListener::start().await.expect("stalled listener unavailable");
    let cfg = Config::default()
        .with_port(stalled.port)
        .with_probe_timeout(Duration::from_millis(160))
        .with_concurrency(1);
    let mut service = DiscoveryService::new(cfg);
    let mut store: Vec<AccessoryRecord> = Vec::new();

    // 254 stalled probes at one in flight need about 40s to finish.
    let started = Instant::now();
    let shutdown = tokio::time::sleep(Duration::from_millis(300));
    let result = service.run("127.0.0.0/24", &mut store, shutdown).await;

    assert!(matches!(result, Err(DiscoveryError::Interrupted)));
    assert!(started.elapsed() < Duration::from_secs(2), "scan outlived the interrupt");
    assert_eq!(service.phase(), Phase::Scanning);
    assert!(store.is_empty());
}
