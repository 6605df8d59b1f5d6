use std::collections::HashSet;
use std::fs;
use std::net::Ipv4Addr;
use std::time::Duration;

use tadisc_common::accessory::{AccessoryRecord, InvalidReason};
use tadisc_common::Config;
use tadisc_core::{DiscoveryReport, DiscoveryService, FileAccessoryStore, Phase};

use crate::utils::{closed_port, Behavior, MockAccessory};

fn cfg_for(port: u16) -> Config {
    Config::default()
        .with_port(port)
        .with_probe_timeout(Duration::from_millis(160))
        .with_query_timeout(Duration::from_millis(500))
}

async fn run(network: &str, cfg: Config, store: &mut Vec<AccessoryRecord>) -> DiscoveryReport {
    let mut service = DiscoveryService::new(cfg);
    let report = service
        .run(network, store, std::future::pending())
        .await
        .expect("discovery run failed");
    assert_eq!(service.phase(), Phase::Done);
    report
}

fn assert_counts_consistent(report: &DiscoveryReport) {
    let summary = &report.summary;
    assert_eq!(summary.valid + summary.invalid, summary.reachable);
    assert_eq!(summary.valid, report.accessories.len());
    assert_eq!(summary.invalid, report.invalid.len());
}

#[tokio::test]
async fn unreachable_range_reports_zero_hosts_found() {
    let mut store = Vec::new();

    let report = run("127.0.0.0/30", cfg_for(closed_port().await), &mut store).await;

    assert_eq!(report.summary.total_hosts, 2);
    assert_eq!(report.summary.reachable, 0);
    assert_eq!(report.summary.valid, 0);
    assert_eq!(report.summary.invalid, 0);
    assert!(store.is_empty());
}

#[tokio::test]
#[ignore]
async fn unreachable_private_range_reports_zero_hosts_found() {
    let mut store = Vec::new();
    let cfg = Config::default().with_probe_timeout(Duration::from_millis(10));

    let report = run("10.0.0.0/30", cfg, &mut store).await;

    assert_eq!(report.summary.total_hosts, 2);
    assert_eq!(report.summary.reachable, 0);
    assert_eq!(report.summary.queried(), 0);
}

#[tokio::test]
async fn reply_without_marker_counts_as_invalid() {
    let mock = MockAccessory::start(Behavior::Reply(b"hello")).await;
    let mut store = Vec::new();

    let report = run("127.0.0.1/32", cfg_for(mock.port), &mut store).await;

    assert_eq!(report.summary.reachable, 1);
    assert_eq!(report.summary.valid, 0);
    assert_eq!(report.summary.invalid, 1);
    assert_eq!(report.invalid[0].reason, InvalidReason::MarkerNotFound);
    assert_eq!(report.invalid[0].text.as_deref(), Some("hello"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn accessory_reply_is_normalized_and_persisted() {
    let mock = MockAccessory::start(Behavior::Reply(b"iPerf Remote ethaddr=AA:BB:CC:DD:EE:FF")).await;
    let path = std::env::temp_dir().join(format!("tadisc-accessories-{}", std::process::id()));
    let mut store = FileAccessoryStore::create(&path).unwrap();
    let mut service = DiscoveryService::new(cfg_for(mock.port));

    let report = service
        .run("127.0.0.1/32", &mut store, std::future::pending())
        .await
        .unwrap();

    assert_eq!(report.summary.valid, 1);
    assert!(report.accessories[0].attributes.contains("MAC=AA:BB:CC:DD:EE:FF"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "127.0.0.1: iPerf Remote MAC=AA:BB:CC:DD:EE:FF\n"
    );
    fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn silent_accessory_counts_as_invalid() {
    let mock = MockAccessory::start(Behavior::Hang).await;
    let mut store = Vec::new();

    let report = run("127.0.0.1/32", cfg_for(mock.port), &mut store).await;

    assert_eq!(report.summary.reachable, 1);
    assert_eq!(report.summary.invalid, 1);
    assert_eq!(report.invalid[0].reason, InvalidReason::NoResponse);
    assert_counts_consistent(&report);
}

#[tokio::test]
async fn single_thread_of_concurrency_still_covers_every_host() {
    let mock = MockAccessory::start(Behavior::Reply(b"iPerf Remote PS9: 80%")).await;
    let mut store = Vec::new();

    let report = run("127.0.0.0/29", cfg_for(mock.port).with_concurrency(1), &mut store).await;

    assert_eq!(report.summary.total_hosts, 6);
    assert_eq!(report.summary.reachable, 1);
    assert_eq!(store[0].to_string(), "127.0.0.1: iPerf Remote Batt=80%");
    assert_counts_consistent(&report);
}

/// Several mock accessories on distinct loopback addresses sharing one port.
#[tokio::test]
#[cfg(target_os = "linux")]
async fn mixed_loopback_range_only_reports_queried_accessories() {
    let primary = MockAccessory::start(Behavior::Reply(b"iPerf Remote\nethaddr=00:11:22:33:44:55")).await;
    let port = primary.port;
    let _stranger = MockAccessory::start_on(Ipv4Addr::new(127, 0, 0, 3), port, Behavior::Reply(b"SSH-2.0-OpenSSH"))
        .await
        .expect("127.0.0.3 unavailable");
    let _mute = MockAccessory::start_on(Ipv4Addr::new(127, 0, 0, 5), port, Behavior::Hang)
        .await
        .expect("127.0.0.5 unavailable");
    let _garbled = MockAccessory::start_on(Ipv4Addr::new(127, 0, 0, 6), port, Behavior::Reply(&[0xc3, 0x28, 0xa0]))
        .await
        .expect("127.0.0.6 unavailable");

    let mut store = Vec::new();
    let report = run("127.0.0.0/29", cfg_for(port), &mut store).await;

    assert_eq!(report.summary.total_hosts, 6);
    assert_eq!(report.summary.reachable, 4);
    assert_eq!(report.summary.valid, 1);
    assert_eq!(report.summary.invalid, 3);
    assert_counts_consistent(&report);

    let reasons: HashSet<(Ipv4Addr, InvalidReason)> =
        report.invalid.iter().map(|r| (r.host, r.reason)).collect();
    assert!(reasons.contains(&(Ipv4Addr::new(127, 0, 0, 3), InvalidReason::MarkerNotFound)));
    assert!(reasons.contains(&(Ipv4Addr::new(127, 0, 0, 5), InvalidReason::NoResponse)));
    assert!(reasons.contains(&(Ipv4Addr::new(127, 0, 0, 6), InvalidReason::DecodeError)));

    assert_eq!(
        store,
        vec![AccessoryRecord::new(
            Ipv4Addr::new(127, 0, 0, 1),
            "iPerf Remote MAC=00:11:22:33:44:55".to_string()
        )]
    );
}
