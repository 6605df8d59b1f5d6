//! # Range Expander
//!
//! Turns a CIDR string such as `192.168.1.0/24` into the ascending list of
//! usable host addresses. Host bits in the input are ignored, so
//! `192.168.1.77/24` describes the same network as `192.168.1.0/24`.

use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::DiscoveryError;

/// Widest network accepted for a run.
pub const MIN_PREFIX: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }
}

/// Parses `input` and returns every usable host address in ascending order.
///
/// Networks wider than `/MIN_PREFIX` are rejected.
pub fn expand(input: &str) -> Result<Vec<Ipv4Addr>, DiscoveryError> {
    let network: Ipv4Network = parse_network(input)?;
    if network.prefix() < MIN_PREFIX {
        return Err(DiscoveryError::invalid_network(
            input,
            format!("/{} is wider than /{MIN_PREFIX}", network.prefix()),
        ));
    }
    Ok(usable_hosts(network).to_iter().collect())
}

/// Parses `a.b.c.d/prefix`, `a.b.c.d/netmask` or a bare address (`/32`).
pub fn parse_network(input: &str) -> Result<Ipv4Network, DiscoveryError> {
    let trimmed: &str = input.trim();
    let (ip_str, prefix_str) = trimmed.split_once('/').unwrap_or((trimmed, "32"));

    let ip: Ipv4Addr = ip_str
        .parse()
        .map_err(|e| DiscoveryError::invalid_network(input, format!("'{ip_str}': {e}")))?;

    let network = match prefix_str.parse::<u8>() {
        Ok(prefix) => Ipv4Network::new(ip, prefix),
        Err(_) => {
            let netmask: Ipv4Addr = prefix_str.parse().map_err(|_| {
                DiscoveryError::invalid_network(input, format!("invalid prefix '{prefix_str}'"))
            })?;
            Ipv4Network::with_netmask(ip, netmask)
        }
    }
    .map_err(|e| DiscoveryError::invalid_network(input, e))?;

    Ipv4Network::new(network.network(), network.prefix())
        .map_err(|e| DiscoveryError::invalid_network(input, e))
}

/// Usable host span of `network`.
///
/// Network and broadcast addresses are stripped for prefixes up to /30.
/// A /31 point-to-point link keeps both addresses and a /32 is the host itself.
pub fn usable_hosts(network: Ipv4Network) -> Ipv4Range {
    let first: u32 = network.network().into();
    let last: u32 = network.broadcast().into();

    if network.prefix() >= 31 {
        return Ipv4Range::new(first.into(), last.into());
    }

    Ipv4Range::new((first + 1).into(), (last - 1).into())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
