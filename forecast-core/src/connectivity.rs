//! Pre-flight network reachability checks.
//!
//! A gate never fails: it answers `true` or `false`, and callers turn
//! `false` into [`ForecastError::NoConnectivity`](crate::ForecastError)
//! before any request is attempted.

use std::{
    fmt::Debug,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket},
};

use tracing::trace;

pub trait ConnectivityGate: Send + Sync + Debug {
    /// Re-evaluated on every call; results are never cached.
    fn is_online(&self) -> bool;
}

/// Public resolvers used as route targets when none are configured.
pub const DEFAULT_PROBE_ADDRS: &[SocketAddr] = &[
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 53),
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53),
    SocketAddr::new(
        IpAddr::V6(Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1111)),
        53,
    ),
];

/// Asks the host routing table whether any probe address is reachable
/// through a non-loopback interface.
///
/// `connect` on a UDP socket only selects a route; no datagram leaves the
/// machine.
#[derive(Debug, Clone)]
pub struct RouteProbe {
    targets: Vec<SocketAddr>,
}

impl RouteProbe {
    pub fn new(targets: Vec<SocketAddr>) -> Self {
        Self { targets }
    }

    fn has_route(target: SocketAddr) -> bool {
        let bind_addr: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let socket = match UdpSocket::bind(bind_addr) {
            Ok(socket) => socket,
            Err(err) => {
                trace!(%target, error = %err, "Could not bind probe socket");
                return false;
            }
        };

        if let Err(err) = socket.connect(target) {
            trace!(%target, error = %err, "No route to probe target");
            return false;
        }

        match socket.local_addr() {
            Ok(local) => {
                let ip = local.ip();
                let usable = !ip.is_loopback() && !ip.is_unspecified();
                trace!(%target, local = %ip, usable, "Probe route resolved");
                usable
            }
            Err(_) => false,
        }
    }
}

impl Default for RouteProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_ADDRS.to_vec())
    }
}

impl ConnectivityGate for RouteProbe {
    fn is_online(&self) -> bool {
        self.targets.iter().any(|target| Self::has_route(*target))
    }
}

/// A gate with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

impl StaticConnectivity {
    pub const ONLINE: Self = Self(true);
    pub const OFFLINE: Self = Self(false);
}

impl ConnectivityGate for StaticConnectivity {
    fn is_online(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_gate_reports_its_value() {
        assert!(StaticConnectivity::ONLINE.is_online());
        assert!(!StaticConnectivity::OFFLINE.is_online());
    }

    #[test]
    fn probe_without_targets_is_offline() {
        assert!(!RouteProbe::new(vec![]).is_online());
    }

    #[test]
    fn loopback_route_is_not_usable() {
        let probe = RouteProbe::new(vec![(Ipv4Addr::LOCALHOST, 9).into()]);
        assert!(!probe.is_online());
    }

    #[test]
    fn default_probe_uses_public_resolvers() {
        let probe = RouteProbe::default();

        assert_eq!(probe.targets, DEFAULT_PROBE_ADDRS);
        assert!(probe.targets.iter().all(|addr| !addr.ip().is_loopback() && addr.port() == 53));
    }
}
