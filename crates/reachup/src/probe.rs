//! Reachability probing.
//!
//! A probe is one bounded attempt to reach a host: resolve the name, then
//! either establish a TCP connection or exchange one UDP datagram. The whole
//! attempt races a fixed timeout, and whichever of success, error or timeout
//! finishes first is the single outcome; the losing future is dropped, which
//! also closes any socket it had open.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tokio::time::timeout;
use tracing::debug;

use crate::types::Protocol;

/// Upper bound on the total latency of one probe, resolution included.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Payload of the UDP probe datagram. Content is arbitrary; any reply at all
/// counts as reachable.
const UDP_PROBE_PAYLOAD: &[u8] = b"reachup";

/// Outcome of a single reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
}

impl std::fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::Reachable => write!(f, "reachable"),
            ProbeOutcome::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Prober trait so the scheduler can be driven by fake probes in tests.
///
/// Implementations must not return errors or panic: anything that goes wrong
/// during an attempt is an `Unreachable` outcome, nothing more.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Perform one reachability check against `host:port`.
    async fn probe(&self, host: &str, port: u16, protocol: Protocol) -> ProbeOutcome;
}

/// Production prober: DNS gate plus TCP connect or UDP request/response.
pub struct NetProber {
    timeout: Duration,
}

impl NetProber {
    pub fn new() -> Self {
        Self { timeout: PROBE_TIMEOUT }
    }

    /// Override the probe timeout. The monitor always uses [`PROBE_TIMEOUT`];
    /// this exists for tests that cannot wait five seconds.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// One attempt, unbounded. The caller races this against the timeout.
    async fn attempt(&self, host: &str, port: u16, protocol: Protocol) -> Result<()> {
        // Resolution failure means the host is down; no protocol I/O happens.
        let addr = resolve(host, port).await?;

        match protocol {
            Protocol::Tcp => tcp_probe(addr).await,
            Protocol::Udp => udp_probe(addr).await,
        }
    }
}

impl Default for NetProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for NetProber {
    async fn probe(&self, host: &str, port: u16, protocol: Protocol) -> ProbeOutcome {
        match timeout(self.timeout, self.attempt(host, port, protocol)).await {
            Ok(Ok(())) => ProbeOutcome::Reachable,
            Ok(Err(err)) => {
                debug!(host = %host, port, %protocol, error = %err, "probe failed");
                ProbeOutcome::Unreachable
            }
            Err(_) => {
                debug!(host = %host, port, %protocol, "probe timed out");
                ProbeOutcome::Unreachable
            }
        }
    }
}

/// Resolve `host` to the first usable socket address.
async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    lookup_host((host, port))
        .await
        .with_context(|| format!("name resolution failed for {host}"))?
        .next()
        .ok_or_else(|| anyhow!("name resolution returned no addresses for {host}"))
}

/// A completed TCP handshake is the reachability signal; the connection is
/// closed immediately afterwards.
async fn tcp_probe(addr: SocketAddr) -> Result<()> {
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("tcp connect to {addr} failed"))?;
    drop(stream);
    Ok(())
}

/// Send one datagram and wait for any reply. UDP is connectionless, so a
/// peer that is alive but silent (or firewalled without ICMP) looks
/// unreachable; that false negative is inherent to the protocol.
async fn udp_probe(addr: SocketAddr) -> Result<()> {
    // Bind an ephemeral socket of the same family as the target.
    let bind_addr = match addr {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    };

    let socket = UdpSocket::bind(bind_addr)
        .await
        .context("binding udp probe socket failed")?;
    socket
        .send_to(UDP_PROBE_PAYLOAD, addr)
        .await
        .with_context(|| format!("udp send to {addr} failed"))?;

    let mut buf = [0u8; 512];
    socket
        .recv_from(&mut buf)
        .await
        .with_context(|| format!("udp receive from {addr} failed"))?;
    Ok(())
}
