//! Resolve a `host[:port]` server address the way the vanilla launcher does:
//! an explicit port is used as-is, otherwise an `_minecraft._tcp` SRV record
//! is consulted before falling back to the default port 25565.

use std::net::SocketAddr;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::error::Result;

pub const DEFAULT_PORT: u16 = 25565;

/// A resolved connection target: the address to dial plus the hostname to
/// report in the handshake packet (servers behind virtual-host routing
/// dispatch on that string, so it must be the original host, not its IP).
#[derive(Debug, Clone)]
pub struct ResolvedAddress {
    pub socket_addr: SocketAddr,
    pub hostname: String,
    pub port: u16,
}

/// Resolve `host` for a connection. If `port` is `None`, first try an
/// `_minecraft._tcp.<host>` SRV lookup; if that returns no records, fall back
/// to `DEFAULT_PORT`.
pub async fn resolve_address(host: &str, port: Option<u16>) -> Result<ResolvedAddress> {
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let resolved_port = match port {
        Some(p) => p,
        None => lookup_srv_port(&resolver, host).await.unwrap_or(DEFAULT_PORT),
    };

    let ip = resolver
        .lookup_ip(host)
        .await?
        .iter()
        .next()
        .ok_or_else(|| {
            crate::error::ConnectionError::Disconnected(format!("no A/AAAA records for {host}"))
        })?;

    Ok(ResolvedAddress {
        socket_addr: SocketAddr::new(ip, resolved_port),
        hostname: host.to_string(),
        port: resolved_port,
    })
}

async fn lookup_srv_port(resolver: &TokioAsyncResolver, host: &str) -> Option<u16> {
    let name = format!("_minecraft._tcp.{host}");
    let lookup = resolver.srv_lookup(name).await.ok()?;
    lookup.iter().next().map(|srv| srv.port())
}
