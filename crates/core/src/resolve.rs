//! Target host resolution.
//!
//! The session client takes a bare IP address, so the target host is
//! resolved just before handoff: IP literals short-circuit, anything else
//! goes through the system resolver and the first returned address wins.

use std::net::{IpAddr, ToSocketAddrs};

use tracing::debug;

use crate::error::LaunchError;

/// Resolves `host` to the address handed to the session client.
///
/// # Errors
///
/// [`LaunchError::HostLookup`] when the system resolver fails and
/// [`LaunchError::HostUnresolved`] when it answers with no addresses.
pub fn resolve_host(host: &str) -> Result<IpAddr, LaunchError> {
    if let Ok(address) = host.parse::<IpAddr>() {
        return Ok(address);
    }

    let mut addresses = (host, 0u16)
        .to_socket_addrs()
        .map_err(|source| LaunchError::HostLookup {
            host: host.to_owned(),
            source,
        })?;

    let address = addresses
        .next()
        .ok_or_else(|| LaunchError::HostUnresolved {
            host: host.to_owned(),
        })?
        .ip();

    debug!(host, %address, "resolved remote host");
    Ok(address)
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;

    #[test]
    fn passes_through_ipv4_literal() {
        assert_eq!(
            resolve_host("192.168.1.100").unwrap(),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100))
        );
    }

    #[test]
    fn passes_through_ipv6_literal() {
        assert_eq!(
            resolve_host("::1").unwrap(),
            IpAddr::V6(Ipv6Addr::LOCALHOST)
        );
    }

    #[test]
    fn resolves_localhost() {
        let address = resolve_host("localhost").expect("localhost should resolve");
        assert!(address.is_loopback());
    }

    #[test]
    fn reports_unresolvable_host() {
        let error = resolve_host("does-not-exist.invalid").expect_err("lookup should fail");
        assert!(matches!(
            error,
            LaunchError::HostLookup { .. } | LaunchError::HostUnresolved { .. }
        ));
    }
}
