//! Single-shot host liveness checks.
//!
//! A probe answers one question: did the host reply within the timeout?
//! Retrying is the caller's business (see [`crate::provision`]).

mod command;
mod icmp;

use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

use adev_config::{ProbeMethod, ProbeSettings};
use adev_core::error::{AdevError, Result};
use tracing::debug;

pub use command::CommandProber;
pub use icmp::IcmpProber;

pub trait Prober {
    /// `Ok(false)` for no reply; `Err` only when a probe cannot be attempted.
    fn probe(&self, address: &str) -> Result<bool>;
}

/// Resolve a literal IPv4 address or host name.
///
/// `Ok(None)` when the name does not resolve (yet); IPv6 literals are rejected.
pub fn resolve_ipv4(address: &str) -> Result<Option<Ipv4Addr>> {
    match address.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => return Ok(Some(ip)),
        Ok(IpAddr::V6(ip)) => {
            return Err(AdevError::Probe(format!(
                "IPv6 address {ip} is not supported; use an IPv4 address in the inventory"
            )))
        }
        Err(_) => {}
    }

    match (address, 0).to_socket_addrs() {
        Ok(addrs) => {
            let found = addrs.into_iter().find_map(|a| match a.ip() {
                IpAddr::V4(ip) => Some(ip),
                IpAddr::V6(_) => None,
            });
            if found.is_none() {
                debug!("'{}' has no IPv4 address", address);
            }
            Ok(found)
        }
        Err(e) => {
            debug!("Unable to resolve '{}': {}", address, e);
            Ok(None)
        }
    }
}

pub fn build_prober(settings: &ProbeSettings) -> Box<dyn Prober> {
    match settings.method {
        ProbeMethod::Icmp => Box::new(IcmpProber::new(settings.timeout())),
        ProbeMethod::Command => Box::new(CommandProber::new(settings.timeout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_ipv4_resolves_to_itself() {
        assert_eq!(
            resolve_ipv4("192.168.57.5").unwrap(),
            Some(Ipv4Addr::new(192, 168, 57, 5))
        );
    }

    #[test]
    fn ipv6_literal_is_a_probe_error() {
        assert!(matches!(resolve_ipv4("::1"), Err(AdevError::Probe(_))));
    }

    #[test]
    fn unresolvable_name_is_not_an_error() {
        assert_eq!(resolve_ipv4("no-such-host.invalid").unwrap(), None);
    }

    #[test]
    fn localhost_resolves() {
        assert_eq!(
            resolve_ipv4("localhost").unwrap(),
            Some(Ipv4Addr::LOCALHOST)
        );
    }
}
