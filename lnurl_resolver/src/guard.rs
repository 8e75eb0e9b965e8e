//! Host classification used before any outbound request.
//!
//! A host is unsafe when it names something internal: reserved suffixes,
//! loopback names, private / loopback / link-local address literals, the
//! cloud metadata address, or a hostname that merely looks like a private
//! dotted address.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};

use url::{Host, Url};
use xerror::resolver::{HttpError, ResolverError};

const INTERNAL_SUFFIXES: [&str; 4] = [".local", ".internal", ".onion", ".localhost"];
const LOOPBACK_HOSTS: [&str; 4] = ["localhost", "127.0.0.1", "::1", "[::1]"];
const METADATA_ADDRESS: Ipv4Addr = Ipv4Addr::new(169, 254, 169, 254);

pub fn has_internal_suffix(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    INTERNAL_SUFFIXES.iter().any(|suffix| host.ends_with(suffix))
}

pub fn is_loopback_name(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    LOOPBACK_HOSTS.contains(&host.as_str()) || host.starts_with("127.")
}

fn private_ipv4_reason(ip: Ipv4Addr) -> Option<&'static str> {
    let octets = ip.octets();
    if ip == METADATA_ADDRESS {
        Some("cloud metadata address")
    } else if ip.is_loopback() {
        Some("loopback address")
    } else if ip.is_private() {
        Some("private address")
    } else if ip.is_link_local() {
        Some("link-local address")
    } else if ip.is_unspecified() || ip.is_broadcast() {
        Some("unroutable address")
    } else if octets[0] == 224 && octets[1] == 0 && octets[2] == 0 {
        Some("link-local multicast address")
    } else if octets[0] == 100 && (octets[1] & 0xc0) == 64 {
        Some("shared address space")
    } else {
        None
    }
}

fn private_ipv6_reason(ip: Ipv6Addr) -> Option<&'static str> {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return private_ipv4_reason(mapped);
    }
    let first = ip.segments()[0];
    if ip.is_loopback() {
        Some("loopback address")
    } else if ip.is_unspecified() {
        Some("unroutable address")
    } else if (first & 0xfe00) == 0xfc00 {
        Some("unique local address")
    } else if (first & 0xffc0) == 0xfe80 {
        Some("link-local address")
    } else if (first & 0xff0f) == 0xff02 {
        Some("link-local multicast address")
    } else {
        None
    }
}

pub fn private_ip_reason(ip: IpAddr) -> Option<&'static str> {
    match ip {
        IpAddr::V4(ip) => private_ipv4_reason(ip),
        IpAddr::V6(ip) => private_ipv6_reason(ip),
    }
}

/// Fallback for hostnames that look like private dotted addresses without
/// parsing as one.
fn private_prefix_reason(host: &str) -> Option<&'static str> {
    if host.starts_with("10.") || host.starts_with("192.168.") {
        return Some("private address prefix");
    }
    if host.starts_with("169.254.") {
        return Some("link-local address prefix");
    }
    if let Some(rest) = host.strip_prefix("172.") {
        let second_octet = rest.split('.').next().and_then(|octet| octet.parse::<u8>().ok());
        if matches!(second_octet, Some(16..=31)) {
            return Some("private address prefix");
        }
    }
    None
}

fn domain_reason(domain: &str) -> Option<&'static str> {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        Some("empty host")
    } else if has_internal_suffix(&domain) {
        Some("internal domain suffix")
    } else if is_loopback_name(&domain) {
        Some("loopback host")
    } else {
        private_prefix_reason(&domain)
    }
}

/// Why `host` must not be contacted, if anything.
pub fn unsafe_host_reason(host: &str) -> Option<&'static str> {
    if has_internal_suffix(host) {
        return Some("internal domain suffix");
    }
    if is_loopback_name(host) {
        return Some("loopback host");
    }
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    match literal.parse::<IpAddr>() {
        Ok(ip) => private_ip_reason(ip),
        Err(_) => domain_reason(host),
    }
}

pub fn is_safe_host(host: &str) -> bool {
    unsafe_host_reason(host).is_none()
}

fn blocked_host(host: &str, reason: &str) -> ResolverError {
    ResolverError::SsrfBlocked(format!("{} ({})", host, reason))
}

fn blocked(url: &Url, reason: &str) -> ResolverError {
    blocked_host(url.host_str().unwrap_or_default(), reason)
}

/// Checks scheme and host of an already parsed url.
pub fn validate_url(url: &Url) -> Result<(), ResolverError> {
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(ResolverError::Scheme(scheme.to_string())),
    }

    let reason = match url.host() {
        None => Some("missing host"),
        Some(Host::Domain(domain)) => domain_reason(domain),
        Some(Host::Ipv4(ip)) => private_ipv4_reason(ip),
        Some(Host::Ipv6(ip)) => private_ipv6_reason(ip),
    };

    match reason {
        Some(reason) => Err(blocked(url, reason)),
        None => Ok(()),
    }
}

pub fn validate_external_url(raw_url: &str) -> Result<Url, ResolverError> {
    let url = Url::parse(raw_url).map_err(|err| ResolverError::Format(format!("invalid url {:?} ({})", raw_url, err)))?;
    validate_url(&url)?;
    Ok(url)
}

/// Rejects a lookup result if any address in it is private, or if it is empty.
pub fn check_resolved_addresses(host: &str, addresses: &[SocketAddr]) -> Result<(), ResolverError> {
    if addresses.is_empty() {
        return Err(blocked_host(host, "resolved to no address"));
    }
    for address in addresses {
        if let Some(reason) = private_ip_reason(address.ip()) {
            return Err(blocked_host(host, &format!("resolves to {}, {}", address.ip(), reason)));
        }
    }
    Ok(())
}

/// Blocking lookup of `host` whose result is only returned once every
/// address passed [`check_resolved_addresses`]. The port is left at 0.
pub fn resolve_checked(host: &str) -> Result<Vec<SocketAddr>, ResolverError> {
    let addresses = (host, 0)
        .to_socket_addrs()
        .map_err(|err| HttpError::Transport(format!("could not resolve {} ({})", host, err)))?
        .collect::<Vec<_>>();
    check_resolved_addresses(host, &addresses)?;
    Ok(addresses)
}
