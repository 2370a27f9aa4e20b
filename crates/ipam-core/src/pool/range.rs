//! CIDR range parsing and expansion
//!
//! A range expands to every address it contains, network and broadcast
//! addresses included: a /31 yields 2 addresses, a /30 yields 4.

use ipnet::{IpNet, Ipv4AddrRange, Ipv6AddrRange};
use std::net::IpAddr;

use crate::error::{Error, Result};

/// Parse range text into a network
///
/// Accepts CIDR notation (`10.0.0.0/24`, `2001:db8::/126`) or a bare
/// address, which is treated as a single-address range. Host bits below
/// the prefix are masked off, so `10.0.0.7/30` means `10.0.0.4/30`.
pub fn parse_range(text: &str) -> Result<IpNet> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::invalid_range("range must not be empty"));
    }

    let net = match text.parse::<IpNet>() {
        Ok(net) => net,
        Err(_) => {
            let addr: IpAddr = text
                .parse()
                .map_err(|_| Error::invalid_range(format!("'{}' is not a valid IP range", text)))?;
            let prefix_len = if addr.is_ipv4() { 32 } else { 128 };
            IpNet::new(addr, prefix_len)
                .map_err(|e| Error::invalid_range(format!("'{}': {}", text, e)))?
        }
    };

    Ok(net.trunc())
}

/// Number of addresses in the network, `2^(bits - prefix)`
///
/// `None` when the count does not fit in a u128 (only `::/0`).
pub fn range_size(net: &IpNet) -> Option<u128> {
    let host_bits = u32::from(net.max_prefix_len() - net.prefix_len());
    1u128.checked_shl(host_bits)
}

/// Every address of the network in ascending numeric order, as canonical text
///
/// Callers are expected to bound the size with [`range_size`] first.
pub fn expand_range(net: &IpNet) -> Vec<String> {
    match net {
        IpNet::V4(net) => Ipv4AddrRange::new(net.network(), net.broadcast())
            .map(|addr| addr.to_string())
            .collect(),
        IpNet::V6(net) => Ipv6AddrRange::new(net.network(), net.broadcast())
            .map(|addr| addr.to_string())
            .collect(),
    }
}
