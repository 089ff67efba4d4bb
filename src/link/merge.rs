//! Derives a [`LinkProperties`] snapshot from a successful radio response.
//!
//! 从成功的无线电响应中推导 [`LinkProperties`] 快照。
//!
//! The merger either produces a complete new snapshot or rejects the response
//! as a whole. It never hands back a partially filled snapshot.

use std::net::IpAddr;

use thiserror::Error;
use tracing::debug;

use super::properties::{LinkAddress, LinkProperties, RouteInfo};
use crate::radio::SetupResponse;

/// Why a radio response could not be turned into link properties.
///
/// 无线电响应无法转换为链路属性的原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeRejection {
    #[error("no address for interface {interface:?}")]
    NoAddresses { interface: String },

    #[error("non-numeric ip address {0:?}")]
    NonNumericAddress(String),

    /// The prefix is not a number or does not fit the address family.
    #[error("bad prefix length in {0:?}")]
    BadPrefixLength(String),

    #[error("non-numeric dns address {0:?}")]
    NonNumericDns(String),

    #[error("empty dns response and no usable system dns")]
    NoDns,

    #[error("non-numeric gateway address {0:?}")]
    NonNumericGateway(String),
}

/// System-provided fallbacks for a bearer interface.
#[derive(Debug, Clone, Default)]
pub struct SystemDefaults {
    /// System DNS servers, `None` when the bearer technology judged them unusable.
    pub dns: Option<Vec<IpAddr>>,
    /// System gateways in textual form.
    pub gateways: Vec<String>,
}

fn parse_ip(text: &str) -> Option<IpAddr> {
    text.parse().ok()
}

fn parse_address(entry: &str) -> Result<Option<LinkAddress>, MergeRejection> {
    let (addr_text, prefix_text) = match entry.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (entry, None),
    };
    let address =
        parse_ip(addr_text).ok_or_else(|| MergeRejection::NonNumericAddress(entry.to_string()))?;
    if address.is_unspecified() {
        return Ok(None);
    }

    // A zero or missing prefix means a host address.
    let prefix_len = match prefix_text {
        Some(text) => text
            .trim()
            .parse::<u8>()
            .map_err(|_| MergeRejection::BadPrefixLength(entry.to_string()))?,
        None => 0,
    };
    if prefix_len == 0 {
        return Ok(Some(LinkAddress::host(address)));
    }
    LinkAddress::new(address, prefix_len)
        .map(Some)
        .ok_or_else(|| MergeRejection::BadPrefixLength(entry.to_string()))
}

fn non_empty(entries: &[String]) -> impl Iterator<Item = &str> {
    entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty())
}

/// Builds link properties from a response whose status is success.
///
/// 根据状态为成功的响应构建链路属性。
///
/// Unspecified (`0.0.0.0` / `::`) entries are skipped. An empty DNS list falls
/// back to the system DNS only when `system.dns` is `Some`; an empty gateway
/// list falls back to `system.gateways`. The HTTP proxy is left unset, the
/// caller carries it over from the previous snapshot.
pub fn merge_response(
    response: &SetupResponse,
    system: &SystemDefaults,
) -> Result<LinkProperties, MergeRejection> {
    let mut lp = LinkProperties {
        interface: Some(response.interface.clone()),
        ..Default::default()
    };

    if response.addresses.is_empty() {
        return Err(MergeRejection::NoAddresses {
            interface: response.interface.clone(),
        });
    }
    for entry in non_empty(&response.addresses) {
        if let Some(address) = parse_address(entry)? {
            lp.add_address(address);
        }
    }

    if !response.dns.is_empty() {
        for entry in non_empty(&response.dns) {
            let server =
                parse_ip(entry).ok_or_else(|| MergeRejection::NonNumericDns(entry.to_string()))?;
            if !server.is_unspecified() {
                lp.add_dns(server);
            }
        }
    } else if let Some(servers) = &system.dns {
        debug!(interface = %response.interface, "Using system dns for empty dns response");
        for server in servers.iter().filter(|s| !s.is_unspecified()) {
            lp.add_dns(*server);
        }
    } else {
        return Err(MergeRejection::NoDns);
    }

    let gateways = if response.gateways.is_empty() {
        &system.gateways
    } else {
        &response.gateways
    };
    for entry in non_empty(gateways) {
        let gateway =
            parse_ip(entry).ok_or_else(|| MergeRejection::NonNumericGateway(entry.to_string()))?;
        if !gateway.is_unspecified() {
            lp.add_route(RouteInfo { gateway });
        }
    }

    Ok(lp)
}
