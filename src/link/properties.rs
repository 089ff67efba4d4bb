//! Immutable link snapshots.
//!
//! 不可变的链路快照。

use std::{collections::BTreeMap, fmt, net::IpAddr};

/// A local address with its prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkAddress {
    pub address: IpAddr,
    pub prefix_len: u8,
}

impl LinkAddress {
    /// Creates a link address, returning `None` if the prefix length does not
    /// fit the address family.
    pub fn new(address: IpAddr, prefix_len: u8) -> Option<Self> {
        let max = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        (prefix_len <= max).then_some(Self { address, prefix_len })
    }

    /// A host address (full-length prefix).
    pub fn host(address: IpAddr) -> Self {
        let prefix_len = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        Self { address, prefix_len }
    }
}

impl fmt::Display for LinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

/// A default route through `gateway`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteInfo {
    pub gateway: IpAddr,
}

/// HTTP proxy settings attached to a link. The radio never reports these; they
/// are set by the owner and survive link updates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProxyProperties {
    pub host: String,
    pub port: u16,
    pub exclusion_list: Vec<String>,
}

/// The negotiated addressing, routing and DNS configuration of a bearer.
///
/// 承载协商得到的寻址、路由和DNS配置。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkProperties {
    pub interface: Option<String>,
    pub addresses: Vec<LinkAddress>,
    pub dns: Vec<IpAddr>,
    pub routes: Vec<RouteInfo>,
    pub http_proxy: Option<ProxyProperties>,
}

impl LinkProperties {
    /// Whether nothing has been negotiated yet.
    pub fn is_empty(&self) -> bool {
        self.interface.is_none()
            && self.addresses.is_empty()
            && self.dns.is_empty()
            && self.routes.is_empty()
            && self.http_proxy.is_none()
    }

    /// Returns a copy carrying `proxy` instead of the current HTTP proxy.
    pub fn with_http_proxy(&self, proxy: Option<ProxyProperties>) -> Self {
        Self {
            http_proxy: proxy,
            ..self.clone()
        }
    }

    pub(crate) fn add_address(&mut self, address: LinkAddress) {
        if !self.addresses.contains(&address) {
            self.addresses.push(address);
        }
    }

    pub(crate) fn add_dns(&mut self, server: IpAddr) {
        if !self.dns.contains(&server) {
            self.dns.push(server);
        }
    }

    pub(crate) fn add_route(&mut self, route: RouteInfo) {
        if !self.routes.contains(&route) {
            self.routes.push(route);
        }
    }
}

/// Opaque capability set of a link, keyed by capability name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkCapabilities {
    entries: BTreeMap<String, String>,
}

impl LinkCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
