//! Access-point parameters handed to the radio when setting up a bearer.
//!
//! 建立承载时交给无线电的接入点参数。

use std::net::IpAddr;

/// Authentication scheme used by the access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    #[default]
    None,
    Pap,
    Chap,
    PapOrChap,
}

/// IP protocol requested from the access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdpProtocol {
    #[default]
    Ip,
    Ipv6,
    Ipv4v6,
}

impl PdpProtocol {
    /// The protocol name as the radio expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            PdpProtocol::Ip => "IP",
            PdpProtocol::Ipv6 => "IPV6",
            PdpProtocol::Ipv4v6 => "IPV4V6",
        }
    }
}

/// The access-point configuration a client brings a bearer up with.
///
/// 客户端建立承载时使用的接入点配置。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApnConfig {
    /// Access point name, e.g. `"internet"`.
    pub apn: String,
    /// Service types served by this access point, e.g. `["default", "supl"]`.
    pub types: Vec<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub auth_type: AuthType,
    pub protocol: PdpProtocol,
    /// MMS proxy host, either a literal address or a host name.
    pub mms_proxy: Option<String>,
    /// Radio technology this access point is pinned to, `0` for "any".
    pub bearer: u32,
}

impl ApnConfig {
    /// Creates a configuration for `apn` serving the given types.
    pub fn new(apn: impl Into<String>, types: &[&str]) -> Self {
        Self {
            apn: apn.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Whether the first declared type is `mms`.
    pub fn is_mms_primary(&self) -> bool {
        self.types.first().is_some_and(|t| t == "mms")
    }

    /// Whether the MMS proxy is a literal IP address rather than a host name.
    pub fn has_literal_mms_proxy(&self) -> bool {
        self.mms_proxy
            .as_deref()
            .is_some_and(|proxy| proxy.parse::<IpAddr>().is_ok())
    }
}
