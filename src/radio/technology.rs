//! Per-technology capability injected into each bearer.
//!
//! 注入到每个承载中的按技术区分的能力。
//!
//! The state machine never branches on the radio technology itself. Building
//! the setup command and judging DNS servers are the two places where
//! technologies differ, so they live behind [`BearerTechnology`].

use std::net::IpAddr;

use super::{DataProfile, SetupParams};
use crate::apn::{ApnConfig, AuthType};

/// Technology-specific behaviour of a bearer.
pub trait BearerTechnology: Send + Sync + 'static {
    /// Builds the setup command for `apn`.
    fn setup_params(&self, apn: &ApnConfig) -> SetupParams;

    /// Whether the given system DNS servers may be used when the radio
    /// response carries none.
    fn is_dns_acceptable(&self, servers: &[IpAddr], apn: &ApnConfig) -> bool;

    /// System-provided DNS servers for `interface`.
    fn system_dns(&self, _interface: &str) -> Vec<IpAddr> {
        Vec::new()
    }

    /// System-provided gateways for `interface`, used when the radio response
    /// carries none.
    fn system_gateways(&self, _interface: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Behaviour of 3GPP packet-data bearers.
///
/// 3GPP分组数据承载的行为。
#[derive(Debug, Clone, Default)]
pub struct StandardTechnology {
    /// Data radio technology reported by the current service state.
    pub data_radio_technology: u32,
    /// Skip the "all-unspecified DNS" sanity check.
    pub dns_check_disabled: bool,
    /// DNS servers published by the system for the bearer interface.
    pub system_dns: Vec<IpAddr>,
    /// Gateways published by the system for the bearer interface.
    pub system_gateways: Vec<String>,
}

impl BearerTechnology for StandardTechnology {
    fn setup_params(&self, apn: &ApnConfig) -> SetupParams {
        // Radio technology codes are offset by two from service-state codes.
        let radio_technology = if apn.bearer > 0 {
            apn.bearer + 2
        } else {
            self.data_radio_technology + 2
        };
        let profile = if apn.types.iter().any(|t| t == "dun") {
            DataProfile::Tethered
        } else {
            DataProfile::Default
        };
        let auth_type = match apn.auth_type {
            AuthType::None if apn.user.as_deref().is_some_and(|u| !u.is_empty()) => {
                AuthType::PapOrChap
            }
            other => other,
        };

        SetupParams {
            radio_technology,
            profile,
            apn: apn.apn.clone(),
            user: apn.user.clone(),
            password: apn.password.clone(),
            auth_type,
            protocol: apn.protocol,
        }
    }

    fn is_dns_acceptable(&self, servers: &[IpAddr], apn: &ApnConfig) -> bool {
        let all_unspecified = !servers.is_empty() && servers.iter().all(|s| s.is_unspecified());
        if all_unspecified && !self.dns_check_disabled {
            // An MMS-only access point with a literal proxy address never
            // resolves names, so missing DNS is harmless there.
            return apn.is_mms_primary() && apn.has_literal_mms_proxy();
        }
        true
    }

    fn system_dns(&self, _interface: &str) -> Vec<IpAddr> {
        self.system_dns.clone()
    }

    fn system_gateways(&self, _interface: &str) -> Vec<String> {
        self.system_gateways.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn unspecified() -> Vec<IpAddr> {
        vec![IpAddr::V4(Ipv4Addr::UNSPECIFIED), IpAddr::V4(Ipv4Addr::UNSPECIFIED)]
    }

    #[test]
    fn test_setup_params_for_tethering_apn() {
        let tech = StandardTechnology {
            data_radio_technology: 14,
            ..Default::default()
        };
        let mut apn = ApnConfig::new("tether", &["dun"]);
        apn.user = Some("alice".to_string());

        let params = tech.setup_params(&apn);
        assert_eq!(params.radio_technology, 16);
        assert_eq!(params.profile, DataProfile::Tethered);
        assert_eq!(params.auth_type, AuthType::PapOrChap);
        assert_eq!(params.apn, "tether");
    }

    #[test]
    fn test_pinned_bearer_overrides_service_state() {
        let tech = StandardTechnology::default();
        let mut apn = ApnConfig::new("internet", &["default"]);
        apn.bearer = 3;
        assert_eq!(tech.setup_params(&apn).radio_technology, 5);
        assert_eq!(tech.setup_params(&apn).profile, DataProfile::Default);
    }

    #[test]
    fn test_unspecified_dns_rejected_unless_check_disabled() {
        let apn = ApnConfig::new("internet", &["default"]);
        let tech = StandardTechnology::default();
        assert!(!tech.is_dns_acceptable(&unspecified(), &apn));

        let relaxed = StandardTechnology {
            dns_check_disabled: true,
            ..Default::default()
        };
        assert!(relaxed.is_dns_acceptable(&unspecified(), &apn));
    }

    #[test]
    fn test_mms_with_literal_proxy_tolerates_missing_dns() {
        let mut apn = ApnConfig::new("mms", &["mms"]);
        apn.mms_proxy = Some("10.1.1.1".to_string());
        assert!(StandardTechnology::default().is_dns_acceptable(&unspecified(), &apn));
    }

    #[test]
    fn test_real_dns_is_acceptable() {
        let apn = ApnConfig::new("internet", &["default"]);
        let servers = vec![IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))];
        assert!(StandardTechnology::default().is_dns_acceptable(&servers, &apn));
    }
}
