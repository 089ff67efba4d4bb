//! The mutable state shared by every bearer state.
//!
//! 所有承载状态共享的可变状态。

use std::time::{Duration, SystemTime};

use super::{clients::ClientSet, request::ReconnectIntent};
use crate::{
    apn::ApnConfig,
    fail_cause::FailCause,
    link::{LinkCapabilities, LinkProperties},
};

/// Connection record of one bearer slot, owned exclusively by its machine.
///
/// 单个承载槽位的连接记录，由其状态机独占。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConnectionRecord {
    /// Bumped on every entry into Inactive. Completions carrying another value are stale.
    pub generation: u64,
    /// `-1` while no bearer is allocated.
    pub bearer_id: i32,
    pub apn: Option<ApnConfig>,
    pub link_properties: LinkProperties,
    pub capabilities: LinkCapabilities,
    pub create_time: Option<SystemTime>,
    pub last_fail_time: Option<SystemTime>,
    pub last_fail_cause: FailCause,
    pub retry_override: Option<Duration>,
    pub clients: ClientSet,
    /// Radio protocol version, `-1` until the radio reports connected.
    pub radio_version: i32,
    pub reconnect_intent: Option<ReconnectIntent>,
}

impl Default for ConnectionRecord {
    fn default() -> Self {
        Self {
            generation: 0,
            bearer_id: -1,
            apn: None,
            link_properties: LinkProperties::default(),
            capabilities: LinkCapabilities::default(),
            create_time: None,
            last_fail_time: None,
            last_fail_cause: FailCause::None,
            retry_override: None,
            clients: ClientSet::new(),
            radio_version: -1,
            reconnect_intent: None,
        }
    }
}

impl ConnectionRecord {
    /// Resets every per-connection field. The generation, capabilities, radio
    /// version and reconnect intent outlive a single connection.
    pub(crate) fn clear_settings(&mut self) {
        self.create_time = None;
        self.last_fail_time = None;
        self.last_fail_cause = FailCause::None;
        self.retry_override = None;
        self.bearer_id = -1;
        self.link_properties = LinkProperties::default();
        self.clients.clear();
        self.apn = None;
    }

    /// Releases everything the record holds when the machine stops.
    pub(crate) fn release(&mut self) {
        self.clear_settings();
        self.capabilities = LinkCapabilities::default();
        self.reconnect_intent = None;
    }
}
