//! Defines the bearer state machine's states and the notifications a state
//! delivers when it is entered.
//!
//! 定义承载状态机的状态，以及进入状态时发送的通知。

use std::time::Duration;

use super::request::{ConnectRequest, DisconnectRequest};
use crate::fail_cause::FailCause;

/// The state of a bearer.
/// 承载的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BearerState {
    /// No bearer exists. The resting state, reused across connections.
    /// 不存在承载。可重复使用的静止状态。
    Inactive,
    /// A setup command is in flight.
    /// 建立命令正在进行中。
    Activating,
    /// The bearer is up and serving at least one client.
    /// 承载已建立并服务于至少一个客户端。
    Active,
    /// A deactivation command for a regular tear-down is in flight.
    /// 常规拆除的去激活命令正在进行中。
    Disconnecting,
    /// A deactivation command is in flight because setup returned unusable
    /// link parameters.
    /// 由于建立返回了不可用的链路参数，去激活命令正在进行中。
    DisconnectingSetupError,
}

impl BearerState {
    pub fn name(self) -> &'static str {
        match self {
            BearerState::Inactive => "Inactive",
            BearerState::Activating => "Activating",
            BearerState::Active => "Active",
            BearerState::Disconnecting => "Disconnecting",
            BearerState::DisconnectingSetupError => "DisconnectingSetupError",
        }
    }

    /// Whether the machine may move from `self` to `next`.
    pub fn can_transition_to(self, next: BearerState) -> bool {
        use BearerState::*;

        match (self, next) {
            // A forced reset may land in Inactive from anywhere.
            (_, Inactive) => true,
            (Inactive, Activating) => true,
            (Activating, Active) => true,
            (Activating, DisconnectingSetupError) => true,
            (Active, Disconnecting) => true,
            _ => false,
        }
    }
}

/// Notification handed to the next state, delivered only once that state has
/// been entered so observers reacting to it see the new state.
#[derive(Debug, Default)]
pub(crate) enum EntryNotice {
    #[default]
    None,
    ConnectSucceeded(ConnectRequest),
    ConnectFailed {
        request: ConnectRequest,
        cause: FailCause,
        retry_override: Option<Duration>,
    },
    Disconnected(DisconnectRequest),
}
