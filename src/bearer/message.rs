//! Messages processed by the bearer mailbox and commands it issues to the radio.
//!
//! 承载邮箱处理的消息，以及它向无线电发出的命令。

use tokio::sync::oneshot;

use super::{
    outcome::LinkUpdate,
    request::{ClientRef, ConnectRequest, DisconnectRequest, ReconnectIntent},
};
use crate::{
    apn::ApnConfig,
    link::{LinkCapabilities, LinkProperties, ProxyProperties},
    radio::{DeactivateReason, RadioResult, SetupParams, SetupResponse},
};

/// Everything the bearer mailbox can carry.
#[derive(Debug)]
pub(crate) enum Message {
    Connect(ConnectRequest),
    Disconnect(DisconnectRequest),
    DisconnectAll(DisconnectRequest),
    /// Completion of a setup command. The request carries its issue-time tag.
    SetupDone {
        request: ConnectRequest,
        result: RadioResult<SetupResponse>,
    },
    LastFailCauseDone {
        request: ConnectRequest,
        result: RadioResult<i32>,
    },
    DeactivateDone {
        origin: DeactivateOrigin,
    },
    RadioConnected(RadioResult<i32>),
    Query(Query),
    /// Stops the actor permanently.
    ChannelClosed,
}

impl Message {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Message::Connect(_) => "Connect",
            Message::Disconnect(_) => "Disconnect",
            Message::DisconnectAll(_) => "DisconnectAll",
            Message::SetupDone { .. } => "SetupDone",
            Message::LastFailCauseDone { .. } => "LastFailCauseDone",
            Message::DeactivateDone { .. } => "DeactivateDone",
            Message::RadioConnected(_) => "RadioConnected",
            Message::Query(query) => query.name(),
            Message::ChannelClosed => "ChannelClosed",
        }
    }
}

/// The request a deactivation was issued for.
#[derive(Debug)]
pub(crate) enum DeactivateOrigin {
    /// A regular tear-down.
    Disconnect(DisconnectRequest),
    /// Cleanup of a bearer whose setup returned unacceptable parameters.
    SetupError(ConnectRequest),
}

impl DeactivateOrigin {
    pub(crate) fn tag(&self) -> u64 {
        match self {
            DeactivateOrigin::Disconnect(dp) => dp.tag,
            DeactivateOrigin::SetupError(cp) => cp.tag,
        }
    }
}

/// Status and control queries answered without touching the connection
/// lifecycle (except `Reset`).
#[derive(Debug)]
pub(crate) enum Query {
    IsInactive(oneshot::Sender<bool>),
    BearerId(oneshot::Sender<i32>),
    ApnConfig(oneshot::Sender<Option<ApnConfig>>),
    LinkProperties(oneshot::Sender<LinkProperties>),
    SetHttpProxy {
        proxy: Option<ProxyProperties>,
        reply: oneshot::Sender<()>,
    },
    UpdateLinkProperties {
        response: SetupResponse,
        reply: oneshot::Sender<LinkUpdate>,
    },
    Capabilities(oneshot::Sender<LinkCapabilities>),
    Reset(oneshot::Sender<()>),
    RefCount(oneshot::Sender<usize>),
    Clients(oneshot::Sender<Vec<ClientRef>>),
    SetReconnectIntent {
        intent: Option<ReconnectIntent>,
        reply: oneshot::Sender<()>,
    },
    ReconnectIntent(oneshot::Sender<Option<ReconnectIntent>>),
}

impl Query {
    fn name(&self) -> &'static str {
        match self {
            Query::IsInactive(_) => "IsInactive",
            Query::BearerId(_) => "BearerId",
            Query::ApnConfig(_) => "ApnConfig",
            Query::LinkProperties(_) => "LinkProperties",
            Query::SetHttpProxy { .. } => "SetHttpProxy",
            Query::UpdateLinkProperties { .. } => "UpdateLinkProperties",
            Query::Capabilities(_) => "Capabilities",
            Query::Reset(_) => "Reset",
            Query::RefCount(_) => "RefCount",
            Query::Clients(_) => "Clients",
            Query::SetReconnectIntent { .. } => "SetReconnectIntent",
            Query::ReconnectIntent(_) => "ReconnectIntent",
        }
    }
}

/// Commands the machine asks the actor to run against the radio.
#[derive(Debug)]
pub(crate) enum RadioRequest {
    Setup {
        params: SetupParams,
        request: ConnectRequest,
    },
    Deactivate {
        bearer_id: i32,
        reason: DeactivateReason,
        origin: DeactivateOrigin,
    },
    FetchLastFailCause {
        request: ConnectRequest,
    },
}
