//! Requests accepted by the bearer and the completions it delivers for them.
//!
//! 承载接受的请求及其完成通知。

use std::{fmt, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::{apn::ApnConfig, fail_cause::FailCause};

/// A logical client (access-point context) attached to a bearer.
///
/// 附着在承载上的逻辑客户端（接入点上下文）。
///
/// Two references are the same client when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientRef(Arc<str>);

impl ClientRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connected {
    /// Radio-assigned id of the bearer the client is now attached to.
    pub bearer_id: i32,
}

/// Failed bring-up, delivered through the same sink as success.
///
/// 建立失败，通过与成功相同的通知通道送达。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bearer setup failed: {cause}")]
pub struct SetupFailure {
    pub cause: FailCause,
    /// Radio-suggested delay before retrying, overriding the owner's default timing.
    pub retry_override: Option<Duration>,
}

/// Outcome of a bring-up request.
pub type ConnectResult = std::result::Result<Connected, SetupFailure>;

/// Completion of a tear-down request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnected {
    /// The client the request was for, `None` for tear-down-all.
    pub client: Option<ClientRef>,
    pub reason: String,
}

/// Receiver side of a bring-up completion sink.
pub type PendingConnect = oneshot::Receiver<ConnectResult>;

/// Receiver side of a tear-down completion sink.
pub type PendingDisconnect = oneshot::Receiver<Disconnected>;

/// A bring-up request travelling through the mailbox and the radio.
#[derive(Debug)]
pub(crate) struct ConnectRequest {
    pub(crate) client: ClientRef,
    pub(crate) apn: ApnConfig,
    /// Generation stamped when the request was admitted.
    pub(crate) tag: u64,
    sink: oneshot::Sender<ConnectResult>,
}

impl ConnectRequest {
    pub(crate) fn new(client: ClientRef, apn: ApnConfig) -> (Self, PendingConnect) {
        let (sink, rx) = oneshot::channel();
        (
            Self {
                client,
                apn,
                tag: 0,
                sink,
            },
            rx,
        )
    }

    /// Delivers the completion. A dropped receiver is not an error.
    pub(crate) fn complete(self, result: ConnectResult) {
        let _ = self.sink.send(result);
    }
}

/// A tear-down request, scoped to one client or to all of them.
#[derive(Debug)]
pub(crate) struct DisconnectRequest {
    /// `None` for tear-down-all.
    pub(crate) client: Option<ClientRef>,
    pub(crate) reason: String,
    pub(crate) tag: u64,
    /// Clients detached by this request whose notification waits for Inactive entry.
    pub(crate) detached: Vec<ClientRef>,
    sink: oneshot::Sender<Disconnected>,
}

impl DisconnectRequest {
    pub(crate) fn new(client: Option<ClientRef>, reason: String) -> (Self, PendingDisconnect) {
        let (sink, rx) = oneshot::channel();
        (
            Self {
                client,
                reason,
                tag: 0,
                detached: Vec::new(),
                sink,
            },
            rx,
        )
    }

    pub(crate) fn complete(self) {
        let done = Disconnected {
            client: self.client,
            reason: self.reason,
        };
        let _ = self.sink.send(done);
    }
}

/// Notifications routed to the owning tracker rather than to a request sink.
///
/// 路由到拥有者跟踪器而非请求通知通道的通知。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerNotice {
    /// A client lost its bearer as a side effect of another request
    /// (typically tear-down-all).
    DisconnectDone {
        bearer: u32,
        client: ClientRef,
        reason: String,
    },
}

/// Opaque reconnect intent stored on behalf of the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectIntent {
    pub action: String,
}
