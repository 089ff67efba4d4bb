//! Contracts of the radio layer that actually sets up and tears down bearers.
//!
//! 实际建立和拆除承载的无线电层的契约。
//!
//! The bearer state machine never talks to a modem directly: it issues
//! commands through [`RadioInterface`] and receives their completions back in
//! its mailbox.

pub mod technology;

pub use technology::{BearerTechnology, StandardTechnology};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::apn::{AuthType, PdpProtocol};

/// Transport-level failure of a radio command.
///
/// 无线电命令的传输层失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The radio is not available (powered off, crashed or not yet connected).
    /// 无线电不可用。
    #[error("radio not available")]
    RadioNotAvailable,

    /// The radio rejected the command without further detail.
    #[error("generic failure")]
    GenericFailure,

    #[error("request not supported")]
    RequestNotSupported,

    /// The command failed but the radio still attached a setup response. Its
    /// status is only meaningful for structured response versions.
    /// 命令失败，但无线电仍附带了建立应答。
    #[error("setup rejected with status {}", .0.status)]
    Rejected(Box<SetupResponse>),

    #[error("{0}")]
    Other(String),
}

/// A specialized `Result` for radio commands.
pub type RadioResult<T> = std::result::Result<T, CommandError>;

/// Data profile requested from the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataProfile {
    #[default]
    Default,
    Tethered,
}

/// Parameters of a setup command.
///
/// 建立命令的参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupParams {
    pub radio_technology: u32,
    pub profile: DataProfile,
    pub apn: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub auth_type: AuthType,
    pub protocol: PdpProtocol,
}

/// The radio's answer to a setup command, also used for later link updates.
///
/// 无线电对建立命令的应答，也用于之后的链路更新。
///
/// Addresses are kept in the textual form the radio reports them in; the link
/// merger is responsible for validating them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupResponse {
    /// Response format version. When a failed command attaches a response,
    /// versions below the configured minimum do not carry a meaningful
    /// `status`.
    pub version: i32,
    /// `0` on success, otherwise a [`FailCause`](crate::FailCause) wire code.
    pub status: i32,
    /// Radio-assigned bearer id.
    pub bearer_id: i32,
    pub active: i32,
    pub pdp_type: String,
    pub interface: String,
    /// Local addresses, optionally with a `/prefix` suffix.
    pub addresses: Vec<String>,
    pub dns: Vec<String>,
    pub gateways: Vec<String>,
    /// Suggested retry delay in milliseconds, negative when absent.
    pub suggested_retry_time: i32,
}

impl SetupResponse {
    /// A failed response carrying only a status and a retry suggestion.
    pub fn failure(version: i32, cause: crate::FailCause, suggested_retry_time: i32) -> Self {
        Self {
            version,
            status: cause.code(),
            bearer_id: 0,
            active: 0,
            pdp_type: String::new(),
            interface: String::new(),
            addresses: Vec::new(),
            dns: Vec::new(),
            gateways: Vec::new(),
            suggested_retry_time,
        }
    }
}

/// Reason passed along with a deactivation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeactivateReason {
    #[default]
    None,
    RadioOff,
    PdpReset,
}

impl DeactivateReason {
    /// Tear-down reason string that switches the radio off.
    pub const RADIO_TURNED_OFF: &'static str = "radioTurnedOff";
    /// Tear-down reason string requesting a PDP reset.
    pub const PDP_RESET: &'static str = "pdpReset";

    /// Maps a human-readable tear-down reason to the radio's reason code.
    pub fn from_reason(reason: &str) -> Self {
        match reason {
            Self::RADIO_TURNED_OFF => DeactivateReason::RadioOff,
            Self::PDP_RESET => DeactivateReason::PdpReset,
            _ => DeactivateReason::None,
        }
    }
}

/// The radio command interface consumed by the bearer actor.
///
/// 承载actor所使用的无线电命令接口。
///
/// Implementations own their timeouts: a command future is expected to
/// resolve eventually, either with a response or with a [`CommandError`].
#[async_trait]
pub trait RadioInterface: Send + Sync + 'static {
    /// Requests a new bearer.
    async fn setup_bearer(&self, params: SetupParams) -> RadioResult<SetupResponse>;

    /// Releases the bearer with the given id.
    async fn deactivate_bearer(&self, bearer_id: i32, reason: DeactivateReason) -> RadioResult<()>;

    /// Fetches the cause of the last failed setup, for radios whose setup
    /// responses do not carry a structured status.
    ///
    /// The radio keeps a single last failure cause rather than one per
    /// bearer, so the query takes no bearer id.
    async fn last_fail_cause(&self) -> RadioResult<i32>;

    /// Subscribes to "radio connected" notifications, each carrying the radio
    /// protocol version. Dropping the receiver unsubscribes.
    fn subscribe_radio_connected(&self) -> mpsc::Receiver<RadioResult<i32>>;

    /// Whether the radio is currently powered on. When it is off, deactivation
    /// completes immediately without a radio round trip.
    fn is_radio_on(&self) -> bool {
        true
    }
}
