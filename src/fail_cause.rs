//! Classification of bearer failure causes.
//!
//! 承载失败原因的分类。
//!
//! Every cause carries its numeric wire code together with two flags: whether
//! retrying is pointless (`permanent`) and whether the cause is worth an event
//! log entry (`loggable`).

use std::fmt;

/// Reason a bring-up attempt, or the bearer itself, failed.
///
/// 承载建立尝试或承载本身失败的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FailCause {
    /// Success. The only non-failure value.
    #[default]
    None,

    // Causes reported by the network, in the range reserved by the standard.
    OperatorBarred,
    InsufficientResources,
    MissingUnknownApn,
    UnknownPdpAddressType,
    UserAuthentication,
    ActivationRejectGgsn,
    ActivationRejectUnspecified,
    ServiceOptionNotSupported,
    ServiceOptionNotSubscribed,
    ServiceOptionOutOfOrder,
    NsapiInUse,
    OnlyIpv4Allowed,
    OnlyIpv6Allowed,
    OnlySingleBearerAllowed,
    ProtocolErrors,

    // Local causes raised by the radio layer.
    RegistrationFail,
    GprsRegistrationFail,
    SignalLost,
    PrefRadioTechChanged,
    RadioPowerOff,
    TetheredCallActive,
    ErrorUnspecified,

    // Causes raised by this library.
    Unknown,
    RadioNotAvailable,
    UnacceptableNetworkParameter,
    ControlChannelBroken,
}

impl FailCause {
    /// Every cause, in wire-code declaration order.
    pub const ALL: [FailCause; 27] = [
        FailCause::None,
        FailCause::OperatorBarred,
        FailCause::InsufficientResources,
        FailCause::MissingUnknownApn,
        FailCause::UnknownPdpAddressType,
        FailCause::UserAuthentication,
        FailCause::ActivationRejectGgsn,
        FailCause::ActivationRejectUnspecified,
        FailCause::ServiceOptionNotSupported,
        FailCause::ServiceOptionNotSubscribed,
        FailCause::ServiceOptionOutOfOrder,
        FailCause::NsapiInUse,
        FailCause::OnlyIpv4Allowed,
        FailCause::OnlyIpv6Allowed,
        FailCause::OnlySingleBearerAllowed,
        FailCause::ProtocolErrors,
        FailCause::RegistrationFail,
        FailCause::GprsRegistrationFail,
        FailCause::SignalLost,
        FailCause::PrefRadioTechChanged,
        FailCause::RadioPowerOff,
        FailCause::TetheredCallActive,
        FailCause::ErrorUnspecified,
        FailCause::Unknown,
        FailCause::RadioNotAvailable,
        FailCause::UnacceptableNetworkParameter,
        FailCause::ControlChannelBroken,
    ];

    /// Returns the numeric wire code of this cause.
    /// 返回此原因的数字线路码。
    pub const fn code(self) -> i32 {
        match self {
            FailCause::None => 0,
            FailCause::OperatorBarred => 0x08,
            FailCause::InsufficientResources => 0x1A,
            FailCause::MissingUnknownApn => 0x1B,
            FailCause::UnknownPdpAddressType => 0x1C,
            FailCause::UserAuthentication => 0x1D,
            FailCause::ActivationRejectGgsn => 0x1E,
            FailCause::ActivationRejectUnspecified => 0x1F,
            FailCause::ServiceOptionNotSupported => 0x20,
            FailCause::ServiceOptionNotSubscribed => 0x21,
            FailCause::ServiceOptionOutOfOrder => 0x22,
            FailCause::NsapiInUse => 0x23,
            FailCause::OnlyIpv4Allowed => 0x32,
            FailCause::OnlyIpv6Allowed => 0x33,
            FailCause::OnlySingleBearerAllowed => 0x34,
            FailCause::ProtocolErrors => 0x6F,
            FailCause::RegistrationFail => -1,
            FailCause::GprsRegistrationFail => -2,
            FailCause::SignalLost => -3,
            FailCause::PrefRadioTechChanged => -4,
            FailCause::RadioPowerOff => -5,
            FailCause::TetheredCallActive => -6,
            FailCause::ErrorUnspecified => 0xFFFF,
            FailCause::Unknown => 0x10000,
            FailCause::RadioNotAvailable => 0x10001,
            FailCause::UnacceptableNetworkParameter => 0x10002,
            FailCause::ControlChannelBroken => 0x10003,
        }
    }

    /// Maps a wire code to its cause. Unrecognised codes map to [`FailCause::Unknown`].
    ///
    /// 将线路码映射为原因。无法识别的码映射为 [`FailCause::Unknown`]。
    pub fn from_code(code: i32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|cause| cause.code() == code)
            .unwrap_or(FailCause::Unknown)
    }

    /// Whether the owning retry policy should give up on this cause.
    ///
    /// `SignalLost` and `RadioPowerOff` are deliberately permanent even though
    /// they describe transient radio conditions; retry policies depend on it.
    ///
    /// 拥有者的重试策略是否应放弃此原因。
    pub const fn is_permanent(self) -> bool {
        matches!(
            self,
            FailCause::OperatorBarred
                | FailCause::MissingUnknownApn
                | FailCause::UnknownPdpAddressType
                | FailCause::UserAuthentication
                | FailCause::ActivationRejectGgsn
                | FailCause::ServiceOptionNotSupported
                | FailCause::ServiceOptionNotSubscribed
                | FailCause::NsapiInUse
                | FailCause::OnlyIpv4Allowed
                | FailCause::OnlyIpv6Allowed
                | FailCause::ProtocolErrors
                | FailCause::SignalLost
                | FailCause::RadioPowerOff
                | FailCause::TetheredCallActive
        )
    }

    /// Whether a failure with this cause deserves an event log entry.
    /// 此原因的失败是否值得记录事件日志。
    pub const fn is_event_loggable(self) -> bool {
        matches!(
            self,
            FailCause::OperatorBarred
                | FailCause::InsufficientResources
                | FailCause::UnknownPdpAddressType
                | FailCause::UserAuthentication
                | FailCause::ActivationRejectGgsn
                | FailCause::ActivationRejectUnspecified
                | FailCause::ServiceOptionNotSubscribed
                | FailCause::ServiceOptionNotSupported
                | FailCause::ServiceOptionOutOfOrder
                | FailCause::NsapiInUse
                | FailCause::OnlyIpv4Allowed
                | FailCause::OnlyIpv6Allowed
                | FailCause::ProtocolErrors
                | FailCause::SignalLost
                | FailCause::RadioPowerOff
                | FailCause::TetheredCallActive
                | FailCause::UnacceptableNetworkParameter
        )
    }

    /// Whether this is the success value.
    pub const fn is_none(self) -> bool {
        matches!(self, FailCause::None)
    }
}

impl fmt::Display for FailCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:x})", self, self.code())
    }
}
