//! Classification of setup completions.
//!
//! 建立完成结果的分类。

use crate::{fail_cause::FailCause, link::LinkProperties, radio::CommandError};

/// What a setup completion (or a link update) means for the bearer.
///
/// 建立完成（或链路更新）对承载意味着什么。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupResult {
    /// Link properties were accepted.
    Success,
    /// The radio refused the command outright.
    BadCommand(FailCause),
    /// The radio set something up, but its link parameters are unusable.
    UnacceptableParameter,
    /// The command failed without a structured status; ask the radio for the
    /// last failure cause.
    FetchLastFailure,
    /// The radio reported a structured failure cause.
    RadioError(FailCause),
    /// The completion belongs to a superseded attempt.
    Stale,
}

/// Result of re-running the link merger on a new radio response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkUpdate {
    pub result: SetupResult,
    pub old: LinkProperties,
    /// The new snapshot; empty when the update was rejected.
    pub new: LinkProperties,
}

/// Classifies a setup command that failed at the transport level.
///
/// A response attached to the error is trusted only from
/// `min_structured_version` on; otherwise the radio is asked for the cause.
pub(crate) fn classify_command_error(
    error: &CommandError,
    min_structured_version: i32,
) -> SetupResult {
    match error {
        CommandError::RadioNotAvailable => SetupResult::BadCommand(FailCause::RadioNotAvailable),
        CommandError::Rejected(response) if response.version >= min_structured_version => {
            SetupResult::RadioError(FailCause::from_code(response.status))
        }
        _ => SetupResult::FetchLastFailure,
    }
}
