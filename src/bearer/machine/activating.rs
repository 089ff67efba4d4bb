//! Activating: a setup command is in flight.
//!
//! 激活中状态：建立命令正在进行中。

use std::time::Duration;

use tracing::{debug, info};

use super::{BearerMachine, Dispatch};
use crate::{
    bearer::{
        message::{DeactivateOrigin, Message, RadioRequest},
        outcome::{SetupResult, classify_command_error},
        request::ConnectRequest,
        state::{BearerState, EntryNotice},
    },
    fail_cause::FailCause,
    radio::{RadioResult, SetupResponse},
};

/// The radio's retry suggestion, if the command completed and carried one.
fn suggested_retry(result: &RadioResult<SetupResponse>) -> Option<Duration> {
    match result {
        Ok(response) if response.suggested_retry_time >= 0 => {
            Some(Duration::from_millis(response.suggested_retry_time as u64))
        }
        _ => None,
    }
}

impl BearerMachine {
    pub(super) fn activating_process(&mut self, msg: Message) -> Dispatch {
        match msg {
            // A second client may join once this attempt resolves.
            msg @ Message::Connect(_) => {
                self.defer(msg);
                Dispatch::Handled
            }
            Message::SetupDone { request, result } => {
                let outcome = self.on_setup_completed(&request, &result);
                debug!(bearer = %self.name, ?outcome, ref_count = self.record.clients.len(), "Setup completed");
                self.apply_setup_outcome(outcome, request, &result);
                Dispatch::Handled
            }
            Message::LastFailCauseDone { request, result } => {
                if request.tag != self.record.generation {
                    debug!(
                        bearer = %self.name,
                        tag = request.tag,
                        generation = self.record.generation,
                        "Stale last-fail-cause completion"
                    );
                    return Dispatch::Handled;
                }
                let cause = match result {
                    Ok(code) => FailCause::from_code(code),
                    Err(e) => {
                        debug!(bearer = %self.name, error = %e, "Fetching last fail cause failed");
                        FailCause::Unknown
                    }
                };
                self.transition_to(
                    BearerState::Inactive,
                    EntryNotice::ConnectFailed {
                        request,
                        cause,
                        retry_override: None,
                    },
                );
                Dispatch::Handled
            }
            other => Dispatch::NotHandled(other),
        }
    }

    /// Classifies a setup completion. The generation check comes first, so a
    /// stale completion never touches the record.
    fn on_setup_completed(
        &mut self,
        request: &ConnectRequest,
        result: &RadioResult<SetupResponse>,
    ) -> SetupResult {
        if request.tag != self.record.generation {
            debug!(
                bearer = %self.name,
                tag = request.tag,
                generation = self.record.generation,
                "Stale setup completion"
            );
            return SetupResult::Stale;
        }

        match result {
            Err(e) => {
                debug!(bearer = %self.name, error = %e, "Setup command failed");
                classify_command_error(e, self.config.min_structured_status_version)
            }
            Ok(response) if response.status != 0 => {
                SetupResult::RadioError(FailCause::from_code(response.status))
            }
            Ok(response) => {
                let update = self.update_link_properties(response);
                if update.result == SetupResult::Success {
                    self.record.bearer_id = response.bearer_id;
                }
                update.result
            }
        }
    }

    fn apply_setup_outcome(
        &mut self,
        outcome: SetupResult,
        request: ConnectRequest,
        result: &RadioResult<SetupResponse>,
    ) {
        match outcome {
            SetupResult::Success => {
                self.transition_to(BearerState::Active, EntryNotice::ConnectSucceeded(request));
            }
            SetupResult::BadCommand(cause) => {
                self.transition_to(
                    BearerState::Inactive,
                    EntryNotice::ConnectFailed {
                        request,
                        cause,
                        retry_override: None,
                    },
                );
            }
            SetupResult::UnacceptableParameter => {
                // The radio believes a bearer exists; release it before going inactive.
                let bearer_id = match result {
                    Ok(response) => response.bearer_id,
                    Err(_) => self.record.bearer_id,
                };
                info!(bearer = %self.name, bearer_id, "Tearing down bearer with unacceptable parameters");
                self.tear_down_data(bearer_id, DeactivateOrigin::SetupError(request));
                self.transition_to(BearerState::DisconnectingSetupError, EntryNotice::None);
            }
            SetupResult::FetchLastFailure => {
                self.outbox.push(RadioRequest::FetchLastFailCause { request });
            }
            SetupResult::RadioError(cause) => {
                self.transition_to(
                    BearerState::Inactive,
                    EntryNotice::ConnectFailed {
                        request,
                        cause,
                        retry_override: suggested_retry(result),
                    },
                );
            }
            SetupResult::Stale => {}
        }
    }
}
