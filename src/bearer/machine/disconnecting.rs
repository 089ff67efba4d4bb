//! Disconnecting states: a deactivation command is in flight.
//!
//! 断开中状态：去激活命令正在进行中。

use tracing::{debug, warn};

use super::{BearerMachine, Dispatch};
use crate::{
    bearer::{
        message::{DeactivateOrigin, Message, RadioRequest},
        state::{BearerState, EntryNotice},
    },
    fail_cause::FailCause,
    radio::DeactivateReason,
};

impl BearerMachine {
    pub(super) fn disconnecting_process(&mut self, msg: Message) -> Dispatch {
        self.wait_for_deactivation(msg)
    }

    pub(super) fn setup_error_process(&mut self, msg: Message) -> Dispatch {
        self.wait_for_deactivation(msg)
    }

    fn wait_for_deactivation(&mut self, msg: Message) -> Dispatch {
        match msg {
            // Retried once a fresh Inactive cycle begins.
            msg @ Message::Connect(_) => {
                self.defer(msg);
                Dispatch::Handled
            }
            Message::DeactivateDone { origin } => {
                self.on_deactivate_done(origin);
                Dispatch::Handled
            }
            other => Dispatch::NotHandled(other),
        }
    }

    fn on_deactivate_done(&mut self, origin: DeactivateOrigin) {
        if origin.tag() != self.record.generation {
            debug!(
                bearer = %self.name,
                state = self.state.name(),
                tag = origin.tag(),
                generation = self.record.generation,
                "Stale deactivation completion"
            );
            return;
        }

        let expected = match &origin {
            DeactivateOrigin::Disconnect(_) => BearerState::Disconnecting,
            DeactivateOrigin::SetupError(_) => BearerState::DisconnectingSetupError,
        };
        if expected != self.state {
            warn!(bearer = %self.name, state = self.state.name(), "Deactivation origin does not match state");
        }

        let notice = match origin {
            DeactivateOrigin::Disconnect(request) => EntryNotice::Disconnected(request),
            // The bring-up this cleanup belongs to never succeeded.
            DeactivateOrigin::SetupError(request) => EntryNotice::ConnectFailed {
                request,
                cause: FailCause::UnacceptableNetworkParameter,
                retry_override: None,
            },
        };
        self.transition_to(BearerState::Inactive, notice);
    }

    /// Queues a deactivation of `bearer_id` for the actor to issue.
    pub(super) fn tear_down_data(&mut self, bearer_id: i32, origin: DeactivateOrigin) {
        let reason = match &origin {
            DeactivateOrigin::Disconnect(request) => DeactivateReason::from_reason(&request.reason),
            DeactivateOrigin::SetupError(_) => DeactivateReason::None,
        };
        self.outbox.push(RadioRequest::Deactivate {
            bearer_id,
            reason,
            origin,
        });
    }
}
