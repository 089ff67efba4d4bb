//! Inactive: no bearer exists; waits for a bring-up.
//!
//! 非活动状态：不存在承载，等待建立请求。

use tracing::{debug, info, warn};

use super::{BearerMachine, Dispatch};
use crate::{
    bearer::{
        message::{Message, Query, RadioRequest},
        request::ConnectRequest,
        state::{BearerState, EntryNotice},
    },
    fail_cause::FailCause,
};

impl BearerMachine {
    pub(super) fn enter_inactive(&mut self, notice: EntryNotice) {
        self.record.generation = self.record.generation.wrapping_add(1);

        // Notifications are delivered only now, so that an observer reacting to
        // them already sees the machine as inactive.
        match notice {
            EntryNotice::None => {}
            EntryNotice::ConnectFailed {
                request,
                cause,
                retry_override,
            } => {
                self.record.retry_override = retry_override;
                self.notify_connect_completed(request, cause, retry_override);
            }
            EntryNotice::Disconnected(request) => self.notify_disconnect_completed(request, true),
            EntryNotice::ConnectSucceeded(request) => {
                warn!(bearer = %self.name, client = %request.client, "Success notice on Inactive entry");
                self.notify_connect_completed(request, FailCause::Unknown, None);
            }
        }

        info!(bearer = %self.name, generation = self.record.generation, "Bearer inactive");
        self.record.clear_settings();
    }

    pub(super) fn inactive_process(&mut self, msg: Message) -> Dispatch {
        match msg {
            Message::Query(Query::Reset(reply)) => {
                debug!(bearer = %self.name, "Reset while inactive, already reset");
                let _ = reply.send(());
                Dispatch::Handled
            }
            Message::Connect(mut request) => {
                self.record.clients.attach(request.client.clone());
                request.tag = self.record.generation;
                info!(
                    bearer = %self.name,
                    client = %request.client,
                    apn = %request.apn.apn,
                    tag = request.tag,
                    ref_count = self.record.clients.len(),
                    "Bringing up bearer"
                );
                self.do_on_connect(request);
                self.transition_to(BearerState::Activating, EntryNotice::None);
                Dispatch::Handled
            }
            Message::Disconnect(request) | Message::DisconnectAll(request) => {
                debug!(bearer = %self.name, client = ?request.client, "Tear-down while inactive");
                self.notify_disconnect_completed(request, false);
                Dispatch::Handled
            }
            other => Dispatch::NotHandled(other),
        }
    }

    /// Issues the setup command, unless the failure injector fabricates a
    /// failed response, which is then posted to our own mailbox.
    fn do_on_connect(&mut self, request: ConnectRequest) {
        self.record.apn = Some(request.apn.clone());
        let params = self.technology.setup_params(&request.apn);

        if let Some(response) = self.injector.intercept(&params, self.record.radio_version) {
            debug!(
                bearer = %self.name,
                status = response.status,
                suggested_retry_time = response.suggested_retry_time,
                "Sending injected setup failure"
            );
            self.mailbox.push_back(Message::SetupDone {
                request,
                result: Ok(response),
            });
            return;
        }

        self.outbox.push(RadioRequest::Setup { params, request });
    }
}
