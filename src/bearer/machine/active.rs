//! Active: the bearer is up and shared by its attached clients.
//!
//! 活动状态：承载已建立，由已附着的客户端共享。

use tracing::{debug, error, info, warn};

use super::{BearerMachine, Dispatch};
use crate::{
    bearer::{
        message::{DeactivateOrigin, Message},
        request::DisconnectRequest,
        state::{BearerState, EntryNotice},
    },
    fail_cause::FailCause,
};

impl BearerMachine {
    pub(super) fn enter_active(&mut self, notice: EntryNotice) {
        info!(
            bearer = %self.name,
            bearer_id = self.record.bearer_id,
            ref_count = self.record.clients.len(),
            "Bearer active"
        );
        match notice {
            EntryNotice::None => {}
            EntryNotice::ConnectSucceeded(request) => {
                self.notify_connect_completed(request, FailCause::None, None)
            }
            other => warn!(bearer = %self.name, notice = ?other, "Unexpected notice on Active entry"),
        }
    }

    pub(super) fn active_process(&mut self, msg: Message) -> Dispatch {
        match msg {
            Message::Connect(request) => {
                // Joining a live bearer needs no radio round trip.
                if self.record.clients.attach(request.client.clone()) {
                    debug!(
                        bearer = %self.name,
                        client = %request.client,
                        ref_count = self.record.clients.len(),
                        "Client joined active bearer"
                    );
                } else {
                    error!(bearer = %self.name, client = %request.client, "Client already attached");
                }
                self.notify_connect_completed(request, FailCause::None, None);
                Dispatch::Handled
            }
            Message::Disconnect(request) => {
                self.on_client_disconnect(request);
                Dispatch::Handled
            }
            Message::DisconnectAll(mut request) => {
                info!(
                    bearer = %self.name,
                    ref_count = self.record.clients.len(),
                    reason = %request.reason,
                    "Tearing down bearer for all clients"
                );
                request.detached = self.record.clients.clear();
                self.begin_disconnect(request);
                Dispatch::Handled
            }
            other => Dispatch::NotHandled(other),
        }
    }

    fn on_client_disconnect(&mut self, mut request: DisconnectRequest) {
        let attached = request
            .client
            .as_ref()
            .is_some_and(|client| self.record.clients.contains(client));
        if !attached {
            warn!(bearer = %self.name, client = ?request.client, "No such client on this bearer");
            self.notify_disconnect_completed(request, false);
            return;
        }

        if self.record.clients.len() == 1 {
            info!(bearer = %self.name, client = ?request.client, reason = %request.reason, "Last client left, tearing down bearer");
            request.detached = self.record.clients.clear();
            self.begin_disconnect(request);
        } else {
            if let Some(client) = &request.client {
                self.record.clients.detach(client);
            }
            debug!(
                bearer = %self.name,
                client = ?request.client,
                ref_count = self.record.clients.len(),
                "Client detached, bearer stays up"
            );
            self.notify_disconnect_completed(request, false);
        }
    }

    fn begin_disconnect(&mut self, mut request: DisconnectRequest) {
        request.tag = self.record.generation;
        let bearer_id = self.record.bearer_id;
        self.tear_down_data(bearer_id, DeactivateOrigin::Disconnect(request));
        self.transition_to(BearerState::Disconnecting, EntryNotice::None);
    }
}
