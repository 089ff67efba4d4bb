//! The bearer state machine: mailbox, deferral queue and default state.
//!
//! 承载状态机：邮箱、延迟队列和默认状态。
//!
//! The machine is synchronous. It consumes [`Message`]s in order and records
//! the radio commands it wants issued in an outbox; the actor drains that
//! outbox and feeds completions back into the mailbox. Each concrete state
//! lives in its own submodule and returns [`Dispatch::NotHandled`] for
//! messages that should fall through to the default state.

mod activating;
mod active;
mod disconnecting;
mod inactive;

use std::{collections::VecDeque, sync::Arc, time::SystemTime};

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::{
    message::{Message, Query, RadioRequest},
    outcome::{LinkUpdate, SetupResult},
    record::ConnectionRecord,
    request::{ConnectRequest, Connected, DisconnectRequest, SetupFailure, TrackerNotice},
    state::{BearerState, EntryNotice},
};
use crate::{
    config::Config,
    fail_cause::FailCause,
    fault::FailureInjector,
    link::{SystemDefaults, merge_response},
    radio::{BearerTechnology, SetupResponse},
};

/// Result of offering a message to a concrete state.
pub(crate) enum Dispatch {
    Handled,
    /// The state does not handle the message; the default state gets it back.
    NotHandled(Message),
}

/// The per-bearer state machine.
///
/// 单个承载的状态机。
pub(crate) struct BearerMachine {
    id: u32,
    name: String,
    config: Config,
    state: BearerState,
    record: ConnectionRecord,
    mailbox: VecDeque<Message>,
    deferred: VecDeque<Message>,
    outbox: Vec<RadioRequest>,
    pending_transition: Option<(BearerState, EntryNotice)>,
    technology: Arc<dyn BearerTechnology>,
    injector: Arc<dyn FailureInjector>,
    tracker: Option<mpsc::UnboundedSender<TrackerNotice>>,
    halted: bool,
}

impl BearerMachine {
    /// Creates a machine and enters its initial Inactive state.
    pub(crate) fn new(
        id: u32,
        config: Config,
        technology: Arc<dyn BearerTechnology>,
        injector: Arc<dyn FailureInjector>,
        tracker: Option<mpsc::UnboundedSender<TrackerNotice>>,
    ) -> Self {
        let name = config.bearer_name(id);
        let mut machine = Self {
            id,
            name,
            config,
            state: BearerState::Inactive,
            record: ConnectionRecord::default(),
            mailbox: VecDeque::new(),
            deferred: VecDeque::new(),
            outbox: Vec::new(),
            pending_transition: None,
            technology,
            injector,
            tracker,
            halted: false,
        };
        machine.enter(BearerState::Inactive, EntryNotice::None);
        machine
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> BearerState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn record(&self) -> &ConnectionRecord {
        &self.record
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted
    }

    /// Appends a message to the mailbox.
    pub(crate) fn post(&mut self, msg: Message) {
        if self.halted {
            trace!(bearer = %self.name, msg = msg.name(), "Machine halted, dropping message");
            return;
        }
        self.mailbox.push_back(msg);
    }

    /// Processes the mailbox until it is empty or the machine halts.
    pub(crate) fn run(&mut self) {
        while !self.halted {
            let Some(msg) = self.mailbox.pop_front() else {
                break;
            };
            self.process(msg);
        }
    }

    /// Takes the radio commands issued since the last call.
    pub(crate) fn take_radio_requests(&mut self) -> Vec<RadioRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Stops the machine and releases the record's resources. Queued and
    /// deferred messages are dropped with their completion sinks.
    pub(crate) fn shut_down(&mut self) {
        if self.halted {
            return;
        }
        info!(bearer = %self.name, state = self.state.name(), "Shutting down bearer");
        self.halted = true;
        self.record.release();
        self.mailbox.clear();
        self.deferred.clear();
        self.outbox.clear();
        self.pending_transition = None;
    }

    fn process(&mut self, msg: Message) {
        trace!(
            bearer = %self.name,
            state = self.state.name(),
            msg = msg.name(),
            ref_count = self.record.clients.len(),
            "Processing message"
        );
        let dispatch = match self.state {
            BearerState::Inactive => self.inactive_process(msg),
            BearerState::Activating => self.activating_process(msg),
            BearerState::Active => self.active_process(msg),
            BearerState::Disconnecting => self.disconnecting_process(msg),
            BearerState::DisconnectingSetupError => self.setup_error_process(msg),
        };
        if let Dispatch::NotHandled(msg) = dispatch {
            self.default_process(msg);
        }
        if let Some((target, notice)) = self.pending_transition.take() {
            self.perform_transition(target, notice);
        }
    }

    /// Requests a transition, performed once the current message is handled.
    fn transition_to(&mut self, target: BearerState, notice: EntryNotice) {
        self.pending_transition = Some((target, notice));
    }

    fn defer(&mut self, msg: Message) {
        debug!(
            bearer = %self.name,
            state = self.state.name(),
            msg = msg.name(),
            ref_count = self.record.clients.len(),
            "Deferring message"
        );
        self.deferred.push_back(msg);
    }

    fn perform_transition(&mut self, target: BearerState, notice: EntryNotice) {
        if self.halted {
            return;
        }
        if !self.state.can_transition_to(target) {
            warn!(
                bearer = %self.name,
                from = self.state.name(),
                to = target.name(),
                "Unexpected state transition"
            );
        }
        trace!(bearer = %self.name, from = self.state.name(), to = target.name(), "State transition");
        self.state = target;
        self.enter(target, notice);

        // Deferred messages go back to the front of the mailbox, in arrival order.
        while let Some(msg) = self.deferred.pop_back() {
            self.mailbox.push_front(msg);
        }
    }

    fn enter(&mut self, target: BearerState, notice: EntryNotice) {
        match target {
            BearerState::Inactive => self.enter_inactive(notice),
            BearerState::Active => self.enter_active(notice),
            _ => {
                if !matches!(notice, EntryNotice::None) {
                    warn!(bearer = %self.name, state = target.name(), "Dropping entry notice for state without notifications");
                }
            }
        }
    }

    // --- Shared helpers used by the concrete states ---

    /// Delivers a bring-up completion. `FailCause::None` means success.
    fn notify_connect_completed(
        &mut self,
        request: ConnectRequest,
        cause: FailCause,
        retry_override: Option<std::time::Duration>,
    ) {
        let now = SystemTime::now();
        let result = if cause.is_none() {
            self.record.create_time = Some(now);
            Ok(Connected {
                bearer_id: self.record.bearer_id,
            })
        } else {
            self.record.last_fail_cause = cause;
            self.record.last_fail_time = Some(now);
            Err(SetupFailure {
                cause,
                retry_override,
            })
        };
        if cause.is_event_loggable() {
            warn!(bearer = %self.name, client = %request.client, %cause, "Bring-up failed");
        }
        debug!(bearer = %self.name, client = %request.client, %cause, "Notify connect completed");
        request.complete(result);
    }

    /// Delivers a tear-down completion and, with `send_all`, tells the tracker
    /// about every other client the request detached.
    fn notify_disconnect_completed(&mut self, mut request: DisconnectRequest, send_all: bool) {
        let detached = std::mem::take(&mut request.detached);
        let reason = request.reason.clone();
        let own_client = request.client.clone();
        debug!(bearer = %self.name, client = ?own_client, %reason, "Notify disconnect completed");
        request.complete();

        if !send_all {
            return;
        }
        for client in detached {
            if own_client.as_ref() == Some(&client) {
                continue;
            }
            let Some(tracker) = &self.tracker else {
                break;
            };
            let notice = TrackerNotice::DisconnectDone {
                bearer: self.id,
                client,
                reason: reason.clone(),
            };
            if tracker.send(notice).is_err() {
                debug!(bearer = %self.name, "Tracker gone, dropping disconnect notice");
                break;
            }
        }
    }

    fn system_defaults(&self, interface: &str) -> SystemDefaults {
        let dns = self.technology.system_dns(interface);
        let apn = self.record.apn.clone().unwrap_or_default();
        let acceptable = self.technology.is_dns_acceptable(&dns, &apn);
        SystemDefaults {
            dns: acceptable.then_some(dns),
            gateways: self.technology.system_gateways(interface),
        }
    }

    /// Re-runs the link merger on `response`, replacing the snapshot on success.
    fn update_link_properties(&mut self, response: &SetupResponse) -> LinkUpdate {
        let old = self.record.link_properties.clone();
        if response.status != 0 {
            return LinkUpdate {
                result: SetupResult::RadioError(FailCause::from_code(response.status)),
                old,
                new: Default::default(),
            };
        }

        match merge_response(response, &self.system_defaults(&response.interface)) {
            Ok(merged) => {
                // The proxy is owner-configured and not part of the radio response.
                let new = merged.with_http_proxy(old.http_proxy.clone());
                if new != old {
                    debug!(bearer = %self.name, old = ?old, new = ?new, "Link properties updated");
                }
                self.record.link_properties = new.clone();
                LinkUpdate {
                    result: SetupResult::Success,
                    old,
                    new,
                }
            }
            Err(rejection) => {
                warn!(bearer = %self.name, %rejection, "Rejecting link parameters");
                LinkUpdate {
                    result: SetupResult::UnacceptableParameter,
                    old,
                    new: Default::default(),
                }
            }
        }
    }

    // --- Default state ---

    fn default_process(&mut self, msg: Message) {
        match msg {
            Message::Query(query) => self.answer_query(query),
            Message::Connect(request) => {
                debug!(bearer = %self.name, state = self.state.name(), "Connect not expected here, failing it");
                self.notify_connect_completed(request, FailCause::Unknown, None);
            }
            msg @ (Message::Disconnect(_) | Message::DisconnectAll(_)) => self.defer(msg),
            Message::RadioConnected(result) => {
                self.record.radio_version = match result {
                    Ok(version) => {
                        debug!(bearer = %self.name, version, "Radio connected");
                        version
                    }
                    Err(e) => {
                        warn!(bearer = %self.name, error = %e, "Unexpected error on radio connected");
                        -1
                    }
                };
            }
            Message::ChannelClosed => self.shut_down(),
            other => {
                debug!(
                    bearer = %self.name,
                    state = self.state.name(),
                    msg = other.name(),
                    "Unhandled message, ignoring"
                );
            }
        }
    }

    fn answer_query(&mut self, query: Query) {
        trace!(bearer = %self.name, state = self.state.name(), "Answering query");
        match query {
            Query::IsInactive(reply) => {
                let _ = reply.send(self.state == BearerState::Inactive);
            }
            Query::BearerId(reply) => {
                let _ = reply.send(self.record.bearer_id);
            }
            Query::ApnConfig(reply) => {
                let _ = reply.send(self.record.apn.clone());
            }
            Query::LinkProperties(reply) => {
                let _ = reply.send(self.record.link_properties.clone());
            }
            Query::SetHttpProxy { proxy, reply } => {
                self.record.link_properties = self.record.link_properties.with_http_proxy(proxy);
                let _ = reply.send(());
            }
            Query::UpdateLinkProperties { response, reply } => {
                let update = self.update_link_properties(&response);
                let _ = reply.send(update);
            }
            Query::Capabilities(reply) => {
                let _ = reply.send(self.record.capabilities.clone());
            }
            Query::Reset(reply) => {
                info!(bearer = %self.name, state = self.state.name(), "Reset requested");
                let _ = reply.send(());
                self.transition_to(BearerState::Inactive, EntryNotice::None);
            }
            Query::RefCount(reply) => {
                let _ = reply.send(self.record.clients.len());
            }
            Query::Clients(reply) => {
                let _ = reply.send(self.record.clients.snapshot());
            }
            Query::SetReconnectIntent { intent, reply } => {
                self.record.reconnect_intent = intent;
                let _ = reply.send(());
            }
            Query::ReconnectIntent(reply) => {
                let _ = reply.send(self.record.reconnect_intent.clone());
            }
        }
    }
}
