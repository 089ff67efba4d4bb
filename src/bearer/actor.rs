//! The task that owns a bearer machine and runs its radio commands.
//!
//! 拥有承载状态机并执行其无线电命令的任务。

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::{
    machine::BearerMachine,
    message::{Message, RadioRequest},
};
use crate::radio::{RadioInterface, RadioResult};

/// Drives one [`BearerMachine`] from its mailbox.
///
/// 从邮箱驱动单个 [`BearerMachine`]。
pub(crate) struct BearerActor<R: RadioInterface> {
    machine: BearerMachine,
    radio: Arc<R>,
    mailbox_rx: mpsc::Receiver<Message>,
    /// In-flight commands post through this, so they never keep the mailbox open.
    mailbox_tx: mpsc::WeakSender<Message>,
    radio_connected_rx: Option<mpsc::Receiver<RadioResult<i32>>>,
}

/// Next "radio connected" event, or never if there is no subscription.
async fn next_radio_event(
    rx: &mut Option<mpsc::Receiver<RadioResult<i32>>>,
) -> Option<RadioResult<i32>> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Posts a command completion back to the bearer, unless it has stopped.
async fn post_completion(mailbox: mpsc::WeakSender<Message>, msg: Message) {
    let name = msg.name();
    let Some(tx) = mailbox.upgrade() else {
        trace!(msg = name, "Bearer gone, discarding completion");
        return;
    };
    if tx.send(msg).await.is_err() {
        trace!(msg = name, "Bearer mailbox closed, discarding completion");
    }
}

impl<R: RadioInterface> BearerActor<R> {
    pub(crate) fn new(
        machine: BearerMachine,
        radio: Arc<R>,
        mailbox_rx: mpsc::Receiver<Message>,
        mailbox_tx: mpsc::WeakSender<Message>,
    ) -> Self {
        let radio_connected_rx = Some(radio.subscribe_radio_connected());
        Self {
            machine,
            radio,
            mailbox_rx,
            mailbox_tx,
            radio_connected_rx,
        }
    }

    /// Runs until the machine halts, either on an explicit shutdown or once
    /// every handle is dropped.
    pub(crate) async fn run(mut self) {
        info!(bearer = %self.machine.name(), "Bearer actor started");
        while !self.machine.is_halted() {
            let msg = tokio::select! {
                msg = self.mailbox_rx.recv() => msg.unwrap_or(Message::ChannelClosed),
                event = next_radio_event(&mut self.radio_connected_rx) => match event {
                    Some(result) => Message::RadioConnected(result),
                    None => {
                        debug!(bearer = %self.machine.name(), "Radio connected subscription closed");
                        self.radio_connected_rx = None;
                        continue;
                    }
                },
            };
            self.machine.post(msg);
            self.drive();
        }
        self.mailbox_rx.close();
        info!(bearer = %self.machine.name(), "Bearer actor stopped");
    }

    /// Runs the machine and issues its commands until it has nothing left to do.
    fn drive(&mut self) {
        loop {
            self.machine.run();
            let requests = self.machine.take_radio_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                self.dispatch(request);
            }
        }
    }

    fn dispatch(&mut self, request: RadioRequest) {
        let radio = self.radio.clone();
        let mailbox = self.mailbox_tx.clone();
        match request {
            RadioRequest::Setup { params, request } => {
                debug!(bearer = %self.machine.name(), apn = %params.apn, tag = request.tag, "Issuing setup command");
                tokio::spawn(async move {
                    let result = radio.setup_bearer(params).await;
                    post_completion(mailbox, Message::SetupDone { request, result }).await;
                });
            }
            RadioRequest::FetchLastFailCause { request } => {
                debug!(bearer = %self.machine.name(), tag = request.tag, "Fetching last fail cause");
                tokio::spawn(async move {
                    let result = radio.last_fail_cause().await;
                    post_completion(mailbox, Message::LastFailCauseDone { request, result }).await;
                });
            }
            RadioRequest::Deactivate {
                bearer_id,
                reason,
                origin,
            } => {
                if !self.radio.is_radio_on() {
                    // Nothing to release on a powered-off radio.
                    debug!(bearer = %self.machine.name(), bearer_id, "Radio off, completing deactivation");
                    self.machine.post(Message::DeactivateDone { origin });
                    return;
                }
                debug!(bearer = %self.machine.name(), bearer_id, ?reason, "Issuing deactivate command");
                tokio::spawn(async move {
                    if let Err(e) = radio.deactivate_bearer(bearer_id, reason).await {
                        // The bearer is gone from our point of view either way.
                        debug!(bearer_id, error = %e, "Deactivate command failed");
                    }
                    post_completion(mailbox, Message::DeactivateDone { origin }).await;
                });
            }
        }
    }
}
