//! The control-plane facade of a bearer.
//!
//! 承载的控制面外观。
//!
//! Every operation becomes a mailbox message; nothing here touches the
//! connection record directly. Retry bookkeeping is the exception: it is
//! forwarded to the owner's [`RetryPolicy`] without involving the actor.

use std::{sync::Arc, time::Duration};

use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::{
    actor::BearerActor,
    machine::BearerMachine,
    message::{Message, Query},
    outcome::LinkUpdate,
    request::{
        ClientRef, ConnectRequest, DisconnectRequest, PendingConnect, PendingDisconnect,
        ReconnectIntent, TrackerNotice,
    },
};
use crate::{
    apn::ApnConfig,
    config::Config,
    error::Result,
    fault::{FailureInjector, NoFailureInjection},
    link::{LinkCapabilities, LinkProperties, ProxyProperties},
    radio::{BearerTechnology, RadioInterface, SetupResponse, StandardTechnology},
    retry::{NoRetry, RetryPolicy},
};

/// A cloneable handle to a running bearer.
///
/// 指向运行中承载的可克隆句柄。
///
/// The bearer stops once [`BearerHandle::shutdown`] is called or every
/// handle has been dropped.
#[derive(Clone)]
pub struct BearerHandle {
    id: u32,
    name: Arc<str>,
    mailbox_tx: mpsc::Sender<Message>,
    retry: Arc<dyn RetryPolicy>,
}

impl std::fmt::Debug for BearerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl BearerHandle {
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Log name of the bearer, e.g. `"DC-1"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the bearer actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.mailbox_tx.is_closed()
    }

    async fn send(&self, msg: Message) -> Result<()> {
        self.mailbox_tx.send(msg).await?;
        Ok(())
    }

    async fn query<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Query) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.send(Message::Query(make(tx))).await?;
        Ok(rx.await?)
    }

    /// Asks for the bearer to be brought up for `client`.
    ///
    /// 请求为 `client` 建立承载。
    ///
    /// The returned receiver resolves once the attempt succeeds or fails. If
    /// the bearer is already active the client simply joins it.
    pub async fn bring_up(&self, client: ClientRef, apn: ApnConfig) -> Result<PendingConnect> {
        let (request, rx) = ConnectRequest::new(client, apn);
        self.send(Message::Connect(request)).await?;
        Ok(rx)
    }

    /// Detaches `client`. The bearer itself is torn down only when `client`
    /// is the last one attached.
    ///
    /// 分离 `client`。仅当它是最后一个附着的客户端时才拆除承载。
    pub async fn tear_down(
        &self,
        client: ClientRef,
        reason: impl Into<String>,
    ) -> Result<PendingDisconnect> {
        let (request, rx) = DisconnectRequest::new(Some(client), reason.into());
        self.send(Message::Disconnect(request)).await?;
        Ok(rx)
    }

    /// Detaches every client and tears the bearer down. Clients other than
    /// the caller are reported through the tracker sink.
    ///
    /// 分离所有客户端并拆除承载。
    pub async fn tear_down_all(&self, reason: impl Into<String>) -> Result<PendingDisconnect> {
        let (request, rx) = DisconnectRequest::new(None, reason.into());
        self.send(Message::DisconnectAll(request)).await?;
        Ok(rx)
    }

    pub async fn is_inactive(&self) -> Result<bool> {
        self.query(Query::IsInactive).await
    }

    /// Radio-assigned bearer id, `-1` when no bearer is up.
    pub async fn bearer_id(&self) -> Result<i32> {
        self.query(Query::BearerId).await
    }

    pub async fn apn_config(&self) -> Result<Option<ApnConfig>> {
        self.query(Query::ApnConfig).await
    }

    /// A snapshot of the current link properties.
    pub async fn link_properties(&self) -> Result<LinkProperties> {
        self.query(Query::LinkProperties).await
    }

    pub async fn set_link_http_proxy(&self, proxy: Option<ProxyProperties>) -> Result<()> {
        self.query(|reply| Query::SetHttpProxy { proxy, reply }).await
    }

    /// Re-runs the link merger on a new radio response for the current bearer.
    ///
    /// 对当前承载的新无线电响应重新执行链路合并。
    pub async fn update_link_properties(&self, response: SetupResponse) -> Result<LinkUpdate> {
        self.query(|reply| Query::UpdateLinkProperties { response, reply }).await
    }

    pub async fn capabilities(&self) -> Result<LinkCapabilities> {
        self.query(Query::Capabilities).await
    }

    /// Forces the bearer back to Inactive without any radio command or
    /// notification. In-flight completions become stale.
    pub async fn reset(&self) -> Result<()> {
        self.query(Query::Reset).await
    }

    /// Number of attached clients.
    pub async fn ref_count(&self) -> Result<usize> {
        self.query(Query::RefCount).await
    }

    pub async fn clients(&self) -> Result<Vec<ClientRef>> {
        self.query(Query::Clients).await
    }

    pub async fn set_reconnect_intent(&self, intent: Option<ReconnectIntent>) -> Result<()> {
        self.query(|reply| Query::SetReconnectIntent { intent, reply }).await
    }

    pub async fn reconnect_intent(&self) -> Result<Option<ReconnectIntent>> {
        self.query(Query::ReconnectIntent).await
    }

    /// Stops the bearer. Pending requests are dropped without completion.
    ///
    /// 停止承载。挂起的请求将被丢弃且不会收到完成通知。
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Message::ChannelClosed).await
    }

    // Retry bookkeeping, forwarded to the owner's policy.

    pub fn retry_count(&self) -> u32 {
        self.retry.retry_count()
    }

    pub fn set_retry_count(&self, count: u32) {
        self.retry.set_retry_count(count)
    }

    pub fn retry_timer(&self) -> Duration {
        self.retry.retry_timer()
    }

    pub fn increase_retry_count(&self) {
        self.retry.increase_retry_count()
    }

    pub fn is_retry_needed(&self) -> bool {
        self.retry.is_retry_needed()
    }

    pub fn reset_retry_count(&self) {
        self.retry.reset_retry_count()
    }

    pub fn retry_forever_using_last_timeout(&self) {
        self.retry.retry_forever_using_last_timeout()
    }

    pub fn is_retry_forever(&self) -> bool {
        self.retry.is_retry_forever()
    }

    pub fn configure_retry(
        &self,
        max_retry_count: u32,
        retry_time: Duration,
        randomization: Duration,
    ) -> bool {
        self.retry.configure(max_retry_count, retry_time, randomization)
    }

    pub fn configure_retry_from_str(&self, config: &str) -> bool {
        self.retry.configure_from_str(config)
    }
}

/// Builds and spawns a bearer actor.
///
/// 构建并启动一个承载actor。
pub struct BearerBuilder<R: RadioInterface> {
    id: u32,
    radio: Arc<R>,
    config: Config,
    technology: Arc<dyn BearerTechnology>,
    retry: Arc<dyn RetryPolicy>,
    injector: Arc<dyn FailureInjector>,
    tracker: Option<mpsc::UnboundedSender<TrackerNotice>>,
}

impl<R: RadioInterface> BearerBuilder<R> {
    pub fn new(id: u32, radio: Arc<R>) -> Self {
        Self {
            id,
            radio,
            config: Config::default(),
            technology: Arc::new(StandardTechnology::default()),
            retry: Arc::new(NoRetry),
            injector: Arc::new(NoFailureInjection),
            tracker: None,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn technology(mut self, technology: Arc<dyn BearerTechnology>) -> Self {
        self.technology = technology;
        self
    }

    pub fn retry_policy(mut self, retry: Arc<dyn RetryPolicy>) -> Self {
        self.retry = retry;
        self
    }

    pub fn failure_injector(mut self, injector: Arc<dyn FailureInjector>) -> Self {
        self.injector = injector;
        self
    }

    /// Sink for notifications about clients detached by someone else's request.
    pub fn tracker(mut self, tracker: mpsc::UnboundedSender<TrackerNotice>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Spawns the bearer actor on the current tokio runtime.
    pub fn spawn(self) -> BearerHandle {
        let (mailbox_tx, mailbox_rx) = mpsc::channel(self.config.mailbox_capacity.max(1));
        let machine = BearerMachine::new(
            self.id,
            self.config,
            self.technology,
            self.injector,
            self.tracker,
        );
        let name: Arc<str> = Arc::from(machine.name());
        let actor = BearerActor::new(machine, self.radio, mailbox_rx, mailbox_tx.downgrade());
        tokio::spawn(actor.run());
        info!(bearer = %name, "Bearer spawned");

        BearerHandle {
            id: self.id,
            name,
            mailbox_tx,
            retry: self.retry,
        }
    }
}
