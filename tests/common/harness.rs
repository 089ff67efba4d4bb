//! tests/common/harness.rs
use async_trait::async_trait;
use data_bearer::{
    bearer::{BearerBuilder, BearerHandle, TrackerNotice},
    radio::{
        CommandError, DeactivateReason, RadioInterface, RadioResult, SetupParams, SetupResponse,
    },
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, Once,
};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "data_bearer=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// How long to wait for a radio command before failing the test.
const CALL_TIMEOUT: Duration = Duration::from_secs(2);

/// A command received by the mock radio, waiting for the test to answer it.
#[derive(Debug)]
pub enum RadioCall {
    Setup {
        params: SetupParams,
        respond: oneshot::Sender<RadioResult<SetupResponse>>,
    },
    Deactivate {
        bearer_id: i32,
        reason: DeactivateReason,
        respond: oneshot::Sender<RadioResult<()>>,
    },
    LastFailCause {
        respond: oneshot::Sender<RadioResult<i32>>,
    },
}

/// A radio whose every command is answered by the test through [`RadioScript`].
pub struct MockRadio {
    calls_tx: mpsc::UnboundedSender<RadioCall>,
    connected_tx: Mutex<Option<mpsc::Sender<RadioResult<i32>>>>,
    radio_on: AtomicBool,
}

impl MockRadio {
    pub fn new() -> (Arc<Self>, RadioScript) {
        let (calls_tx, calls_rx) = mpsc::unbounded_channel();
        let radio = Arc::new(Self {
            calls_tx,
            connected_tx: Mutex::new(None),
            radio_on: AtomicBool::new(true),
        });
        let script = RadioScript {
            radio: radio.clone(),
            calls_rx,
        };
        (radio, script)
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<RadioResult<T>>) -> RadioCall,
    ) -> RadioResult<T> {
        let (tx, rx) = oneshot::channel();
        if self.calls_tx.send(make(tx)).is_err() {
            return Err(CommandError::RadioNotAvailable);
        }
        rx.await.unwrap_or_else(|_| Err(CommandError::Other("responder dropped".to_string())))
    }
}

#[async_trait]
impl RadioInterface for MockRadio {
    async fn setup_bearer(&self, params: SetupParams) -> RadioResult<SetupResponse> {
        self.call(|respond| RadioCall::Setup { params, respond }).await
    }

    async fn deactivate_bearer(&self, bearer_id: i32, reason: DeactivateReason) -> RadioResult<()> {
        self.call(|respond| RadioCall::Deactivate {
            bearer_id,
            reason,
            respond,
        })
        .await
    }

    async fn last_fail_cause(&self) -> RadioResult<i32> {
        self.call(|respond| RadioCall::LastFailCause { respond }).await
    }

    fn subscribe_radio_connected(&self) -> mpsc::Receiver<RadioResult<i32>> {
        let (tx, rx) = mpsc::channel(8);
        *self.connected_tx.lock().unwrap() = Some(tx);
        rx
    }

    fn is_radio_on(&self) -> bool {
        self.radio_on.load(Ordering::SeqCst)
    }
}

/// The test side of a [`MockRadio`].
pub struct RadioScript {
    radio: Arc<MockRadio>,
    calls_rx: mpsc::UnboundedReceiver<RadioCall>,
}

impl RadioScript {
    pub async fn next_call(&mut self) -> RadioCall {
        tokio::time::timeout(CALL_TIMEOUT, self.calls_rx.recv())
            .await
            .expect("timed out waiting for a radio command")
            .expect("mock radio dropped")
    }

    pub async fn expect_setup(
        &mut self,
    ) -> (SetupParams, oneshot::Sender<RadioResult<SetupResponse>>) {
        match self.next_call().await {
            RadioCall::Setup { params, respond } => (params, respond),
            other => panic!("expected a setup command, got {other:?}"),
        }
    }

    pub async fn expect_deactivate(
        &mut self,
    ) -> (i32, DeactivateReason, oneshot::Sender<RadioResult<()>>) {
        match self.next_call().await {
            RadioCall::Deactivate {
                bearer_id,
                reason,
                respond,
            } => (bearer_id, reason, respond),
            other => panic!("expected a deactivate command, got {other:?}"),
        }
    }

    pub async fn expect_last_fail_cause(&mut self) -> oneshot::Sender<RadioResult<i32>> {
        match self.next_call().await {
            RadioCall::LastFailCause { respond } => respond,
            other => panic!("expected a last-fail-cause fetch, got {other:?}"),
        }
    }

    /// Asserts that no radio command arrives within a short grace period.
    pub async fn expect_idle(&mut self) {
        let call = tokio::time::timeout(Duration::from_millis(50), self.calls_rx.recv()).await;
        assert!(call.is_err(), "unexpected radio command: {call:?}");
    }

    pub async fn radio_connected(&self, version: i32) {
        let tx = self.radio.connected_tx.lock().unwrap().clone();
        tx.expect("no radio-connected subscriber")
            .send(Ok(version))
            .await
            .expect("bearer stopped listening");
    }

    /// Whether the bearer dropped its radio-connected subscription.
    pub fn subscription_closed(&self) -> bool {
        self.radio
            .connected_tx
            .lock()
            .unwrap()
            .as_ref()
            .is_none_or(|tx| tx.is_closed())
    }

    pub fn set_radio_on(&self, on: bool) {
        self.radio.radio_on.store(on, Ordering::SeqCst);
    }
}

/// A response describing a healthy bearer on `rmnet0`.
pub fn ok_response(bearer_id: i32) -> SetupResponse {
    SetupResponse {
        version: 6,
        status: 0,
        bearer_id,
        active: 2,
        pdp_type: "IP".to_string(),
        interface: "rmnet0".to_string(),
        addresses: vec!["10.0.0.2/24".to_string()],
        dns: vec!["8.8.8.8".to_string(), "8.8.4.4".to_string()],
        gateways: vec!["10.0.0.1".to_string()],
        suggested_retry_time: -1,
    }
}

/// Spawns bearer 1 on a fresh mock radio.
pub fn spawn_bearer() -> (BearerHandle, RadioScript) {
    init_tracing();
    let (radio, script) = MockRadio::new();
    (BearerBuilder::new(1, radio).spawn(), script)
}

/// Spawns bearer 1 with a tracker sink attached.
pub fn spawn_tracked_bearer()
-> (BearerHandle, RadioScript, mpsc::UnboundedReceiver<TrackerNotice>) {
    init_tracing();
    let (radio, script) = MockRadio::new();
    let (tracker_tx, tracker_rx) = mpsc::unbounded_channel();
    let handle = BearerBuilder::new(1, radio).tracker(tracker_tx).spawn();
    (handle, script, tracker_rx)
}
