//! End-to-end bring-up and tear-down of a single bearer over a scripted radio.

pub mod common;

use common::harness::{MockRadio, init_tracing, ok_response, spawn_bearer};
use data_bearer::{
    bearer::{BearerBuilder, Connected, ReconnectIntent},
    fail_cause::FailCause,
    fault::FailureInjector,
    link::ProxyProperties,
    radio::{CommandError, DeactivateReason, SetupParams, SetupResponse},
    retry::RetryPolicy,
    ApnConfig, ClientRef, Error,
};
use std::{
    sync::{
        atomic::{AtomicI32, AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

fn internet() -> ApnConfig {
    ApnConfig::new("internet", &["default", "supl"])
}

#[tokio::test]
async fn test_bring_up_and_tear_down() {
    let (handle, mut radio) = spawn_bearer();
    assert_eq!(handle.name(), "DC-1");
    assert!(handle.is_inactive().await.unwrap());

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (params, respond) = radio.expect_setup().await;
    assert_eq!(params.apn, "internet");
    assert!(!handle.is_inactive().await.unwrap());
    respond.send(Ok(ok_response(5))).unwrap();

    assert_eq!(pending.await.unwrap(), Ok(Connected { bearer_id: 5 }));
    assert_eq!(handle.bearer_id().await.unwrap(), 5);
    assert_eq!(handle.ref_count().await.unwrap(), 1);
    let lp = handle.link_properties().await.unwrap();
    assert_eq!(lp.interface.as_deref(), Some("rmnet0"));
    assert_eq!(lp.dns.len(), 2);
    assert_eq!(lp.routes.len(), 1);
    assert_eq!(
        handle.apn_config().await.unwrap().map(|apn| apn.apn),
        Some("internet".to_string())
    );

    let pending = handle
        .tear_down(ClientRef::new("default"), "dataDisabled")
        .await
        .unwrap();
    let (bearer_id, reason, respond) = radio.expect_deactivate().await;
    assert_eq!(bearer_id, 5);
    assert_eq!(reason, DeactivateReason::None);
    respond.send(Ok(())).unwrap();

    let done = pending.await.unwrap();
    assert_eq!(done.client, Some(ClientRef::new("default")));
    assert_eq!(done.reason, "dataDisabled");
    assert!(handle.is_inactive().await.unwrap());
    assert_eq!(handle.bearer_id().await.unwrap(), -1);
    assert!(handle.link_properties().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_radio_failure_reports_cause_and_retry_hint() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    respond
        .send(Ok(SetupResponse::failure(6, FailCause::InsufficientResources, 1500)))
        .unwrap();

    let failure = pending.await.unwrap().unwrap_err();
    assert_eq!(failure.cause, FailCause::InsufficientResources);
    assert_eq!(failure.retry_override, Some(Duration::from_millis(1500)));
    assert!(handle.is_inactive().await.unwrap());
    assert_eq!(handle.ref_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_legacy_radio_is_asked_for_last_fail_cause() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    let old = SetupResponse::failure(2, FailCause::ErrorUnspecified, -1);
    respond.send(Err(CommandError::Rejected(Box::new(old)))).unwrap();

    let respond = radio.expect_last_fail_cause().await;
    respond.send(Ok(FailCause::UserAuthentication.code())).unwrap();

    let failure = pending.await.unwrap().unwrap_err();
    assert_eq!(failure.cause, FailCause::UserAuthentication);
    assert_eq!(failure.retry_override, None);
}

#[tokio::test]
async fn test_operator_barred_on_old_radio_fails_directly() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    respond
        .send(Ok(SetupResponse::failure(3, FailCause::OperatorBarred, -1)))
        .unwrap();

    let failure = pending.await.unwrap().unwrap_err();
    assert_eq!(failure.cause, FailCause::OperatorBarred);
    radio.expect_idle().await;
    assert!(handle.is_inactive().await.unwrap());
}

#[tokio::test]
async fn test_radio_not_available_fails_without_fetch() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    respond.send(Err(CommandError::RadioNotAvailable)).unwrap();

    assert_eq!(
        pending.await.unwrap().unwrap_err().cause,
        FailCause::RadioNotAvailable
    );
    radio.expect_idle().await;
}

#[tokio::test]
async fn test_unacceptable_link_parameters_release_the_bearer() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    let mut response = ok_response(8);
    response.dns = vec!["dns.example".to_string()];
    respond.send(Ok(response)).unwrap();

    let (bearer_id, reason, respond) = radio.expect_deactivate().await;
    assert_eq!(bearer_id, 8);
    assert_eq!(reason, DeactivateReason::None);
    respond.send(Ok(())).unwrap();

    assert_eq!(
        pending.await.unwrap().unwrap_err().cause,
        FailCause::UnacceptableNetworkParameter
    );
    assert!(handle.is_inactive().await.unwrap());
}

#[tokio::test]
async fn test_radio_off_completes_deactivation_locally() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    respond.send(Ok(ok_response(5))).unwrap();
    pending.await.unwrap().unwrap();

    radio.set_radio_on(false);
    let pending = handle
        .tear_down(ClientRef::new("default"), DeactivateReason::RADIO_TURNED_OFF)
        .await
        .unwrap();

    assert_eq!(pending.await.unwrap().reason, "radioTurnedOff");
    radio.expect_idle().await;
    assert!(handle.is_inactive().await.unwrap());
}

#[tokio::test]
async fn test_deactivate_reason_reaches_radio() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    respond.send(Ok(ok_response(5))).unwrap();
    pending.await.unwrap().unwrap();

    let pending = handle
        .tear_down(ClientRef::new("default"), DeactivateReason::PDP_RESET)
        .await
        .unwrap();
    let (_, reason, respond) = radio.expect_deactivate().await;
    assert_eq!(reason, DeactivateReason::PdpReset);
    // A failing deactivation still completes the tear-down.
    respond.send(Err(CommandError::GenericFailure)).unwrap();
    pending.await.unwrap();
    assert!(handle.is_inactive().await.unwrap());
}

#[tokio::test]
async fn test_reset_makes_in_flight_setup_stale() {
    let (handle, mut radio) = spawn_bearer();

    let stale = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, stale_respond) = radio.expect_setup().await;

    handle.reset().await.unwrap();
    assert!(handle.is_inactive().await.unwrap());

    let fresh = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, fresh_respond) = radio.expect_setup().await;

    stale_respond.send(Ok(ok_response(3))).unwrap();
    // The superseded request is dropped without a completion.
    assert!(stale.await.is_err());
    assert_eq!(handle.bearer_id().await.unwrap(), -1);

    fresh_respond.send(Ok(ok_response(4))).unwrap();
    assert_eq!(fresh.await.unwrap(), Ok(Connected { bearer_id: 4 }));
    assert_eq!(handle.bearer_id().await.unwrap(), 4);
}

#[tokio::test]
async fn test_radio_connected_version_feeds_injector() {
    struct AlwaysBarred {
        seen_version: AtomicI32,
    }

    impl FailureInjector for AlwaysBarred {
        fn intercept(&self, _params: &SetupParams, radio_version: i32) -> Option<SetupResponse> {
            self.seen_version.store(radio_version, Ordering::SeqCst);
            Some(SetupResponse::failure(radio_version, FailCause::OperatorBarred, -1))
        }
    }

    init_tracing();
    let (radio, mut script) = MockRadio::new();
    let injector = Arc::new(AlwaysBarred {
        seen_version: AtomicI32::new(0),
    });
    let handle = BearerBuilder::new(2, radio)
        .failure_injector(injector.clone())
        .spawn();

    // The event arrives on its own channel; give the actor time to record it.
    script.radio_connected(6).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let failure = pending.await.unwrap().unwrap_err();

    assert_eq!(failure.cause, FailCause::OperatorBarred);
    assert_eq!(injector.seen_version.load(Ordering::SeqCst), 6);
    assert!(handle.is_inactive().await.unwrap());
    script.expect_idle().await;
}

#[tokio::test]
async fn test_link_update_and_proxy() {
    let (handle, mut radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    let (_, respond) = radio.expect_setup().await;
    respond.send(Ok(ok_response(5))).unwrap();
    pending.await.unwrap().unwrap();

    let proxy = ProxyProperties {
        host: "10.1.1.1".to_string(),
        port: 3128,
        exclusion_list: vec!["localhost".to_string()],
    };
    handle.set_link_http_proxy(Some(proxy.clone())).await.unwrap();

    let mut response = ok_response(5);
    response.addresses = vec!["10.0.0.9/24".to_string()];
    let update = handle.update_link_properties(response).await.unwrap();
    assert_ne!(update.old.addresses, update.new.addresses);
    assert_eq!(update.new.http_proxy, Some(proxy));
    assert_eq!(handle.link_properties().await.unwrap(), update.new);
}

#[tokio::test]
async fn test_reconnect_intent_and_capabilities() {
    let (handle, _radio) = spawn_bearer();

    assert_eq!(handle.reconnect_intent().await.unwrap(), None);
    let intent = ReconnectIntent {
        action: "reconnect.default".to_string(),
    };
    handle.set_reconnect_intent(Some(intent.clone())).await.unwrap();
    assert_eq!(handle.reconnect_intent().await.unwrap(), Some(intent));
    assert!(handle.capabilities().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_retry_calls_are_forwarded() {
    #[derive(Default)]
    struct CountingRetry {
        count: AtomicU32,
    }

    impl RetryPolicy for CountingRetry {
        fn retry_count(&self) -> u32 {
            self.count.load(Ordering::SeqCst)
        }
        fn set_retry_count(&self, count: u32) {
            self.count.store(count, Ordering::SeqCst);
        }
        fn retry_timer(&self) -> Duration {
            Duration::from_secs(5 * u64::from(self.retry_count()))
        }
        fn increase_retry_count(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
        fn is_retry_needed(&self) -> bool {
            self.retry_count() < 3
        }
        fn reset_retry_count(&self) {
            self.set_retry_count(0);
        }
        fn retry_forever_using_last_timeout(&self) {}
        fn is_retry_forever(&self) -> bool {
            false
        }
        fn configure(&self, _max: u32, _retry_time: Duration, _randomization: Duration) -> bool {
            true
        }
        fn configure_from_str(&self, config: &str) -> bool {
            config.starts_with("max_retries=")
        }
    }

    init_tracing();
    let (radio, _script) = MockRadio::new();
    let handle = BearerBuilder::new(3, radio)
        .retry_policy(Arc::new(CountingRetry::default()))
        .spawn();

    handle.increase_retry_count();
    handle.increase_retry_count();
    assert_eq!(handle.retry_count(), 2);
    assert_eq!(handle.retry_timer(), Duration::from_secs(10));
    assert!(handle.is_retry_needed());
    handle.set_retry_count(3);
    assert!(!handle.is_retry_needed());
    handle.reset_retry_count();
    assert_eq!(handle.retry_count(), 0);
    assert!(handle.configure_retry_from_str("max_retries=3"));
    assert!(!handle.configure_retry_from_str("bogus"));
    assert!(handle.configure_retry(3, Duration::from_secs(1), Duration::ZERO));
}

#[tokio::test]
async fn test_shutdown_stops_the_actor() {
    let (handle, radio) = spawn_bearer();

    let pending = handle.bring_up(ClientRef::new("default"), internet()).await.unwrap();
    handle.shutdown().await.unwrap();

    for _ in 0..100 {
        if handle.is_closed() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(handle.is_closed());
    assert!(radio.subscription_closed());
    assert!(matches!(handle.is_inactive().await, Err(Error::ChannelClosed)));
    assert!(matches!(
        handle.bring_up(ClientRef::new("supl"), internet()).await,
        Err(Error::ChannelClosed)
    ));

    // The setup was issued before shutdown; its request never completes.
    drop(radio);
    assert!(pending.await.is_err());
}

#[tokio::test]
async fn test_dropping_every_handle_stops_the_actor() {
    let (handle, radio) = spawn_bearer();
    let clone = handle.clone();
    drop(handle);
    assert!(clone.is_inactive().await.unwrap());
    drop(clone);

    for _ in 0..100 {
        if radio.subscription_closed() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(radio.subscription_closed());
}
