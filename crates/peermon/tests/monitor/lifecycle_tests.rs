//! Monitor startup, arming and shutdown

use std::{sync::Arc, time::Duration};

use peermon::{Error, JsonCodec, Metric, MetricCodec, Monitor, MonitorConfig};
use tracing::info_span;

use super::support::{eventually, init_logging, peer_set, ScriptedTransport};

fn fast_config() -> MonitorConfig {
    MonitorConfig::builder().check_interval(Duration::from_millis(50)).build()
}

fn encoded(metric: &Metric) -> Vec<u8> {
    JsonCodec.encode(metric).unwrap()
}

#[tokio::test]
async fn test_shutdown_twice_is_ok() {
    init_logging();
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();
    mon.bind_resolver(peer_set(&["local"])).unwrap();

    assert!(mon.shutdown().await.is_ok());
    assert!(mon.shutdown().await.is_ok());
}

#[tokio::test]
async fn test_shutdown_without_resolver() {
    init_logging();
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), mon.shutdown())
        .await
        .expect("shutdown must not wait for a resolver")
        .unwrap();

    assert!(matches!(mon.bind_resolver(peer_set(&["local"])), Err(Error::ShutDown)));
    assert!(!mon.is_armed());
}

#[tokio::test]
async fn test_resolver_binds_once() {
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();

    mon.bind_resolver(peer_set(&["local"])).unwrap();
    assert!(mon.is_armed());
    assert!(matches!(
        mon.bind_resolver(peer_set(&["local"])),
        Err(Error::ResolverAlreadyBound)
    ));

    mon.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bind_racing_shutdown_reports_shutdown() {
    for _ in 0..50 {
        let (transport, _inbound) = ScriptedTransport::new("local");
        let mon = Arc::new(Monitor::new(transport, fast_config()).await.unwrap());

        let stopper = {
            let mon = mon.clone();
            tokio::spawn(async move { mon.shutdown().await })
        };
        let binder = {
            let mon = mon.clone();
            tokio::spawn(async move { mon.bind_resolver(peer_set(&["local"])) })
        };

        stopper.await.unwrap().unwrap();
        match binder.await.unwrap() {
            Ok(()) | Err(Error::ShutDown) => {}
            Err(e) => panic!("unexpected bind result: {e}"),
        }
    }
}

#[tokio::test]
async fn test_monitor_logs_into_caller_span() {
    init_logging();
    let (transport, inbound) = ScriptedTransport::new("local");
    let span = info_span!("cluster", node = "local");
    let mon = Monitor::with_span(transport, Arc::new(JsonCodec), fast_config(), span.clone())
        .await
        .unwrap();
    assert_eq!(mon.span(), &span);

    mon.bind_resolver(peer_set(&["peer-a"])).unwrap();
    inbound.send(encoded(&Metric::new("ping", "peer-a", "1", Duration::ZERO))).unwrap();

    let alert = tokio::time::timeout(Duration::from_secs(2), mon.alerts().recv())
        .await
        .expect("alert from a monitor built with a caller span");
    assert_eq!(alert.map(|a| a.peer), Some("peer-a".to_string()));

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_is_refused() {
    let (transport, _inbound) = ScriptedTransport::new("local");
    let config = MonitorConfig::builder().alert_capacity(0).build();

    let result = Monitor::new(transport, config).await;
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[tokio::test]
async fn test_no_ingestion_before_resolver_is_bound() {
    init_logging();
    let (transport, inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();

    inbound.send(encoded(&Metric::new("ping", "peer-a", "1", Duration::from_secs(10)))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(mon.metrics().peers().is_empty());

    // queued payloads are picked up once armed
    mon.bind_resolver(peer_set(&["peer-a"])).unwrap();
    let m = &mon;
    let stored = eventually(Duration::from_secs(1), move || async move {
        !m.metrics().peer_metrics("peer-a").is_empty()
    })
    .await;
    assert!(stored);

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_bad_payloads_do_not_stop_ingestion() {
    init_logging();
    let (transport, inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();
    mon.bind_resolver(peer_set(&["peer-a"])).unwrap();

    inbound.send(b"garbage".to_vec()).unwrap();
    inbound.send(br#"{"kind":"ping"}"#.to_vec()).unwrap();
    inbound.send(encoded(&Metric::new("ping", "peer-a", "ok", Duration::from_secs(10)))).unwrap();

    let m = &mon;
    let stored = eventually(Duration::from_secs(1), move || async move {
        m.latest_metrics("ping").await.len() == 1
    })
    .await;
    assert!(stored, "valid metric after malformed ones should be stored");
    assert_eq!(mon.latest_metrics("ping").await[0].value, "ok");

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_nothing_stored_or_alerted_after_shutdown() {
    init_logging();
    let (transport, inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();
    mon.bind_resolver(peer_set(&["peer-a"])).unwrap();
    mon.shutdown().await.unwrap();

    let _ = inbound.send(encoded(&Metric::new("ping", "peer-a", "1", Duration::ZERO)));
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(mon.metrics().peers().is_empty());
    assert!(mon.alerts().try_recv().is_none());
}

#[tokio::test]
async fn test_decoded_invalid_metrics_are_still_stored() {
    let (transport, inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();
    mon.bind_resolver(peer_set(&["peer-a"])).unwrap();

    let mut metric = Metric::new("ping", "peer-a", "1", Duration::ZERO);
    metric.valid = false;
    inbound.send(encoded(&metric)).unwrap();

    let m = &mon;
    let stored = eventually(Duration::from_secs(1), move || async move {
        m.metrics().peer_metrics("peer-a").len() == 1
    })
    .await;
    assert!(stored);

    // stored, but never alerted on
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(mon.alerts().try_recv().is_none());

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_log_metric_stores_directly() {
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();

    mon.log_metric(Metric::new("freespace", "peer-b", "42", Duration::from_secs(10))).unwrap();
    let stored = mon.metrics().peer_metrics("peer-b");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].value, "42");

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dropped_monitor_cancels_its_tasks() {
    let (transport, inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, fast_config()).await.unwrap();
    mon.bind_resolver(peer_set(&["peer-a"])).unwrap();
    drop(mon);

    // the receive loop goes away with the monitor and releases the subscription
    let closed = eventually(Duration::from_secs(1), || {
        let closed = inbound.is_closed();
        async move { closed }
    })
    .await;
    assert!(closed);
}

#[tokio::test]
async fn test_monitor_is_shareable() {
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Arc::new(Monitor::new(transport, fast_config()).await.unwrap());
    mon.bind_resolver(peer_set(&["peer-a"])).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mon = mon.clone();
            tokio::spawn(async move {
                mon.log_metric(Metric::new("ping", format!("peer-{i}"), "1", Duration::from_secs(5)))
                    .unwrap();
                mon.latest_metrics("ping").await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(mon.metrics().peers().len(), 4);
    mon.shutdown().await.unwrap();
}
