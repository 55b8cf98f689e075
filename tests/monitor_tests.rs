// tests/monitor_tests.rs
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use status_monitor::monitor::{BasicAuthCredentials, FixedClock, MonitorState};
use status_monitor::registry::BuiltinProvider;
use status_monitor::{
    CheckResult, ConfigurationError, Monitor, OverallStatus, Probe, ProbeError,
    ProbeFailure, ProviderType, RequestContext, StatusReport,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

fn frozen_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()
}

fn monitor() -> Monitor {
    Monitor::default().with_clock(Arc::new(FixedClock(frozen_time())))
}

/// A listener that accepts and drops connections, standing in for a database.
async fn database_up() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    addr
}

async fn nothing_listening() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Minimal RESP server. With `keep_writes = false` every GET returns nil.
async fn redis_up(keep_writes: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve_redis(stream, keep_writes));
        }
    });
    format!("redis://{}", addr)
}

async fn serve_redis(stream: TcpStream, keep_writes: bool) {
    let mut stream = BufReader::new(stream);
    let mut stored: Option<String> = None;

    loop {
        let mut line = String::new();
        if stream.read_line(&mut line).await.unwrap_or(0) == 0 {
            return;
        }
        let count: usize = line.trim_end().trim_start_matches('*').parse().unwrap();
        let mut args = Vec::new();
        for _ in 0..count {
            line.clear();
            stream.read_line(&mut line).await.unwrap();
            let len: usize = line.trim_end().trim_start_matches('$').parse().unwrap();
            let mut buf = vec![0u8; len + 2];
            stream.read_exact(&mut buf).await.unwrap();
            buf.truncate(len);
            args.push(String::from_utf8(buf).unwrap());
        }

        let reply = match args[0].as_str() {
            "SET" => {
                if keep_writes {
                    stored = Some(args[2].clone());
                }
                "+OK\r\n".to_string()
            }
            "GET" => match &stored {
                Some(v) => format!("${}\r\n{}\r\n", v.len(), v),
                None => "$-1\r\n".to_string(),
            },
            "PING" => "+PONG\r\n".to_string(),
            _ => "-ERR unknown command\r\n".to_string(),
        };
        stream.get_mut().write_all(reply.as_bytes()).await.unwrap();
    }
}

fn configure_database_and_redis(monitor: &Monitor, database: SocketAddr, redis: &str) {
    monitor
        .configure(|config| {
            config.set_endpoint("database", database.to_string());
            config.set_endpoint("redis", redis);
            config.use_provider("database")?;
            config.use_provider("redis")?;
            Ok(())
        })
        .unwrap();
}

fn redis_mismatch() -> CheckResult {
    CheckResult::error(
        "redis",
        "different values (now: 1990-01-01 00:00:00, fetched: false)",
    )
}

// configure

#[test]
fn test_configures_a_single_provider() {
    let monitor = monitor();
    assert_eq!(monitor.state(), MonitorState::Unconfigured);

    monitor
        .configure(|config| {
            config.use_provider("redis")?;
            Ok(())
        })
        .unwrap();

    assert_eq!(monitor.state(), MonitorState::Configured);
    assert_eq!(monitor.configuration().providers().keys(), vec!["redis"]);
}

#[test]
fn test_configures_multiple_providers() {
    let monitor = monitor();

    monitor
        .configure(|config| {
            config.use_provider("redis")?;
            config.use_provider("sidekiq")?;
            Ok(())
        })
        .unwrap();

    let providers = monitor.configuration();
    let names: Vec<&str> = providers.providers().iter().map(|p| p.type_name()).collect();
    assert_eq!(names, vec!["Redis", "Sidekiq"]);
}

#[test]
fn test_registering_twice_is_a_no_op() {
    let monitor = monitor();

    monitor
        .configure(|config| {
            config.use_provider("resque")?;
            config.resque();
            Ok(())
        })
        .unwrap();
    monitor
        .configure(|config| {
            config.use_provider("resque")?;
            Ok(())
        })
        .unwrap();

    assert_eq!(monitor.configuration().providers().keys(), vec!["resque"]);
}

#[test]
fn test_unknown_provider_fails_at_configure_time() {
    let monitor = monitor();

    let err = monitor
        .configure(|config| {
            config.use_provider("memcached")?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err, ConfigurationError::UnknownProvider { key: "memcached".into() });
    assert_eq!(monitor.state(), MonitorState::Unconfigured);
}

#[test]
fn test_configures_error_callback_and_credentials() {
    let monitor = monitor();
    let expected = BasicAuthCredentials {
        username: "username".into(),
        password: "password".into(),
    };

    monitor
        .configure(|config| {
            config.set_error_callback(|_| {});
            config.basic_auth_credentials = Some(expected.clone());
            Ok(())
        })
        .unwrap();

    let configuration = monitor.configuration();
    assert!(configuration.error_callback.is_some());
    assert_eq!(configuration.basic_auth_credentials, Some(expected));
}

#[test]
fn test_every_builtin_key_registers_its_type() {
    for builtin in BuiltinProvider::ALL {
        let monitor = monitor();
        let mut returned = None;

        monitor
            .configure(|config| {
                returned = Some(config.use_provider(builtin.key())?);
                Ok(())
            })
            .unwrap();

        let returned = returned.unwrap();
        assert_eq!(returned.builtin_kind(), Some(builtin));
        assert_eq!(monitor.configuration().providers().keys(), vec![builtin.key()]);
    }
}

// check

#[tokio::test]
async fn test_default_providers_check_ok() {
    let report = monitor().check(&RequestContext::new()).await;

    assert_eq!(
        report,
        StatusReport {
            results: vec![],
            status: OverallStatus::Ok,
            timestamp: frozen_time(),
        }
    );
}

#[tokio::test]
async fn test_database_and_redis_succeed() {
    let monitor = monitor();
    configure_database_and_redis(&monitor, database_up().await, &redis_up(true).await);

    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(
        report,
        StatusReport {
            results: vec![CheckResult::ok("database"), CheckResult::ok("redis")],
            status: OverallStatus::Ok,
            timestamp: frozen_time(),
        }
    );
}

#[tokio::test]
async fn test_redis_fails() {
    let monitor = monitor();
    configure_database_and_redis(&monitor, database_up().await, &redis_up(false).await);

    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(report.status, OverallStatus::ServiceUnavailable);
    assert_eq!(report.timestamp, frozen_time());
    assert_eq!(
        report.results,
        vec![CheckResult::ok("database"), redis_mismatch()]
    );
}

#[tokio::test]
async fn test_database_and_redis_fail() {
    let monitor = monitor();
    configure_database_and_redis(&monitor, nothing_listening().await, &redis_up(false).await);

    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(report.status, OverallStatus::ServiceUnavailable);
    assert_eq!(
        report.results,
        vec![CheckResult::error("database", "Exception"), redis_mismatch()]
    );
}

#[tokio::test]
async fn test_error_callback_receives_failure() {
    let monitor = monitor();
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = seen.clone();
    let database = nothing_listening().await;

    monitor
        .configure(|config| {
            config.set_endpoint("database", database.to_string());
            config.database();
            config.set_error_callback(move |failure: &ProbeFailure| {
                assert!(!failure.error.is_expected());
                sink.lock().unwrap().push(failure.provider.clone());
            });
            Ok(())
        })
        .unwrap();

    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(
        report.results,
        vec![CheckResult::error("database", "Exception")]
    );
    assert_eq!(report.status, OverallStatus::ServiceUnavailable);
    assert_eq!(*seen.lock().unwrap(), vec!["database".to_string()]);
}

// custom providers

#[derive(Default)]
struct Flaky;

#[async_trait]
impl Probe for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        Err(anyhow::anyhow!("broken pipe").into())
    }
}

#[derive(Default)]
struct Queue;

#[async_trait]
impl Probe for Queue {
    fn name(&self) -> &str {
        "queue"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        Err(ProbeError::failed("queue depth 5000 exceeds 1000"))
    }
}

#[derive(Default)]
struct Healthy;

#[async_trait]
impl Probe for Healthy {
    fn name(&self) -> &str {
        "healthy"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}

#[test]
fn test_custom_provider_is_accepted_verbatim() {
    let monitor = monitor();
    let custom = ProviderType::of::<Healthy>("healthy");
    let mut returned = None;

    monitor
        .configure(|config| {
            returned = Some(config.add_custom_service(custom.clone())?);
            Ok(())
        })
        .unwrap();

    assert_eq!(returned, Some(custom.clone()));
    assert_eq!(monitor.configuration().providers().get("healthy"), Some(&custom));
}

#[test]
fn test_nonconforming_custom_provider_is_rejected() {
    let monitor = monitor();

    let err = monitor
        .configure(|config| {
            config.add_custom_service(ProviderType::of::<Healthy>("not_healthy"))?;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, ConfigurationError::InvalidProvider { .. }));
    assert!(monitor.configuration().providers().is_empty());
}

#[tokio::test]
async fn test_failures_are_isolated_from_each_other() {
    let monitor = monitor();
    let calls: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = calls.clone();

    monitor
        .configure(|config| {
            config.add_custom_service(ProviderType::of::<Flaky>("flaky"))?;
            config.add_custom_service(ProviderType::of::<Queue>("queue"))?;
            config.add_custom_service(ProviderType::of::<Healthy>("healthy"))?;
            config.set_error_callback(move |failure: &ProbeFailure| {
                sink.lock().unwrap().push(failure.to_string());
            });
            Ok(())
        })
        .unwrap();

    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(
        report.results,
        vec![
            CheckResult::error("flaky", "Exception"),
            CheckResult::error("queue", "queue depth 5000 exceeds 1000"),
            CheckResult::ok("healthy"),
        ]
    );
    assert_eq!(report.status, OverallStatus::ServiceUnavailable);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "flaky probe failed: broken pipe".to_string(),
            "queue probe failed: queue depth 5000 exceeds 1000".to_string(),
        ]
    );
}

struct Pooled;

#[async_trait]
impl Probe for Pooled {
    fn name(&self) -> &str {
        "pooled"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_factory_panic_during_check_is_contained() {
    let monitor = monitor();
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    // The first instance is built during registration; the pool is gone by check time.
    let pooled = ProviderType::custom("pooled", move || {
        if counter.fetch_add(1, Ordering::SeqCst) > 0 {
            panic!("pool exhausted");
        }
        Pooled
    });

    monitor
        .configure(|config| {
            config.add_custom_service(pooled)?;
            config.add_custom_service(ProviderType::of::<Healthy>("healthy"))?;
            Ok(())
        })
        .unwrap();

    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(
        report.results,
        vec![CheckResult::error("pooled", "Exception"), CheckResult::ok("healthy")]
    );
    assert_eq!(report.status, OverallStatus::ServiceUnavailable);
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

struct AlsoHealthy;

#[async_trait]
impl Probe for AlsoHealthy {
    fn name(&self) -> &str {
        "healthy"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}

#[test]
fn test_custom_key_cannot_be_taken_by_another_probe() {
    let monitor = monitor();

    let err = monitor
        .configure(|config| {
            config.add_custom_service(ProviderType::of::<Healthy>("healthy"))?;
            config.add_custom_service(ProviderType::custom("healthy", || AlsoHealthy))?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(
        err,
        ConfigurationError::InvalidProvider {
            name: "healthy".into(),
            reason: "key already registered".into(),
        }
    );
    assert_eq!(monitor.state(), MonitorState::Unconfigured);
}

#[tokio::test]
async fn test_cache_round_trip() {
    let monitor = monitor();
    let cache = redis_up(true).await;

    monitor
        .configure(|config| {
            config.set_endpoint("cache", cache);
            config.cache();
            Ok(())
        })
        .unwrap();

    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(report.results, vec![CheckResult::ok("cache")]);
    assert_eq!(report.status, OverallStatus::Ok);
}

#[tokio::test]
async fn test_reconfigure_applies_to_next_check() {
    let monitor = monitor();
    monitor
        .configure(|config| {
            config.add_custom_service(ProviderType::of::<Healthy>("healthy"))?;
            Ok(())
        })
        .unwrap();
    assert_eq!(monitor.check(&RequestContext::new()).await.status, OverallStatus::Ok);

    monitor
        .configure(|config| {
            config.add_custom_service(ProviderType::of::<Queue>("queue"))?;
            Ok(())
        })
        .unwrap();
    let report = monitor.check(&RequestContext::new()).await;

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.status, OverallStatus::ServiceUnavailable);

    monitor.reset();
    assert!(monitor.check(&RequestContext::new()).await.results.is_empty());
}
