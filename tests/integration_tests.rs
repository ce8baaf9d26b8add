//! Integration tests for rustmetrics.
//!
//! These tests run the real server and agent over loopback sockets.

use rustmetrics::agent::Agent;
use rustmetrics::server::MetricsServer;
use rustmetrics::storage::{MemStorage, Storage};
use rustmetrics::util::ShutdownSignal;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Helper to start a metrics server on an ephemeral port.
async fn start_metrics_server() -> (SocketAddr, Arc<MemStorage>, ShutdownSignal) {
    let storage = Arc::new(MemStorage::new());
    let server = MetricsServer::bind("127.0.0.1:0", storage.clone() as Arc<dyn Storage>)
        .await
        .expect("failed to bind");
    let addr = server.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    tokio::spawn(server.run(shutdown.subscribe()));
    (addr, storage, shutdown)
}

/// Helper to send one HTTP/1.1 request and return the status code, the
/// raw header block, and the body.
async fn send(addr: SocketAddr, method: &str, path: &str) -> (u16, String, String) {
    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        method, path, addr
    );
    stream.write_all(request.as_bytes()).await.expect("failed to write");

    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("failed to read");

    let (head, body) = response.split_once("\r\n\r\n").expect("malformed response");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("missing status code");
    (status, head.to_string(), body.to_string())
}

/// Helper to create an HTTP server that records every request path.
fn start_recording_server() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let addr = listener.local_addr().unwrap();
    let paths = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&paths);

    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);
            if let Some(path) = request.split_whitespace().nth(1) {
                recorded.lock().unwrap().push(path.to_string());
            }

            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    });

    (addr, paths)
}

#[tokio::test]
async fn test_gauge_round_trip_over_http() {
    let (addr, _storage, shutdown) = start_metrics_server().await;

    let (status, _, body) = send(addr, "POST", "/update/gauge/Alloc/12345.6").await;
    assert_eq!(status, 200);
    assert_eq!(body, "");

    let (status, _, body) = send(addr, "GET", "/value/gauge/Alloc").await;
    assert_eq!(status, 200);
    assert_eq!(body, "12345.6");

    shutdown.shutdown();
}

#[tokio::test]
async fn test_counter_accumulates_over_http() {
    let (addr, _storage, shutdown) = start_metrics_server().await;

    for _ in 0..2 {
        let (status, _, _) = send(addr, "POST", "/update/counter/PollCount/1").await;
        assert_eq!(status, 200);
    }

    let (status, _, body) = send(addr, "GET", "/value/counter/PollCount").await;
    assert_eq!(status, 200);
    assert_eq!(body, "2");

    shutdown.shutdown();
}

#[tokio::test]
async fn test_error_statuses() {
    let (addr, storage, shutdown) = start_metrics_server().await;

    let (status, _, body) = send(addr, "POST", "/update/unknown/x/1").await;
    assert_eq!(status, 400);
    assert!(body.contains("invalid metric type"));

    let (status, _, _) = send(addr, "POST", "/update/gauge/x/not-a-number").await;
    assert_eq!(status, 400);

    let (status, _, _) = send(addr, "GET", "/update/gauge/x/1").await;
    assert_eq!(status, 405);

    let (status, _, _) = send(addr, "POST", "/update/gauge/x").await;
    assert_eq!(status, 404);

    let (status, _, _) = send(addr, "GET", "/value/gauge/NeverSet").await;
    assert_eq!(status, 404);

    let (status, _, _) = send(addr, "GET", "/value/unknown/x").await;
    assert_eq!(status, 404);

    let (status, _, _) = send(addr, "GET", "/nothing/here").await;
    assert_eq!(status, 404);

    assert!(storage.get_metrics().is_empty());
    shutdown.shutdown();
}

#[tokio::test]
async fn test_listing_page() {
    let (addr, _storage, shutdown) = start_metrics_server().await;

    send(addr, "POST", "/update/gauge/cpu/75.5").await;
    send(addr, "POST", "/update/counter/requests/10").await;

    let (status, head, body) = send(addr, "GET", "/").await;
    assert_eq!(status, 200);
    assert!(head.to_lowercase().contains("content-type: text/html; charset=utf-8"));
    assert!(body.contains("<li>cpu: 75.5</li>"));
    assert!(body.contains("<li>requests: 10</li>"));

    shutdown.shutdown();
}

#[tokio::test]
async fn test_concurrent_counter_updates_over_http() {
    let (addr, storage, shutdown) = start_metrics_server().await;

    let tasks: Vec<_> = (0..50)
        .map(|_| tokio::spawn(async move { send(addr, "POST", "/update/counter/hits/2").await }))
        .collect();
    for task in tasks {
        let (status, _, _) = task.await.unwrap();
        assert_eq!(status, 200);
    }

    assert_eq!(storage.get_counter("hits").unwrap(), 100);
    shutdown.shutdown();
}

#[tokio::test]
async fn test_agent_pushes_to_stub_server() {
    let (addr, paths) = start_recording_server();
    let agent = Agent::new(
        addr.to_string(),
        Duration::from_millis(100),
        Duration::from_millis(200),
    );
    let shutdown = ShutdownSignal::new();

    let handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { agent.run(&shutdown).await })
    };

    tokio::time::sleep(Duration::from_millis(500)).await;
    shutdown.shutdown();
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;

    let paths = paths.lock().unwrap();
    assert!(paths.len() >= 2, "expected at least two pushes, got {}", paths.len());
    assert!(paths.iter().all(|p| p.starts_with("/update/")));

    // One PollCount push per report tick.
    let poll_count_pushes = paths
        .iter()
        .filter(|p| p.starts_with("/update/counter/PollCount/"))
        .count();
    assert!(poll_count_pushes >= 2, "got {} PollCount pushes", poll_count_pushes);
}

#[tokio::test]
async fn test_agent_feeds_metrics_server() {
    let (addr, storage, server_shutdown) = start_metrics_server().await;
    let agent = Agent::new(
        addr.to_string(),
        Duration::from_millis(50),
        Duration::from_millis(100),
    );
    let shutdown = ShutdownSignal::new();

    let handle = {
        let agent = agent.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { agent.run(&shutdown).await })
    };

    tokio::time::sleep(Duration::from_millis(450)).await;
    shutdown.shutdown();
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;

    assert!(storage.get_gauge("RandomValue").is_ok());
    assert!(storage.get_gauge("TotalMemory").is_ok());

    // The server sums every reported PollCount, which is at least the
    // agent's own latest total.
    let server_total = storage.get_counter("PollCount").unwrap();
    assert!(server_total >= 1);

    let (status, _, body) = send(addr, "GET", "/value/gauge/RandomValue").await;
    assert_eq!(status, 200);
    let value: f64 = body.parse().unwrap();
    assert!((0.0..100.0).contains(&value));

    server_shutdown.shutdown();
}

#[test]
fn test_config_file_parsing() {
    use rustmetrics::config::{resolve_agent_config, Overrides};
    use std::io::Write as IoWrite;
    use tempfile::NamedTempFile;

    let config_content = r#"
address: "127.0.0.1:9090"
poll_interval: 5s
report_interval: 15s
log:
  level: debug
"#;

    let mut temp_file = NamedTempFile::new().expect("failed to create temp file");
    temp_file.write_all(config_content.as_bytes()).expect("failed to write config");

    let config = resolve_agent_config(Some(temp_file.path()), &Overrides::default())
        .expect("failed to load config");

    assert_eq!(config.address, "127.0.0.1:9090");
    assert_eq!(config.poll_interval, Duration::from_secs(5));
    assert_eq!(config.report_interval, Duration::from_secs(15));
    assert_eq!(config.log.level, "debug");
}

#[test]
fn test_config_validation_bad_address() {
    use rustmetrics::config::{resolve_agent_config, ConfigError};
    use std::io::Write as IoWrite;
    use tempfile::NamedTempFile;

    let mut temp_file = NamedTempFile::new().expect("failed to create temp file");
    temp_file
        .write_all(b"address: \"localhost:abc\"\n")
        .expect("failed to write config");

    let result = resolve_agent_config(Some(temp_file.path()), &Default::default());
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}
