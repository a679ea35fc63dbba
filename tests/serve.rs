use axum_server::Handle;
use epochd::{app::App, clock::FixedClock, init::shutdown::trigger_shutdown};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

struct Running {
    addr: SocketAddr,
    handle: Handle,
    server: JoinHandle<Result<(), epochd::err::Error>>,
}

async fn start(app: App) -> Running {
    let handle = Handle::new();
    let server = tokio::spawn(app.serve("127.0.0.1:0", handle.clone()));
    let addr = handle.listening().await.expect("server failed to bind");
    Running {
        addr,
        handle,
        server,
    }
}

fn app(shutdown: CancellationToken) -> App {
    App::new(
        Arc::new(FixedClock(1_800_000_000)),
        shutdown,
        Duration::from_secs(10),
        None,
    )
}

/// Read until the server closes the connection, failing if that takes longer than `limit`.
async fn read_until_closed(stream: &mut TcpStream, limit: Duration) -> Vec<u8> {
    let mut buf = Vec::new();
    let closed = tokio::time::timeout(limit, stream.read_to_end(&mut buf)).await;
    assert!(closed.is_ok(), "connection still open after {limit:?}");
    buf
}

#[tokio::test]
async fn serves_over_tcp_and_shuts_down() {
    let shutdown = CancellationToken::new();
    let running = start(app(shutdown.clone())).await;

    let mut stream = TcpStream::connect(running.addr).await.unwrap();
    stream
        .write_all(b"GET /epoch/1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");
    assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(raw.ends_with(r#"{"now_epoch":1800000000,"future_epoch":1800086400,"days_added":1}"#));

    trigger_shutdown(&running.handle, &shutdown, Duration::from_secs(1));
    let result = tokio::time::timeout(Duration::from_secs(5), running.server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
    assert!(shutdown.is_cancelled());
}

#[tokio::test]
async fn incomplete_request_head_is_dropped() {
    let app = app(CancellationToken::new())
        .with_timeouts(Duration::from_millis(200), Duration::from_secs(60));
    let running = start(app).await;

    let mut stream = TcpStream::connect(running.addr).await.unwrap();
    stream
        .write_all(b"GET /epoch/1 HTTP/1.1\r\nHost: localhost\r\n")
        .await
        .unwrap();

    let raw = read_until_closed(&mut stream, Duration::from_secs(5)).await;
    assert!(!String::from_utf8_lossy(&raw).contains("200 OK"));

    running.handle.shutdown();
}

#[tokio::test]
async fn silent_connection_is_dropped() {
    let app = app(CancellationToken::new())
        .with_timeouts(Duration::from_secs(60), Duration::from_millis(200));
    let running = start(app).await;

    let mut stream = TcpStream::connect(running.addr).await.unwrap();
    let raw = read_until_closed(&mut stream, Duration::from_secs(5)).await;
    assert!(raw.is_empty());

    running.handle.shutdown();
}

#[tokio::test]
async fn keep_alive_connection_closes_once_idle() {
    let app = app(CancellationToken::new())
        .with_timeouts(Duration::from_secs(60), Duration::from_millis(300));
    let running = start(app).await;

    let mut stream = TcpStream::connect(running.addr).await.unwrap();
    stream
        .write_all(b"GET /epoch/1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let raw = read_until_closed(&mut stream, Duration::from_secs(5)).await;
    let raw = String::from_utf8_lossy(&raw);
    assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");

    running.handle.shutdown();
}
