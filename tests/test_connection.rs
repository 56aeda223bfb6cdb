//! Protocol engine tests against real local TCP fixtures.

use std::net::SocketAddr;
use std::time::Duration;

use rawget::config::Config;
use rawget::error::FetchError;
use rawget::http::connection::Connection;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn test_config(port: u16) -> Config {
    Config {
        output_dir: ".".to_string(),
        port,
        recv_timeout_ms: 2000,
        send_timeout_ms: 1000,
    }
}

async fn read_request(sock: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];
    loop {
        let n = sock.read(&mut tmp).await.unwrap();
        if n == 0 {
            return buf;
        }
        buf.extend_from_slice(&tmp[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            return buf;
        }
    }
}

/// Accepts one connection and answers each request with the next canned
/// response, then closes.
async fn serve(responses: Vec<Vec<u8>>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        for resp in responses {
            read_request(&mut sock).await;
            sock.write_all(&resp).await.unwrap();
        }
    });
    addr
}

#[tokio::test]
async fn test_content_length_body_decodes_exactly() {
    let addr = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 11\r\n\r\nhello world".to_vec(),
    ])
    .await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/file.txt", &cfg)
        .await
        .unwrap();
    let body = conn.fetch("http://127.0.0.1/file.txt", true).await.unwrap();
    assert_eq!(&body[..], b"hello world");
}

#[tokio::test]
async fn test_early_close_yields_truncated_body_not_error() {
    let addr = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort".to_vec(),
    ])
    .await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/big.bin", &cfg)
        .await
        .unwrap();
    let body = conn.fetch("http://127.0.0.1/big.bin", true).await.unwrap();
    assert_eq!(&body[..], b"short");
}

#[tokio::test]
async fn test_chunked_body_decodes() {
    let addr = serve(vec![
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n"
            .to_vec(),
    ])
    .await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/chunky", &cfg)
        .await
        .unwrap();
    let body = conn.fetch("http://127.0.0.1/chunky", true).await.unwrap();
    assert_eq!(&body[..], b"hello");
}

#[tokio::test]
async fn test_zero_chunk_ends_body_regardless_of_trailing_data() {
    let addr = serve(vec![
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n0\r\ntrailing junk"
            .to_vec(),
    ])
    .await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/chunky", &cfg)
        .await
        .unwrap();
    let body = conn.fetch("http://127.0.0.1/chunky", true).await.unwrap();
    assert_eq!(&body[..], b"abc");
}

#[tokio::test]
async fn test_peer_close_mid_chunk_is_truncated_body() {
    // chunk declares 10 bytes but only 3 arrive before the close
    let addr = serve(vec![
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\na\r\nabc".to_vec(),
    ])
    .await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/cut", &cfg)
        .await
        .unwrap();
    let err = conn.fetch("http://127.0.0.1/cut", true).await.unwrap_err();
    assert!(matches!(err, FetchError::TruncatedBody));
}

#[tokio::test]
async fn test_not_found_fails_without_body_read() {
    let addr = serve(vec![
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nnot found".to_vec(),
    ])
    .await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/missing", &cfg)
        .await
        .unwrap();
    let err = conn
        .fetch("http://127.0.0.1/missing", true)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound));
}

#[tokio::test]
async fn test_unclassified_status_is_unrecognized() {
    let addr = serve(vec![b"HTTP/1.1 418 I'm a teapot\r\n\r\n".to_vec()]).await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/teapot", &cfg)
        .await
        .unwrap();
    let err = conn
        .fetch("http://127.0.0.1/teapot", true)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::UnrecognizedStatus(418)));
}

#[tokio::test]
async fn test_no_framing_means_no_body() {
    let addr = serve(vec![b"HTTP/1.1 200 OK\r\n\r\n".to_vec()]).await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/empty", &cfg)
        .await
        .unwrap();
    let body = conn.fetch("http://127.0.0.1/empty", true).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_keep_alive_reuses_one_connection() {
    let addr = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\none".to_vec(),
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\ntwo".to_vec(),
    ])
    .await;

    let cfg = test_config(addr.port());
    let mut conn = Connection::connect("http://127.0.0.1/a", &cfg).await.unwrap();
    let first = conn.fetch("http://127.0.0.1/a", false).await.unwrap();
    let second = conn.fetch("http://127.0.0.1/b", true).await.unwrap();
    assert_eq!(&first[..], b"one");
    assert_eq!(&second[..], b"two");
}

#[tokio::test]
async fn test_silent_server_triggers_receive_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        read_request(&mut sock).await;
        // hold the socket open without answering
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let mut cfg = test_config(addr.port());
    cfg.recv_timeout_ms = 200;
    let mut conn = Connection::connect("http://127.0.0.1/slow", &cfg)
        .await
        .unwrap();
    let err = conn.fetch("http://127.0.0.1/slow", true).await.unwrap_err();
    match err {
        FetchError::Receive(e) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
        other => panic!("expected receive timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_domain_is_unresolvable() {
    let cfg = test_config(80);
    let err = Connection::connect("?query-only", &cfg).await.unwrap_err();
    assert!(matches!(err, FetchError::Unresolvable));
}

#[tokio::test]
async fn test_connect_refused_is_distinct_from_dns_failure() {
    // Grab a port that nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let cfg = test_config(port);
    let err = Connection::connect("http://127.0.0.1/x", &cfg)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Connect { .. }));
}
