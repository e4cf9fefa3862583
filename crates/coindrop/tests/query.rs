//! End-to-end tests for the HTTP query endpoint.

use std::time::Duration;

use coindrop::QueryServer;
use coindrop_protocol::{Coin, RoomId};
use coindrop_room::{Bounds, CoinLifecycle, RoomConfig, RoomDirectory};
use coindrop_store::{MemoryStore, RoomStateStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn start_query() -> (String, CoinLifecycle<MemoryStore>) {
    let directory = RoomDirectory::new(vec![RoomConfig {
        id: RoomId::new("room1"),
        coin_count: 3,
        area: Bounds::cube(0, 5),
    }])
    .expect("valid directory");

    let lifecycle = CoinLifecycle::new(
        directory,
        RoomStateStore::new(MemoryStore::new()),
        Duration::from_secs(3600),
    );
    lifecycle.generate_all().await.expect("startup generation");

    let server = QueryServer::bind("127.0.0.1:0", lifecycle.clone())
        .await
        .expect("query server should bind");
    let addr = server.local_addr().expect("local addr").to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, lifecycle)
}

/// Sends a raw HTTP request and returns the full response text.
async fn request(addr: &str, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(raw.as_bytes()).await.expect("write");
    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("read");
    response
}

fn body_of(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}

#[tokio::test]
async fn test_get_coins_returns_json_array() {
    let (addr, lc) = start_query().await;

    let response = request(&addr, "GET /api/rooms/room1/coins HTTP/1.1\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    let coins: Vec<Coin> = serde_json::from_str(body_of(&response)).expect("json body");
    let expected = lc.list_available(&RoomId::new("room1")).await.unwrap();
    assert_eq!(coins, expected);
}

#[tokio::test]
async fn test_unknown_room_returns_empty_array() {
    let (addr, _lc) = start_query().await;

    let response = request(&addr, "GET /api/rooms/nowhere/coins HTTP/1.1\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body_of(&response), "[]");
}

#[tokio::test]
async fn test_collected_coins_disappear_from_the_listing() {
    let (addr, lc) = start_query().await;
    let coins = lc.list_available(&RoomId::new("room1")).await.unwrap();
    lc.collect(&RoomId::new("room1"), &coins[0].id)
        .await
        .unwrap();

    let response = request(&addr, "GET /api/rooms/room1/coins HTTP/1.1\r\n\r\n").await;

    let listed: Vec<Coin> = serde_json::from_str(body_of(&response)).expect("json body");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|c| c.id != coins[0].id));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let (addr, _lc) = start_query().await;
    let response = request(&addr, "GET /api/other HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 404"));
}

#[tokio::test]
async fn test_post_is_rejected() {
    let (addr, _lc) = start_query().await;
    let response = request(&addr, "POST /api/rooms/room1/coins HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 405"));
}
