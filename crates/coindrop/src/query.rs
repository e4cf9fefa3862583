//! Read-only HTTP query endpoint.
//!
//! Serves `GET /api/rooms/{roomId}/coins` as a JSON coin array. A
//! minimal HTTP/1.1 responder: one route, one request per connection.

use std::net::SocketAddr;

use coindrop_protocol::RoomId;
use coindrop_room::CoinLifecycle;
use coindrop_store::KeyValueStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::ServerError;

/// Upper bound on request head size; anything longer is rejected.
const MAX_REQUEST_BYTES: usize = 4096;

/// The HTTP query server.
pub struct QueryServer<S: KeyValueStore> {
    listener: TcpListener,
    lifecycle: CoinLifecycle<S>,
}

impl<S: KeyValueStore> QueryServer<S> {
    /// Binds the query endpoint to the given address.
    pub async fn bind(addr: &str, lifecycle: CoinLifecycle<S>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr, "query endpoint listening");
        Ok(Self {
            listener,
            lifecycle,
        })
    }

    /// Returns the local address the endpoint is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process terminates.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _peer)) => {
                    let lifecycle = self.lifecycle.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_request(stream, lifecycle).await {
                            tracing::debug!(error = %e, "query request failed");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "query accept failed");
                }
            }
        }
    }
}

/// Reads one request, writes one response, closes.
async fn handle_request<S: KeyValueStore>(
    mut stream: TcpStream,
    lifecycle: CoinLifecycle<S>,
) -> Result<(), ServerError> {
    let mut buf = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];

    // Read until the end of the request head.
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(()); // peer went away
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if buf.len() > MAX_REQUEST_BYTES {
            return respond(&mut stream, 400, r#"{"error":"request too large"}"#).await;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("");
    let path = request_line.next().unwrap_or("");

    if method != "GET" {
        return respond(&mut stream, 405, r#"{"error":"method not allowed"}"#).await;
    }

    let Some(room_id) = parse_coins_path(path) else {
        return respond(&mut stream, 404, r#"{"error":"not found"}"#).await;
    };

    match lifecycle.list_available(&room_id).await {
        Ok(coins) => match serde_json::to_string(&coins) {
            Ok(body) => respond(&mut stream, 200, &body).await,
            Err(e) => respond(&mut stream, 500, &error_body(&e.to_string())).await,
        },
        Err(e) => respond(&mut stream, 500, &error_body(&e.to_string())).await,
    }
}

/// Extracts the room id from `/api/rooms/{roomId}/coins`.
fn parse_coins_path(path: &str) -> Option<RoomId> {
    let room = path.strip_prefix("/api/rooms/")?.strip_suffix("/coins")?;
    if room.is_empty() || room.contains('/') {
        return None;
    }
    Some(RoomId::new(room))
}

fn error_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

async fn respond(stream: &mut TcpStream, status: u16, body: &str) -> Result<(), ServerError> {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
