//! WebSocket realtime gateway.
//!
//! Accepts client connections, routes their events into the coin
//! lifecycle, and broadcasts state changes to room members. Each
//! connection gets two tasks: a reader loop (this module's
//! `handle_connection`) and a writer task fed by an unbounded channel,
//! so a slow reader never blocks a broadcast.

use std::net::SocketAddr;
use std::sync::Arc;

use coindrop_protocol::{ClientEvent, Codec, JsonCodec, ServerEvent};
use coindrop_room::CoinLifecycle;
use coindrop_store::KeyValueStore;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::registry::{ConnId, EventSender, RoomRegistry};
use crate::ServerError;

/// Shared gateway state, cloned into each connection task via `Arc`.
struct GatewayState<S: KeyValueStore> {
    lifecycle: CoinLifecycle<S>,
    registry: RoomRegistry,
    codec: JsonCodec,
}

/// The realtime gateway: one WebSocket listener, one task per client.
pub struct Gateway<S: KeyValueStore> {
    listener: TcpListener,
    state: Arc<GatewayState<S>>,
}

impl<S: KeyValueStore> Gateway<S> {
    /// Binds the gateway to the given address.
    pub async fn bind(addr: &str, lifecycle: CoinLifecycle<S>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr, "gateway listening");
        Ok(Self {
            listener,
            state: Arc::new(GatewayState {
                lifecycle,
                registry: RoomRegistry::new(),
                codec: JsonCodec,
            }),
        })
    }

    /// Returns the local address the gateway is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process terminates.
    ///
    /// Each accepted connection is handled in its own task; a failed
    /// connection never takes the gateway down.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Handles a single client from accept to close.
async fn handle_connection<S: KeyValueStore>(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<GatewayState<S>>,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let conn_id = ConnId::next();
    tracing::info!(%conn_id, %peer, "client connected");

    let (mut sink, mut ws_stream) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Writer task: drains the event channel into the socket.
    let codec = state.codec;
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode outbound event");
                    continue;
                }
            };
            if sink.send(Message::Binary(bytes.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Reader loop: decode frames and dispatch.
    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Binary(data)) => {
                dispatch(&state, conn_id, &tx, &data).await;
            }
            Ok(Message::Text(text)) => {
                dispatch(&state, conn_id, &tx, text.as_bytes()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/frame
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        }
    }

    // Deregister first so broadcasts stop targeting this connection,
    // then let the writer drain and exit.
    state.registry.leave_all(conn_id);
    drop(tx);
    let _ = writer.await;

    tracing::info!(%conn_id, "client disconnected");
    Ok(())
}

/// Decodes one inbound frame and routes it.
///
/// All failures, malformed frames included, are answered with an
/// `error` event to the sender; the connection stays open and no state
/// changes on any error path.
async fn dispatch<S: KeyValueStore>(
    state: &GatewayState<S>,
    conn_id: ConnId,
    tx: &EventSender,
    data: &[u8],
) {
    let event: ClientEvent = match state.codec.decode(data) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(%conn_id, error = %e, "failed to decode client event");
            send_error(tx, &e.to_string());
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom { room_id } => {
            state.registry.join(&room_id, conn_id, tx.clone());
            tracing::info!(%conn_id, room_id = %room_id, "client joined room");
            let _ = tx.send(ServerEvent::RoomJoined { room_id });
        }

        ClientEvent::GetCoins { room_id } => {
            match state.lifecycle.list_available(&room_id).await {
                Ok(coins) => {
                    let _ = tx.send(ServerEvent::Coins { coins });
                }
                Err(e) => send_error(tx, &e.to_string()),
            }
        }

        ClientEvent::CoinCollected { room_id, coin_id } => {
            match state.lifecycle.collect(&room_id, &coin_id).await {
                Ok(()) => {
                    tracing::info!(
                        %conn_id,
                        room_id = %room_id,
                        coin_id = %coin_id,
                        "coin collected"
                    );
                    // The collector gets no ack; only the rest of the
                    // room learns the coin is gone.
                    state.registry.broadcast_except(
                        &room_id,
                        conn_id,
                        &ServerEvent::CoinCollected { coin_id },
                    );
                }
                Err(e) => send_error(tx, &e.to_string()),
            }
        }
    }
}

fn send_error(tx: &EventSender, message: &str) {
    let _ = tx.send(ServerEvent::Error {
        message: message.to_string(),
    });
}
