//! Realtime Connection Management - Gestione della connessione WebSocket del client

use super::LiveChannel;
use crate::core::ClientError;
use crate::dtos::{ClientEvent, ServerEvent};
use crate::entities::Session;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Duration, interval};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::AUTHORIZATION};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Intervallo tra due ping verso il server
pub const PING_INTERVAL_SECS: u64 = 30;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Segnali interni verso il task di scrittura
enum Outbound {
    Event(ClientEvent),
    Close,
}

pub struct RealtimeChannel {
    outbound: UnboundedSender<Outbound>,
    connected: Arc<AtomicBool>,
}

impl RealtimeChannel {
    /// Apre la connessione e autentica il canale con l'identità della sessione.
    ///
    /// Restituisce il canale e il ricevitore degli eventi del server. Il primo
    /// frame inviato è sempre `authenticate`; il server associa il canale a
    /// quell'identità senza altre verifiche.
    #[instrument(skip(url, session), fields(user_id = %session.user_id))]
    pub async fn connect(
        url: &Url,
        session: &Session,
    ) -> Result<(Self, UnboundedReceiver<ServerEvent>), ClientError> {
        let mut request = url.as_str().into_client_request()?;
        if let Some(token) = &session.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ClientError::channel("Invalid token for realtime channel").with_details(e.to_string())
            })?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (ws_stream, _) = connect_async(request).await.map_err(|e| {
            warn!("Realtime connection failed: {}", e);
            ClientError::from(e)
        })?;
        info!("Realtime channel connected");

        let connected = Arc::new(AtomicBool::new(true));
        let (outbound_tx, outbound_rx) = unbounded_channel::<Outbound>();
        let (inbound_tx, inbound_rx) = unbounded_channel::<ServerEvent>();

        // accodato prima di avviare il writer, quindi è il primo frame sul filo
        outbound_tx
            .send(Outbound::Event(ClientEvent::Authenticate {
                user_id: session.user_id.clone(),
                role: session.role,
            }))
            .map_err(|_| ClientError::channel("Realtime channel closed"))?;

        let (ws_tx, ws_rx) = ws_stream.split();
        tokio::spawn(read_ws(ws_rx, inbound_tx, connected.clone()));
        tokio::spawn(write_ws(ws_tx, outbound_rx, connected.clone()));

        Ok((
            Self {
                outbound: outbound_tx,
                connected,
            },
            inbound_rx,
        ))
    }

    /// Chiude il canale; gli eventi già accodati vengono inviati prima della chiusura
    pub fn disconnect(&self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}

impl LiveChannel for RealtimeChannel {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn emit(&self, event: ClientEvent) -> Result<(), ClientError> {
        if !self.is_connected() {
            return Err(ClientError::channel("Realtime channel not connected"));
        }
        self.outbound
            .send(Outbound::Event(event))
            .map_err(|_| ClientError::channel("Realtime channel closed"))
    }
}

#[instrument(skip_all)]
async fn read_ws(
    mut websocket_rx: SplitStream<WsStream>,
    inbound_tx: UnboundedSender<ServerEvent>,
    connected: Arc<AtomicBool>,
) {
    info!("Read task started");

    while let Some(frame) = websocket_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                Ok(event) => {
                    if inbound_tx.send(event).is_err() {
                        info!("Inbound receiver dropped");
                        break;
                    }
                }
                Err(e) => warn!("Dropping unrecognised frame: {}", e),
            },
            Ok(Message::Pong(_)) => debug!("Pong received"),
            Ok(Message::Close(_)) => {
                info!("Close frame received");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error: {:?}", e);
                break;
            }
        }
    }

    connected.store(false, Ordering::SeqCst);
    info!("Read task terminated");
}

#[instrument(skip_all)]
async fn write_ws(
    mut websocket_tx: SplitSink<WsStream, Message>,
    mut outbound_rx: UnboundedReceiver<Outbound>,
    connected: Arc<AtomicBool>,
) {
    info!("Write task started");

    let mut ping_interval = interval(Duration::from_secs(PING_INTERVAL_SECS));
    ping_interval.tick().await; // Consuma il primo tick immediato

    loop {
        tokio::select! {
            signal = outbound_rx.recv() => {
                match signal {
                    Some(Outbound::Event(event)) => {
                        let name = event.name();
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                error!(event = name, "Failed to serialize event: {:?}", e);
                                continue;
                            }
                        };
                        if let Err(e) = websocket_tx.send(Message::Text(json)).await {
                            error!(event = name, "Failed to send event: {:?}", e);
                            break;
                        }
                        debug!(event = name, "Event sent");
                    }
                    Some(Outbound::Close) | None => {
                        info!("Closing realtime channel");
                        let _ = websocket_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            _ = ping_interval.tick() => {
                if let Err(e) = websocket_tx.send(Message::Ping(Vec::new())).await {
                    warn!("Failed to send ping: {:?}", e);
                    break;
                }
                debug!("Ping sent");
            }
        }
    }

    connected.store(false, Ordering::SeqCst);
    info!("Write task terminated");
}
