//! Push channel transport seam.
//!
//! The connection manager talks to the push channel through the
//! [`PushTransport`] trait so tests can substitute an in-memory fake for
//! the production WebSocket implementation.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use tickethub_core::error::{AppError, ErrorKind};
use tickethub_core::result::AppResult;

use crate::session::Credential;

use super::protocol::{ClientFrame, ServerFrame};

/// Factory for authenticated push channel sessions.
#[async_trait]
pub trait PushTransport: Send + Sync + 'static {
    /// Establish one authenticated session.
    async fn connect(&self, credential: &Credential) -> AppResult<Box<dyn PushSession>>;
}

/// One established push channel session.
#[async_trait]
pub trait PushSession: Send {
    /// Receive the next frame. `Ok(None)` means the server closed the
    /// session cleanly.
    async fn next_frame(&mut self) -> AppResult<Option<ServerFrame>>;

    /// Send a frame to the server.
    async fn send(&mut self, frame: ClientFrame) -> AppResult<()>;
}

/// Production WebSocket transport.
#[derive(Debug, Clone)]
pub struct WsTransport {
    /// Push channel endpoint URL.
    push_url: String,
}

impl WsTransport {
    /// Create a transport targeting the given push endpoint.
    pub fn new(push_url: impl Into<String>) -> Self {
        Self {
            push_url: push_url.into(),
        }
    }
}

#[async_trait]
impl PushTransport for WsTransport {
    async fn connect(&self, credential: &Credential) -> AppResult<Box<dyn PushSession>> {
        let mut request = self
            .push_url
            .as_str()
            .into_client_request()
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "Invalid push URL", e))?;

        let bearer = HeaderValue::from_str(&format!("Bearer {}", credential.token()))
            .map_err(|_| AppError::authentication("Credential is not header-safe"))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (stream, _) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transport, "Push channel handshake failed", e)
            })?;

        Ok(Box::new(WsSession { stream }))
    }
}

/// A live WebSocket session.
struct WsSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl PushSession for WsSession {
    async fn next_frame(&mut self) -> AppResult<Option<ServerFrame>> {
        loop {
            let Some(message) = self.stream.next().await else {
                return Ok(None);
            };

            match message {
                Ok(Message::Text(text)) => match serde_json::from_str(text.as_str()) {
                    Ok(frame) => return Ok(Some(frame)),
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping unparseable push frame");
                    }
                },
                Ok(Message::Close(_)) => return Ok(None),
                // Protocol-level ping/pong is answered by the WebSocket
                // library; binary frames are not part of the contract.
                Ok(_) => {}
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Transport,
                        "Push channel stream error",
                        e,
                    ));
                }
            }
        }
    }

    async fn send(&mut self, frame: ClientFrame) -> AppResult<()> {
        let text = serde_json::to_string(&frame)?;
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "Push channel send failed", e))
    }
}
