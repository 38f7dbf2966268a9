//! Event channel subscriber.
//!
//! Opens the engine's WebSocket and feeds each text unit into the scene in
//! arrival order. The connection is never retried; the operator recovers by
//! configuring again.

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::state::AppState;

/// Log line when the channel opens.
pub const CONNECTED: &str = "WebSocket connected.";

/// Log line when the channel closes, fails or never opens.
pub const DISCONNECTED: &str = "WebSocket disconnected.";

/// Subscription to the engine's event channel.
pub struct EventStream {
    url: Url,
    state: Arc<AppState>,
}

impl EventStream {
    pub fn new(url: Url, state: Arc<AppState>) -> Self {
        Self { url, state }
    }

    /// Run the subscription in the background.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Read the channel until it closes.
    pub async fn run(self) {
        let mut socket = match connect_async(self.url.as_str()).await {
            Ok((socket, _)) => socket,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "WebSocket connect failed");
                self.log(DISCONNECTED).await;
                return;
            }
        };
        tracing::info!(url = %self.url, "WebSocket connected");
        self.log(CONNECTED).await;

        while let Some(frame) = socket.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    self.state.scene.write().await.apply_frame(&text);
                }
                Ok(Message::Close(frame)) => {
                    tracing::info!(?frame, "WebSocket closed by engine");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "WebSocket error");
                    break;
                }
            }
        }

        self.log(DISCONNECTED).await;
    }

    async fn log(&self, line: &str) {
        self.state.scene.write().await.log.push(line);
    }
}
