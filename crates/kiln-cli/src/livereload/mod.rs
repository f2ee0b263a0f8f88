//! Live reload transport.
//!
//! [`LiveReload`] is a cloneable handle to an actor task that owns the set of
//! connected clients. Callers only ever push commands onto the actor's
//! queue, so any number of watch tasks can report changes concurrently
//! without sharing a lock.
//!
//! ```text
//! watch task ─┐
//! watch task ─┼─ Command ─▶ actor ─ json ─▶ client channel ─▶ SSE stream ─▶ browser
//! watch task ─┘
//! ```

mod server;

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::error::Result;

/// Per-client buffer. A client that falls this far behind misses messages.
const CLIENT_BUFFER: usize = 64;

/// Message pushed to every client for each changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadMessage {
    pub command: &'static str,
    pub path: String,
    #[serde(rename = "liveCSS")]
    pub live_css: bool,
}

impl ReloadMessage {
    pub fn reload(path: impl Into<String>) -> Self {
        Self {
            command: "reload",
            path: path.into(),
            live_css: true,
        }
    }
}

enum Command {
    Register(mpsc::Sender<String>),
    Changed(Vec<PathBuf>),
    ClientCount(oneshot::Sender<usize>),
}

/// Handle to the live reload actor.
#[derive(Clone)]
pub struct LiveReload {
    tx: mpsc::UnboundedSender<Command>,
}

impl LiveReload {
    /// Start the actor with no network listener.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_actor(rx));
        Self { tx }
    }

    /// Start the actor and serve `/livereload` and `/livereload.js` on `addr`.
    ///
    /// Returns the handle and the bound address (useful with port 0).
    pub async fn listen(addr: SocketAddr) -> Result<(Self, SocketAddr)> {
        let reload = Self::spawn();
        let local = server::listen(reload.clone(), addr).await?;
        Ok((reload, local))
    }

    /// Report changed paths. Never waits for delivery.
    pub fn changed(&self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        if self.tx.send(Command::Changed(paths)).is_err() {
            tracing::debug!("live reload actor stopped; dropping change");
        }
    }

    /// Register a client. Each message arrives as a JSON string.
    pub fn subscribe(&self) -> mpsc::Receiver<String> {
        let (client_tx, client_rx) = mpsc::channel(CLIENT_BUFFER);
        let _ = self.tx.send(Command::Register(client_tx));
        client_rx
    }

    /// Number of clients whose channel is still open.
    pub async fn client_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::ClientCount(reply)).is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

async fn run_actor(mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut clients: Vec<mpsc::Sender<String>> = Vec::new();

    while let Some(command) = rx.recv().await {
        match command {
            Command::Register(client) => {
                clients.push(client);
                tracing::debug!(clients = clients.len(), "live reload client connected");
            }
            Command::Changed(paths) => {
                for path in paths {
                    let message = ReloadMessage::reload(path.to_string_lossy());
                    let Ok(json) = serde_json::to_string(&message) else {
                        continue;
                    };
                    clients.retain(|client| match client.try_send(json.clone()) {
                        Ok(()) => true,
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            tracing::debug!("live reload client is behind; message dropped");
                            true
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => false,
                    });
                }
            }
            Command::ClientCount(reply) => {
                clients.retain(|client| !client.is_closed());
                let _ = reply.send(clients.len());
            }
        }
    }
}
