//! HTTP side of live reload: an SSE stream and the browser client script.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::header,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};
use tower_http::cors::{Any, CorsLayer};

use super::LiveReload;
use crate::error::{CliError, Result};

const CLIENT_SCRIPT: &str = include_str!("../../assets/livereload.js");

pub(super) fn router(reload: LiveReload) -> Router {
    Router::new()
        .route("/livereload", get(handle_events))
        .route("/livereload.js", get(handle_script))
        // pages are served from another port
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(reload)
}

pub(super) async fn listen(reload: LiveReload, addr: SocketAddr) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::Server(format!("Failed to bind live reload to {}: {}", addr, e)))?;
    let local = listener.local_addr()?;

    let app = router(reload);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "live reload listener stopped");
        }
    });

    tracing::info!(addr = %local, "live reload listening");
    Ok(local)
}

async fn handle_events(
    State(reload): State<LiveReload>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = ReceiverStream::new(reload.subscribe()).map(|json| Ok(Event::default().data(json)));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

async fn handle_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        CLIENT_SCRIPT,
    )
}
