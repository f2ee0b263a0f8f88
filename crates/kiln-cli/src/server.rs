//! Static file server for the distribution directory.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use kiln_config::Config;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::error::{CliError, Result};

/// Serves `<dist>` at `/`. Nothing else is routed; unknown paths get 404.
pub struct DevServer;

/// A server whose socket is bound but not yet accepting.
pub struct BoundServer {
    listener: TcpListener,
    addr: SocketAddr,
    static_path: PathBuf,
}

impl DevServer {
    /// Bind the configured address.
    ///
    /// # Errors
    ///
    /// A bind failure is returned as [`CliError::Server`].
    pub async fn bind(config: &Config) -> Result<BoundServer> {
        let requested = config.server_addr()?;
        let listener = TcpListener::bind(requested)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", requested, e)))?;
        let addr = listener.local_addr()?;
        let static_path = config.dist_dir();

        println!("static path is {}", static_path.display());
        println!("Listening on port {}", addr.port());

        Ok(BoundServer {
            listener,
            addr,
            static_path,
        })
    }

    pub fn router(static_path: &Path) -> Router {
        Router::new().fallback_service(ServeDir::new(static_path))
    }
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn static_path(&self) -> &Path {
        &self.static_path
    }

    /// Accept connections until the process exits.
    pub async fn serve(self) -> Result<()> {
        tracing::info!(addr = %self.addr, path = %self.static_path.display(), "serving distribution directory");
        let app = DevServer::router(&self.static_path);
        axum::serve(self.listener, app)
            .await
            .map_err(|e| CliError::Server(format!("static server stopped: {}", e)))
    }
}
