//! HTTP server for qbit-server
//!
//! One accept loop hands every connection to its own tokio task. Shutdown
//! stops accepting immediately; in-flight connection tasks are not drained.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::{Error, Result};
use axum::Router;
use routes::create_router;
use state::AppState;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

/// Pending connections allowed in the kernel accept queue
const LISTEN_BACKLOG: u32 = 1024;

/// A bound listener plus the router it will serve
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Bind `addr` with `SO_REUSEADDR` so a restarted server can take the port
    /// straight back
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(addr: SocketAddr, state: Arc<AppState>) -> Result<Self> {
        let startup = |e: std::io::Error| Error::Startup(format!("Failed to bind to {}: {}", addr, e));

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(startup)?;

        socket.set_reuseaddr(true).map_err(startup)?;
        socket.bind(addr).map_err(startup)?;
        let listener = socket.listen(LISTEN_BACKLOG).map_err(startup)?;

        Ok(Self {
            listener,
            router: create_router(state),
        })
    }

    /// Address actually bound (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        tokio::select! {
            result = axum::serve(self.listener, app).into_future() => {
                result?;
            }
            _ = shutdown => {
                info!("Stopped accepting connections");
            }
        }

        Ok(())
    }
}

/// Start the HTTP server and run until SIGINT/SIGTERM
///
/// # Arguments
/// * `config` - Server configuration, read once here
pub async fn run(config: Config) -> Result<()> {
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| Error::Startup(format!("Invalid server address: {}", e)))?;

    let state = Arc::new(AppState::from_config(&config)?);
    let server = Server::bind(addr, Arc::clone(&state))?;

    info!(
        "Listening on {} (oracle: {}, audit log: {})",
        server.local_addr()?,
        state.oracle_name(),
        state.audit().path().display()
    );

    server.run_until(shutdown_signal()).await
}

/// Wait for Ctrl+C or SIGTERM
///
/// If a handler cannot be installed that branch never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
