use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use eagl_ledger::{Ledger, LedgerReader};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::NodeConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::shutdown::wait_for_shutdown_signal;

/// An EAGL node: one ledger behind the HTTP API.
pub struct EaglServer {
    config: NodeConfig,
    ledger: Arc<Ledger>,
}

impl EaglServer {
    /// Open the ledger named by `config` and prepare to serve it.
    pub fn new(config: NodeConfig) -> ServerResult<Self> {
        let ledger = Ledger::open(&config.ledger)?;
        Ok(Self::with_ledger(config, Arc::new(ledger)))
    }

    pub fn with_ledger(config: NodeConfig, ledger: Arc<Ledger>) -> Self {
        Self { config, ledger }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.ledger.clone(), &self.config.node_name)
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_with(listener, wait_for_shutdown_signal()).await
    }

    /// Serve on `listener` until `signal` resolves, then drain.
    ///
    /// Once `signal` fires the ledger rejects new appends, the HTTP server
    /// stops accepting connections and finishes in-flight requests, and any
    /// append still holding the chain lock completes before this returns.
    pub async fn serve_with<F>(self, listener: TcpListener, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        info!(
            %addr,
            node = %self.config.node_name,
            location = %self.ledger.location(),
            blocks = self.ledger.len()?,
            "EAGL node listening"
        );

        let closing = self.ledger.clone();
        let signal = async move {
            signal.await;
            closing.close();
        };

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await?;

        let ledger = self.ledger.clone();
        tokio::task::spawn_blocking(move || ledger.shutdown())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))??;
        info!(%addr, "EAGL node stopped");
        Ok(())
    }
}
