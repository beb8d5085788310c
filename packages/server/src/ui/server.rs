//! Accept loop and session lifecycle management.

use std::{future::Future, io, net::SocketAddr, sync::Arc, time::Duration};

use tokio::{
    net::TcpListener,
    sync::watch,
    task::{JoinError, JoinSet},
};

use crate::{
    config::ServerConfig,
    domain::PeerRegistry,
    error::ServerError,
    infrastructure::registry::InMemoryPeerRegistry,
    ui::{handler::handle_connection, signal::shutdown_signal, state::AppState},
};

/// Pause before accepting again after a listener-level error such as `EMFILE`
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Chat relay server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket described by `config`.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.addr,
                source,
            })?;
        Ok(Self::new(listener, Arc::new(InMemoryPeerRegistry::new())))
    }

    /// Build a server from an already bound listener and a registry.
    pub fn new(listener: TcpListener, registry: Arc<dyn PeerRegistry>) -> Self {
        Self {
            listener,
            state: Arc::new(AppState::new(registry)),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The registry sessions register into.
    pub fn registry(&self) -> Arc<dyn PeerRegistry> {
        self.state.registry.clone()
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves.
    ///
    /// On shutdown the listener is closed first, then every session is told to
    /// stop and this waits for all of them to finish their cleanup.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let Server { listener, state } = self;
        let addr = listener.local_addr()?;
        tracing::info!("listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut sessions = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        tracing::debug!(%peer_addr, "Accepted connection");
                        sessions.spawn(handle_connection(
                            stream,
                            peer_addr,
                            state.clone(),
                            shutdown_rx.clone(),
                        ));
                    }
                    Err(e) if is_connection_error(&e) => {
                        tracing::debug!("Connection dropped during accept: {}", e);
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to accept connection, retrying in {:?}: {}",
                            ACCEPT_ERROR_BACKOFF,
                            e
                        );
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
                Some(finished) = sessions.join_next(), if !sessions.is_empty() => {
                    log_session_exit(finished);
                }
            }
        }

        drop(listener);
        tracing::info!(sessions = sessions.len(), "Shutting down, draining sessions");
        // `shutdown_rx` is still alive here, so the send cannot fail.
        let _ = shutdown_tx.send(true);
        while let Some(finished) = sessions.join_next().await {
            log_session_exit(finished);
        }
        tracing::info!("Server stopped");

        Ok(())
    }
}

/// Errors that concern only the connection being accepted, not the listener
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}

fn log_session_exit(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!("Session task panicked: {}", e);
        } else {
            tracing::warn!("Session task was cancelled: {}", e);
        }
    }
}
