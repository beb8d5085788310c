//! Peer session: one task per accepted connection.
//!
//! A session moves through `Connecting → Named → Active → Closed`:
//!
//! - `Connecting`: the first line is read as the display name. A session that
//!   fails here is never registered and nothing is broadcast for it.
//! - `Named`: the peer is registered and everyone else is told it joined.
//! - `Active`: each further line is relayed to everyone but the sender.
//! - `Closed`: the peer is removed, everyone left is told, and the socket is
//!   closed. Every exit from `Active` (end of stream, read error, server
//!   shutdown, panic in the read path) goes through the same cleanup.
//!
//! Once registered, the peer is also held by a `Registration` guard. If the
//! session task is cancelled or panics outside the active phase, dropping the
//! guard still removes the peer and tells everyone it left.

use std::{net::SocketAddr, panic::AssertUnwindSafe, sync::Arc};

use futures_util::FutureExt;
use relay_shared::time::{get_jst_timestamp, timestamp_to_jst_rfc3339};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::watch,
};

use crate::{
    domain::{DisplayName, MessageContent, Peer, PeerId, PeerRegistry, Timestamp},
    infrastructure::{
        codec::LineReader,
        transport::{PeerWriter, spawn_writer},
    },
    ui::state::AppState,
    usecase::{ConnectPeerUseCase, DisconnectPeerUseCase, SendMessageUseCase},
};

/// Name used in logs for a connection that never sent a usable name
const UNKNOWN_PEER_NAME: &str = "Unknown";

/// Why a session left the `Active` state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The client closed its end of the connection
    PeerClosed,
    /// Reading from the connection failed
    ReadError,
    /// The server is shutting down
    Shutdown,
    /// The read path panicked
    Panicked,
}

/// Run one peer session to completion.
///
/// # Arguments
///
/// * `stream` - The accepted connection
/// * `addr` - Remote address, for logging
/// * `state` - Shared server state
/// * `shutdown` - Flips to `true` when the server is shutting down
pub async fn handle_connection<S>(
    stream: S,
    addr: SocketAddr,
    state: Arc<AppState>,
    mut shutdown: watch::Receiver<bool>,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let peer_id = state.peer_ids.generate();
    let (read_half, write_half) = tokio::io::split(stream);
    let mut reader = LineReader::new(read_half);

    // Connecting
    let Some(name) = acquire_name(peer_id, addr, &mut reader, &mut shutdown).await else {
        return;
    };

    // Named
    let (sender, writer) = spawn_writer(peer_id, write_half);
    let connected_at = Timestamp::new(get_jst_timestamp());
    let peer = Peer::new(peer_id, name.clone(), connected_at, Arc::new(sender));

    let mut registration = Registration::new(peer_id, state.registry.clone());
    let connect_usecase = ConnectPeerUseCase::new(state.registry.clone());
    match connect_usecase.execute(peer).await {
        Ok(report) => {
            tracing::info!(
                peer_id = %peer_id,
                %addr,
                connected_at = %timestamp_to_jst_rfc3339(connected_at.value()),
                notified = report.delivered,
                "{} has connected",
                name
            );
        }
        Err(e) => {
            tracing::error!(peer_id = %peer_id, %addr, "Rejecting '{}': {}", name, e);
            // The id belongs to whoever is registered under it, not to us.
            registration.disarm();
            writer.close().await;
            return;
        }
    }

    // Active
    let active = run_active(peer_id, &name, &mut reader, &state, &mut shutdown);
    let reason = match AssertUnwindSafe(active).catch_unwind().await {
        Ok(reason) => reason,
        Err(_) => {
            tracing::error!(peer_id = %peer_id, "Session for '{}' panicked", name);
            CloseReason::Panicked
        }
    };

    // Closed
    close_session(&name, connected_at, &state, registration, writer, reason).await;
}

/// Deregisters a peer whose session ended without running `close_session`
struct Registration {
    peer_id: PeerId,
    registry: Arc<dyn PeerRegistry>,
    armed: bool,
}

impl Registration {
    fn new(peer_id: PeerId, registry: Arc<dyn PeerRegistry>) -> Self {
        Self {
            peer_id,
            registry,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let peer_id = self.peer_id;
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!(peer_id = %peer_id, "No runtime left to deregister peer");
            return;
        };
        tracing::warn!(peer_id = %peer_id, "Session ended without cleanup, deregistering");

        let disconnect_usecase = DisconnectPeerUseCase::new(self.registry.clone());
        runtime.spawn(async move {
            if let Some(report) = disconnect_usecase.execute(peer_id).await {
                tracing::info!(
                    peer_id = %peer_id,
                    notified = report.delivered,
                    "Deregistered abandoned peer"
                );
            }
        });
    }
}

async fn acquire_name<R>(
    peer_id: PeerId,
    addr: SocketAddr,
    reader: &mut LineReader<R>,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<DisplayName>
where
    R: AsyncRead + Unpin,
{
    let line = tokio::select! {
        line = reader.next_line() => line,
        _ = wait_for_shutdown(shutdown) => {
            tracing::debug!(peer_id = %peer_id, %addr, "Shutdown before name was received");
            return None;
        }
    };

    let failure = match line {
        Ok(Some(raw)) => match DisplayName::new(&raw) {
            Ok(name) => return Some(name),
            Err(e) => e.to_string(),
        },
        Ok(None) => "connection closed before name was sent".to_string(),
        Err(e) => e.to_string(),
    };

    tracing::warn!(
        peer_id = %peer_id,
        %addr,
        "Failed receiving name from '{}': {}",
        UNKNOWN_PEER_NAME,
        failure
    );
    None
}

async fn run_active<R>(
    peer_id: PeerId,
    name: &DisplayName,
    reader: &mut LineReader<R>,
    state: &AppState,
    shutdown: &mut watch::Receiver<bool>,
) -> CloseReason
where
    R: AsyncRead + Unpin,
{
    let send_usecase = SendMessageUseCase::new(state.registry.clone());

    loop {
        let line = tokio::select! {
            line = reader.next_line() => line,
            _ = wait_for_shutdown(shutdown) => return CloseReason::Shutdown,
        };

        match line {
            Ok(Some(raw)) => {
                // Blank lines carry nothing to relay.
                let Ok(content) = MessageContent::new(raw) else {
                    continue;
                };
                tracing::debug!(peer_id = %peer_id, "{}: {}", name, content);
                send_usecase.execute(peer_id, name, content).await;
            }
            Ok(None) => return CloseReason::PeerClosed,
            Err(e) => {
                tracing::warn!(peer_id = %peer_id, "Read from '{}' failed: {}", name, e);
                return CloseReason::ReadError;
            }
        }
    }
}

async fn close_session(
    name: &DisplayName,
    connected_at: Timestamp,
    state: &AppState,
    mut registration: Registration,
    writer: PeerWriter,
    reason: CloseReason,
) {
    let peer_id = registration.peer_id;
    let disconnect_usecase = DisconnectPeerUseCase::new(state.registry.clone());
    let removed = disconnect_usecase.execute(peer_id).await;
    registration.disarm();

    match removed {
        Some(report) => {
            let remaining = disconnect_usecase.count_remaining_peers().await;
            tracing::info!(
                peer_id = %peer_id,
                ?reason,
                notified = report.delivered,
                remaining,
                session_ms = get_jst_timestamp() - connected_at.value(),
                "{} has disconnected.",
                name
            );
        }
        None => {
            tracing::warn!(peer_id = %peer_id, ?reason, "'{}' was already deregistered", name);
        }
    }

    writer.close().await;
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender also means the server is gone.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
