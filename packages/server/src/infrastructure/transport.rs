//! Per-peer outbound path.
//!
//! Each connection gets a writer task that owns the socket's write half and
//! drains a bounded channel. `ChannelSender` is the `PeerSender` handed to
//! the registry; sending only enqueues, so a slow socket never stalls the
//! broadcaster or the registry. A peer that stops reading fills its queue and
//! further text for it is refused with `SendError::Full`.

use std::time::Duration;

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{PeerId, PeerSender, SendError};

/// Number of rendered lines that may wait for one peer's socket
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// How long `PeerWriter::close` waits for queued text to be flushed
pub const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// `PeerSender` backed by the peer's writer task
#[derive(Clone)]
pub struct ChannelSender {
    tx: mpsc::Sender<String>,
}

impl PeerSender for ChannelSender {
    fn send(&self, text: &str) -> Result<(), SendError> {
        self.tx.try_send(text.to_owned()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::Full,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

/// Handle to a running writer task
pub struct PeerWriter {
    peer_id: PeerId,
    close_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl PeerWriter {
    /// Flush queued text, shut down the write half and wait for the task.
    ///
    /// A peer that stopped reading can block the flush forever, so the task is
    /// aborted after `CLOSE_FLUSH_TIMEOUT`. Aborting drops the write half.
    pub async fn close(self) {
        let PeerWriter {
            peer_id,
            close_tx,
            mut handle,
        } = self;

        // The task may already have stopped after a write failure.
        let _ = close_tx.send(());
        match tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(peer_id = %peer_id, "writer task failed: {}", e),
            Err(_) => {
                tracing::warn!(
                    peer_id = %peer_id,
                    "writer did not flush within {:?}, dropping queued text",
                    CLOSE_FLUSH_TIMEOUT
                );
                handle.abort();
                let _ = handle.await;
            }
        }
    }
}

/// Spawn the writer task for one peer.
pub fn spawn_writer<W>(peer_id: PeerId, writer: W) -> (ChannelSender, PeerWriter)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    let (close_tx, close_rx) = oneshot::channel();
    let handle = tokio::spawn(run_writer(peer_id, writer, rx, close_rx));

    (
        ChannelSender { tx },
        PeerWriter {
            peer_id,
            close_tx,
            handle,
        },
    )
}

async fn run_writer<W>(
    peer_id: PeerId,
    mut writer: W,
    mut rx: mpsc::Receiver<String>,
    mut close_rx: oneshot::Receiver<()>,
) where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            biased;
            next = rx.recv() => {
                let Some(text) = next else { break };
                if let Err(e) = write_text(&mut writer, &text).await {
                    tracing::debug!(peer_id = %peer_id, "write failed, stopping writer: {}", e);
                    return;
                }
            }
            _ = &mut close_rx => break,
        }
    }

    // Deliver whatever was queued before the close request.
    rx.close();
    while let Ok(text) = rx.try_recv() {
        if write_text(&mut writer, &text).await.is_err() {
            return;
        }
    }

    if let Err(e) = writer.shutdown().await {
        tracing::debug!(peer_id = %peer_id, "failed to shut down write half: {}", e);
    }
}

async fn write_text<W>(writer: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await
}
