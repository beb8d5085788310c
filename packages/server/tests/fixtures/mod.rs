//! Test fixtures: an in-process relay server and a raw TCP test client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use relay_server::{
    Server,
    domain::PeerRegistry,
    infrastructure::{codec::write_line, registry::InMemoryPeerRegistry},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::oneshot,
    task::JoinHandle,
    time::timeout,
};

pub const READ_TIMEOUT: Duration = Duration::from_secs(3);

/// Relay server running on an ephemeral loopback port
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<dyn PeerRegistry>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let registry: Arc<dyn PeerRegistry> = Arc::new(InMemoryPeerRegistry::new());
        let server = Server::new(listener, registry.clone());
        let addr = server.local_addr().expect("Failed to read local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            server
                .run_until(shutdown)
                .await
                .expect("Server exited with error");
        });

        Self {
            addr,
            registry,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Wait until exactly `expected` peers are registered.
    pub async fn wait_for_peers(&self, expected: usize) {
        timeout(READ_TIMEOUT, async {
            while self.registry.count().await != expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("registry never reached {expected} peers"));
    }

    /// Names currently registered, ordered by peer id.
    pub async fn peer_names(&self) -> Vec<String> {
        self.registry
            .snapshot()
            .await
            .into_iter()
            .map(|peer| peer.name.as_str().to_string())
            .collect()
    }

    /// Stop accepting, let every session clean up, and wait for the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            timeout(READ_TIMEOUT, handle)
                .await
                .expect("Server did not stop in time")
                .expect("Server task failed");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Raw line-based client
pub struct TestClient {
    pub name: String,
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect and send `name` as the handshake line.
    pub async fn join(addr: SocketAddr, name: &str) -> Self {
        let mut client = Self::connect(addr, name).await;
        client.send_line(name).await;
        client
    }

    /// Connect without sending anything.
    pub async fn connect(addr: SocketAddr, name: &str) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        let (reader, writer) = stream.into_split();
        Self {
            name: name.to_string(),
            reader: BufReader::new(reader),
            writer,
        }
    }

    pub async fn send_line(&mut self, line: &str) {
        write_line(&mut self.writer, line)
            .await
            .unwrap_or_else(|e| panic!("{} failed to send '{line}': {e}", self.name));
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.expect("raw write failed");
        self.writer.flush().await.expect("flush failed");
    }

    /// Read the next line including its trailing newline.
    pub async fn read_line(&mut self) -> String {
        let mut line = String::new();
        let bytes = timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .unwrap_or_else(|_| panic!("{} timed out waiting for a line", self.name))
            .expect("read failed");
        assert!(bytes > 0, "{} reached end of stream", self.name);
        line
    }

    /// Assert nothing arrives within `window`.
    pub async fn expect_silence(&mut self, window: Duration) {
        let mut line = String::new();
        if let Ok(result) = timeout(window, self.reader.read_line(&mut line)).await {
            panic!("{} expected silence, got {:?} ({:?})", self.name, line, result);
        }
    }

    /// Read every remaining line until the server closes the connection.
    pub async fn read_until_eof(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            let bytes = timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
                .await
                .unwrap_or_else(|_| panic!("{} timed out waiting for EOF", self.name))
                .unwrap_or(0);
            if bytes == 0 {
                return lines;
            }
            lines.push(line);
        }
    }

    /// Close the write side, as a client does when it exits.
    pub async fn leave(mut self) {
        let _ = self.writer.shutdown().await;
    }
}
