//! Memory 传输层实现 (同进程通信)

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use super::{Incoming, Outgoing, Transport};
use crate::utils::AppError;

/// In-process transport for tests and same-process embedding.
///
/// Inbound messages are injected through the paired
/// [`MemoryTransportHandle`]; outbound messages are observed from it.
#[derive(Debug)]
pub struct MemoryTransport {
    rx: Mutex<mpsc::UnboundedReceiver<Incoming>>,
    out_tx: mpsc::UnboundedSender<Outgoing>,
}

/// Test-side handle paired with a [`MemoryTransport`].
#[derive(Debug)]
pub struct MemoryTransportHandle {
    pub in_tx: mpsc::UnboundedSender<Incoming>,
    pub out_rx: mpsc::UnboundedReceiver<Outgoing>,
}

impl MemoryTransport {
    /// Create a transport plus its test-side handle.
    pub fn channel() -> (Self, MemoryTransportHandle) {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        (
            Self {
                rx: Mutex::new(in_rx),
                out_tx,
            },
            MemoryTransportHandle { in_tx, out_rx },
        )
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn next(&self) -> Result<Incoming, AppError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| AppError::transport("memory transport closed"))
    }

    async fn send(&self, msg: &Outgoing) -> Result<(), AppError> {
        self.out_tx
            .send(msg.clone())
            .map_err(|e| AppError::transport(e.to_string()))
    }
}
