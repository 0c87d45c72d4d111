//! Receive side of the bounded alert queue.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::protocol::Alert;

/// Cloneable, receive-only handle on the alert queue. Clones share one
/// queue: each alert is delivered to exactly one reader.
#[derive(Debug, Clone)]
pub struct Alerts {
    rx: Arc<Mutex<mpsc::Receiver<Alert>>>,
}

impl Alerts {
    pub(crate) fn new(rx: mpsc::Receiver<Alert>) -> Self {
        Self { rx: Arc::new(Mutex::new(rx)) }
    }

    /// Wait for the next alert. Returns `None` once the producing checker
    /// is gone and the queue is drained.
    pub async fn recv(&self) -> Option<Alert> {
        self.rx.lock().await.recv().await
    }

    /// Take an alert if one is queued and no other reader is waiting.
    pub fn try_recv(&self) -> Option<Alert> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }

    /// Number of alerts waiting to be read.
    pub fn len(&self) -> usize {
        self.rx.try_lock().map(|rx| rx.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
