//! Shutdown coordination.

use tokio::sync::broadcast;

/// Why the server is going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// An OS signal requested termination.
    Signal(&'static str),
    /// `ServerHandle::stop` was called.
    Stopped,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::Signal(name) => write!(f, "signal {name}"),
            ExitReason::Stopped => f.write_str("stop requested"),
        }
    }
}

/// Coordinator for graceful shutdown.
///
/// Wraps a broadcast channel so every long-running task can wait on the same
/// signal and learn why it fired.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<ExitReason>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<ExitReason> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self, reason: ExitReason) {
        let _ = self.tx.send(reason);
    }

    /// Number of tasks still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
