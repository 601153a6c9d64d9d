//! Cooperative interruption
//!
//! Loops check the flag between items; an in-flight request is allowed to
//! finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that running loops stop at their next boundary
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Spawns a task that triggers this flag on Ctrl-C
    pub fn listen_for_ctrl_c(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::warn!("Interrupt received, stopping after the current item");
                    shutdown.trigger();
                }
                Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
            }
        })
    }
}
