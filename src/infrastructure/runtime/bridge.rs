//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! This module provides a bridge between the synchronous TUI (ratatui) thread
//! and the asynchronous Tokio runtime that talks to the sample backend.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tokio::runtime::Runtime;
use tracing::error;

use crate::domain::{FetchOutcome, SampleRequest};
use crate::infrastructure::backend::SampleClient;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Fetch samples for a validated request
    FetchSample { id: u64, request: SampleRequest },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A fetch finished, one way or another
    SampleReady { id: u64, outcome: FetchOutcome },
    /// The runtime could not be started
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Create a new runtime bridge serving requests with `client`
    pub fn new(client: Arc<dyn SampleClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        // Spawn the worker thread with its own Tokio runtime
        thread::spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(err) => {
                    error!(error = %err, "failed to start tokio runtime");
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Failed to start runtime: {err}"),
                    });
                    return;
                }
            };
            rt.block_on(run_async_worker(client, cmd_rx, evt_tx));
        });

        Self { cmd_tx, evt_rx }
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        // Try to send shutdown command
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
