//! Async worker - runs in Tokio runtime and serves sample requests

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::domain::{FetchOutcome, SampleRequest};
use crate::infrastructure::backend::SampleClient;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the async worker loop until shutdown or until the TUI goes away
pub async fn run_async_worker(
    client: Arc<dyn SampleClient>,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) {
    let mut poll_interval = interval(Duration::from_millis(25));

    loop {
        poll_interval.tick().await;

        // Requests are served one at a time
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("command channel closed, worker stopping");
                    return;
                }
            };
            match cmd {
                RuntimeCommand::Shutdown => {
                    debug!("worker shutdown requested");
                    return;
                }
                RuntimeCommand::FetchSample { id, request } => {
                    let outcome = fetch_outcome(client.as_ref(), &request).await;
                    if evt_tx.send(RuntimeEvent::SampleReady { id, outcome }).is_err() {
                        debug!(id, "event channel closed, worker stopping");
                        return;
                    }
                }
            }
        }
    }
}

/// Perform one fetch and fold the result into a [`FetchOutcome`]
pub async fn fetch_outcome(client: &dyn SampleClient, request: &SampleRequest) -> FetchOutcome {
    info!(chain = request.chain.wire_value(), address = %request.address, "fetching samples");
    let outcome = FetchOutcome::from(client.fetch_sample(request).await);
    match &outcome {
        FetchOutcome::Records(records) => info!(count = records.len(), "samples received"),
        FetchOutcome::SoftError(message) => warn!(%message, "backend reported an error"),
        FetchOutcome::Transport(err) => error!(error = %err, "sample request failed"),
    }
    outcome
}
