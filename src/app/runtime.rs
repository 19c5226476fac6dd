use crate::lookup::{lookup_worker_loop, LookupCommand, LookupResponse};
use crate::store::DictionaryStore;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;

/// Queue depth between the coordinator and the lookup worker, in both directions.
const LOOKUP_CHANNEL_CAPACITY: usize = 64;

/// Coordinator side of a running lookup worker.
pub struct LookupChannels {
    pub commands: Sender<LookupCommand>,
    pub responses: Receiver<LookupResponse>,
    pub handle: JoinHandle<()>,
}

/// Start the lookup worker on the current tokio runtime.
pub fn spawn_lookup_worker(store: Arc<dyn DictionaryStore>) -> LookupChannels {
    let (command_tx, command_rx) = mpsc::channel(LOOKUP_CHANNEL_CAPACITY);
    let (response_tx, response_rx) = mpsc::channel(LOOKUP_CHANNEL_CAPACITY);
    let handle = tokio::spawn(lookup_worker_loop(command_rx, response_tx, store));

    LookupChannels {
        commands: command_tx,
        responses: response_rx,
        handle,
    }
}
