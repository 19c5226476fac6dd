use crate::lookup::protocol::{LookupCommand, LookupResponse};
use crate::store::DictionaryStore;
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinSet;

/// Run the lookup worker processing commands from the coordinator.
///
/// Every query runs on its own task, so a slow prefix query never holds back a later one and
/// responses may arrive out of issue order. Staleness is resolved by the receiver using the
/// generation carried in each response.
pub async fn lookup_worker_loop(
    mut rx: Receiver<LookupCommand>,
    tx: Sender<LookupResponse>,
    store: Arc<dyn DictionaryStore>,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            cmd = rx.recv() => {
                let Some(cmd) = cmd else { break };
                let outcome = handle_command(cmd, &store, &tx, &mut in_flight);
                if outcome.done {
                    break;
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = joined {
                    log::warn!("lookup task ended abnormally: {}", err);
                }
            }
        }
    }

    // Outstanding queries are abandoned rather than awaited.
    in_flight.abort_all();
}

fn handle_command(
    cmd: LookupCommand,
    store: &Arc<dyn DictionaryStore>,
    tx: &Sender<LookupResponse>,
    in_flight: &mut JoinSet<()>,
) -> HandlerOutcome {
    match cmd {
        LookupCommand::Suggest { generation, prefix } => {
            log::debug!("suggest #{generation}: {prefix:?}");
            let store = Arc::clone(store);
            let tx = tx.clone();
            in_flight.spawn(async move {
                let result = store.query_by_prefix(&prefix).await;
                let _ = tx
                    .send(LookupResponse::Suggestions { generation, result })
                    .await;
            });
            HandlerOutcome::continue_running()
        }
        LookupCommand::FetchArticles { generation, word } => {
            log::debug!("articles #{generation}: {word:?}");
            let store = Arc::clone(store);
            let tx = tx.clone();
            in_flight.spawn(async move {
                let result = store.query_articles_by_word(&word).await;
                let _ = tx
                    .send(LookupResponse::Articles {
                        generation,
                        word,
                        result,
                    })
                    .await;
            });
            HandlerOutcome::continue_running()
        }
        LookupCommand::Shutdown => HandlerOutcome::exit(),
    }
}

struct HandlerOutcome {
    done: bool,
}

impl HandlerOutcome {
    fn continue_running() -> Self {
        Self { done: false }
    }

    fn exit() -> Self {
        Self { done: true }
    }
}
