//! Background worker that forwards collection mutations to the remote.
//!
//! One worker per collection. Commands run strictly in the order they were
//! enqueued, and the worker remembers which durable id each provisional id
//! became, so an edit made before its create was confirmed still reaches the
//! right remote record.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::PersistenceError;
use crate::record::Record;
use crate::remote::RemotePersistence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Create,
    Update,
    Delete,
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let verb = match self {
            SyncOp::Create => "create",
            SyncOp::Update => "update",
            SyncOp::Delete => "delete",
        };
        write!(f, "{verb}")
    }
}

pub(crate) enum SyncCommand<R> {
    Create { local_id: String, record: R },
    Update { local_id: String, record: R },
    Delete { local_id: String },
}

impl<R> SyncCommand<R> {
    pub(crate) fn op(&self) -> SyncOp {
        match self {
            SyncCommand::Create { .. } => SyncOp::Create,
            SyncCommand::Update { .. } => SyncOp::Update,
            SyncCommand::Delete { .. } => SyncOp::Delete,
        }
    }
}

/// Result of one remote call, keyed by the id the collection used when it
/// enqueued the command.
pub(crate) struct SyncOutcome<R> {
    pub local_id: String,
    pub op: SyncOp,
    pub result: Result<Option<R>, PersistenceError>,
}

/// What happened to one remote call, as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncReport {
    Created { provisional: String, id: String },
    Updated { id: String },
    Deleted { id: String },
    Failed {
        id: String,
        op: SyncOp,
        error: PersistenceError,
    },
}

impl SyncReport {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncReport::Failed { .. })
    }
}

pub(crate) fn spawn<R: Record>(
    remote: Arc<dyn RemotePersistence<R>>,
) -> (UnboundedSender<SyncCommand<R>>, UnboundedReceiver<SyncOutcome<R>>) {
    let (command_tx, command_rx) = unbounded_channel();
    let (outcome_tx, outcome_rx) = unbounded_channel();

    tokio::spawn(run(remote, command_rx, outcome_tx));

    (command_tx, outcome_rx)
}

async fn run<R: Record>(
    remote: Arc<dyn RemotePersistence<R>>,
    mut commands: UnboundedReceiver<SyncCommand<R>>,
    outcomes: UnboundedSender<SyncOutcome<R>>,
) {
    // Provisional id -> durable id; dropped once the record is deleted
    let mut durable_ids: HashMap<String, String> = HashMap::new();

    while let Some(command) = commands.recv().await {
        let op = command.op();

        let (local_id, result) = match command {
            SyncCommand::Create { local_id, record } => {
                let result = remote.create(&record).await;
                if let Ok(created) = &result {
                    durable_ids.insert(local_id.clone(), created.id().to_string());
                }
                (local_id, result.map(Some))
            }
            SyncCommand::Update { local_id, mut record } => {
                let id = resolve(&durable_ids, &local_id);
                record.set_id(id.clone());
                (local_id, remote.update(&id, &record).await.map(Some))
            }
            SyncCommand::Delete { local_id } => {
                let id = resolve(&durable_ids, &local_id);
                let result = remote.delete(&id).await;
                if result.is_ok() {
                    durable_ids
                        .retain(|provisional, durable| *provisional != local_id && *durable != id);
                }
                (local_id, result.map(|_| None))
            }
        };

        if let Err(e) = &result {
            tracing::warn!("Remote {} of {} {} failed: {}", op, R::KIND, local_id, e);
        }

        let outcome = SyncOutcome {
            local_id,
            op,
            result,
        };

        if outcomes.send(outcome).is_err() {
            tracing::debug!("{} collection was disposed, discarding {} result", R::KIND, op);
        }
    }

    tracing::debug!("{} sync worker stopped", R::KIND);
}

fn resolve(durable_ids: &HashMap<String, String>, id: &str) -> String {
    durable_ids
        .get(id)
        .cloned()
        .unwrap_or_else(|| id.to_string())
}
