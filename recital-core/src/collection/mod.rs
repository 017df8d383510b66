//! The admin panel's working copy of one content type.
//!
//! A [`ManagedCollection`] applies every create/update/delete to its local
//! list immediately and hands the matching remote call to a background
//! worker. Results come back through [`ManagedCollection::apply_outcomes`] or
//! [`ManagedCollection::settle`], which reconcile ids and tag each record with
//! its [`SyncState`]. A failed remote call marks the record `Failed` and sets
//! an error status; the local change is kept.

mod sync;
mod ui;

pub use sync::{SyncOp, SyncReport};
pub use ui::{Modal, Status, StatusLevel, UiState};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::error::{CollectionError, NotFoundError, PersistenceError, UploadError};
use crate::partition::{Partition, partition};
use crate::record::{EventDate, Record, ScheduleRecord};
use crate::remote::RemotePersistence;
use sync::{SyncCommand, SyncOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// A remote call for the latest local change has not resolved yet.
    Pending,
    /// The remote holds the same value as the local list.
    Confirmed,
    /// The last remote call failed. The local value is kept.
    Failed(String),
}

/// A record together with its sync bookkeeping.
#[derive(Debug, Clone)]
pub struct Tracked<R> {
    pub record: R,
    pub state: SyncState,
    /// Unresolved remote calls touching this record.
    pending: usize,
    /// Whether the remote has ever confirmed this record's id.
    durable: bool,
}

impl<R> Tracked<R> {
    fn confirmed(record: R) -> Self {
        Tracked {
            record,
            state: SyncState::Confirmed,
            pending: 0,
            durable: true,
        }
    }

    fn provisional(record: R) -> Self {
        Tracked {
            record,
            state: SyncState::Pending,
            pending: 0,
            durable: false,
        }
    }

    /// True until the remote has assigned a durable id.
    pub fn is_provisional(&self) -> bool {
        !self.durable
    }
}

pub struct ManagedCollection<R: Record> {
    /// Insertion order; display order is derived in `list`.
    records: Vec<Tracked<R>>,
    /// Provisional id -> durable id, for callers holding an old id. Entries
    /// live until the record is deleted.
    durable_ids: HashMap<String, String>,
    commands: UnboundedSender<SyncCommand<R>>,
    outcomes: UnboundedReceiver<SyncOutcome<R>>,
    in_flight: usize,
    ui: UiState,
}

impl<R: Record> ManagedCollection<R> {
    /// Load every record from `remote` and start the sync worker.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn init(remote: Arc<dyn RemotePersistence<R>>) -> Result<Self, PersistenceError> {
        let loaded = remote.list_all().await?;

        let mut seen = HashSet::new();
        let records = loaded
            .into_iter()
            .filter(|r| {
                let unique = seen.insert(r.id().to_string());
                if !unique {
                    tracing::warn!("Skipping duplicate {} id {}", R::KIND, r.id());
                }
                unique
            })
            .map(Tracked::confirmed)
            .collect::<Vec<_>>();

        tracing::debug!("Loaded {} {}", records.len(), R::KIND);

        let (commands, outcomes) = sync::spawn(remote);

        Ok(ManagedCollection {
            records,
            durable_ids: HashMap::new(),
            commands,
            outcomes,
            in_flight: 0,
            ui: UiState::default(),
        })
    }

    /// Tear the collection down. Remote calls already enqueued still run;
    /// their results are discarded.
    pub fn dispose(self) {
        if self.in_flight > 0 {
            tracing::debug!(
                "Disposing {} collection with {} calls in flight",
                R::KIND,
                self.in_flight
            );
        }
    }

    // READ:

    /// Snapshot of the records in display order.
    pub fn list(&self) -> Vec<R> {
        self.entries().into_iter().map(|t| t.record.clone()).collect()
    }

    /// Records with their sync state, in display order.
    pub fn entries(&self) -> Vec<&Tracked<R>> {
        let mut entries: Vec<&Tracked<R>> = self.records.iter().collect();
        // Stable sort: ties keep insertion order
        entries.sort_by(|a, b| a.record.display_cmp(&b.record));
        entries
    }

    pub fn get(&self, id: &str) -> Option<&Tracked<R>> {
        let id = self.resolve(id);
        self.records.iter().find(|t| t.record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of remote calls that have not resolved yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    // MUTATIONS:

    /// Validate `draft`, append it under a provisional id and start the
    /// remote create. Returns the record as it now appears locally.
    pub fn create(&mut self, draft: &R::Draft) -> Result<R, CollectionError> {
        let provisional = uuid::Uuid::new_v4().to_string();
        let record = R::from_draft(provisional.clone(), draft)?;

        self.records.push(Tracked::provisional(record.clone()));
        self.dispatch(SyncCommand::Create {
            local_id: provisional,
            record: record.clone(),
        });

        Ok(record)
    }

    /// Replace the record with `id` in place and start the remote update.
    pub fn update(&mut self, id: &str, draft: &R::Draft) -> Result<R, CollectionError> {
        let id = self.resolve(id);
        let index = self.position(&id)?;
        let record = R::from_draft(id.clone(), draft)?;

        let tracked = &mut self.records[index];
        tracked.record = record.clone();
        tracked.state = SyncState::Pending;

        // A record whose create failed has nothing to update remotely yet
        let command = if !tracked.durable && tracked.pending == 0 {
            SyncCommand::Create {
                local_id: id,
                record: record.clone(),
            }
        } else {
            SyncCommand::Update {
                local_id: id,
                record: record.clone(),
            }
        };

        self.dispatch(command);
        Ok(record)
    }

    /// Remove the record with `id` and start the remote delete.
    pub fn delete(&mut self, id: &str) -> Result<(), CollectionError> {
        let id = self.resolve(id);
        let index = self.position(&id)?;

        let removed = self.records.remove(index);
        if self.ui.editing() == Some(id.as_str()) {
            self.ui.modal = Modal::Closed;
        }

        // Never stored remotely and no create queued: nothing to delete there
        if !removed.durable && removed.pending == 0 {
            tracing::debug!("Dropped unsaved {} {}", R::KIND, id);
            return Ok(());
        }

        self.dispatch(SyncCommand::Delete { local_id: id });
        Ok(())
    }

    /// Re-send a record whose last remote call failed.
    pub fn retry(&mut self, id: &str) -> Result<(), CollectionError> {
        let id = self.resolve(id);
        let index = self.position(&id)?;
        let tracked = &mut self.records[index];

        if !matches!(tracked.state, SyncState::Failed(_)) {
            return Ok(());
        }

        tracked.state = SyncState::Pending;
        let record = tracked.record.clone();
        let command = if tracked.durable {
            SyncCommand::Update {
                local_id: id,
                record,
            }
        } else {
            SyncCommand::Create {
                local_id: id,
                record,
            }
        };

        self.dispatch(command);
        Ok(())
    }

    // SYNC:

    /// Reconcile every remote result that has already arrived, without waiting.
    pub fn apply_outcomes(&mut self) -> Vec<SyncReport> {
        let mut reports = Vec::new();

        while self.in_flight > 0 {
            match self.outcomes.try_recv() {
                Ok(outcome) => reports.push(self.apply(outcome)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.worker_gone();
                    break;
                }
            }
        }

        reports
    }

    /// Wait for every remote call in flight and reconcile the results.
    pub async fn settle(&mut self) -> Vec<SyncReport> {
        let mut reports = Vec::new();

        while self.in_flight > 0 {
            match self.outcomes.recv().await {
                Some(outcome) => reports.push(self.apply(outcome)),
                None => self.worker_gone(),
            }
        }

        reports
    }

    // UI:

    /// Open an empty create form.
    pub fn open_create(&mut self) -> R::Draft {
        self.ui.modal = Modal::Creating;
        R::blank_draft(self.records.len())
    }

    /// Open the edit form for `id`, prefilled with its current values.
    pub fn open_edit(&mut self, id: &str) -> Result<R::Draft, CollectionError> {
        let id = self.resolve(id);
        let index = self.position(&id)?;
        let draft = self.records[index].record.to_draft();

        self.ui.modal = Modal::Editing(id);
        Ok(draft)
    }

    pub fn close_modal(&mut self) {
        self.ui.modal = Modal::Closed;
    }

    /// Save the open form: update when editing, create otherwise. The form
    /// closes on success and stays open on error.
    pub fn submit(&mut self, draft: &R::Draft) -> Result<R, CollectionError> {
        let saved = match self.ui.modal.clone() {
            Modal::Editing(id) => self.update(&id, draft)?,
            Modal::Creating | Modal::Closed => self.create(draft)?,
        };

        self.ui.modal = Modal::Closed;
        Ok(saved)
    }

    /// Show an upload failure next to the save that still went through.
    pub fn report_upload_warning(&mut self, error: &UploadError) {
        self.ui.status = Some(Status::warning(format!(
            "Image upload failed, saved without image: {error}"
        )));
    }

    pub fn dismiss_status(&mut self) {
        self.ui.status = None;
    }

    // INTERNALS:

    fn resolve(&self, id: &str) -> String {
        self.durable_ids
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn position(&self, id: &str) -> Result<usize, NotFoundError> {
        self.records
            .iter()
            .position(|t| t.record.id() == id)
            .ok_or_else(|| NotFoundError::new(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Tracked<R>> {
        self.records.iter_mut().find(|t| t.record.id() == id)
    }

    fn dispatch(&mut self, command: SyncCommand<R>) {
        let local_id = match &command {
            SyncCommand::Create { local_id, .. }
            | SyncCommand::Update { local_id, .. }
            | SyncCommand::Delete { local_id } => local_id.clone(),
        };

        match self.commands.send(command) {
            Ok(()) => {
                self.in_flight += 1;
                if let Some(tracked) = self.find_mut(&local_id) {
                    tracked.pending += 1;
                }
            }
            Err(_) => {
                tracing::error!("{} sync worker is not running", R::KIND);
                if let Some(tracked) = self.find_mut(&local_id) {
                    tracked.state = SyncState::Failed("sync worker is not running".into());
                }
                self.ui.status = Some(Status::error("Changes cannot be saved right now"));
            }
        }

        self.ui.loading = self.in_flight > 0;
    }

    fn apply(&mut self, outcome: SyncOutcome<R>) -> SyncReport {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.ui.loading = self.in_flight > 0;

        let SyncOutcome {
            local_id,
            op,
            result,
        } = outcome;

        match result {
            Ok(remote) => match (op, remote) {
                (SyncOp::Create, Some(created)) => {
                    let durable = created.id().to_string();
                    self.durable_ids.insert(local_id.clone(), durable.clone());
                    self.confirm(&local_id, Some(created));
                    SyncReport::Created {
                        provisional: local_id,
                        id: durable,
                    }
                }
                (SyncOp::Update, Some(updated)) => {
                    let id = self.resolve(&local_id);
                    self.confirm(&id, Some(updated));
                    SyncReport::Updated { id }
                }
                (_, _) => {
                    let id = self.resolve(&local_id);
                    self.durable_ids
                        .retain(|provisional, durable| *provisional != local_id && *durable != id);
                    SyncReport::Deleted { id }
                }
            },
            Err(error) => {
                let id = self.resolve(&local_id);
                if let Some(tracked) = self.find_mut(&id) {
                    tracked.pending = tracked.pending.saturating_sub(1);
                    tracked.state = SyncState::Failed(error.to_string());
                }
                self.ui.status = Some(Status::error(format!(
                    "Failed to {op} {}: {error}",
                    singular(R::KIND)
                )));
                SyncReport::Failed { id, op, error }
            }
        }
    }

    /// Mark one remote call on `local_id` as resolved. When it was the last
    /// one pending, the record adopts the remote value.
    fn confirm(&mut self, local_id: &str, remote: Option<R>) {
        let Some(tracked) = self.find_mut(local_id) else {
            tracing::debug!("{} {} no longer exists locally", R::KIND, local_id);
            return;
        };

        tracked.pending = tracked.pending.saturating_sub(1);

        if let Some(remote) = remote {
            tracked.durable = true;
            tracked.record.set_id(remote.id().to_string());
            if tracked.pending == 0 {
                tracked.record = remote;
            }
        }

        if tracked.pending == 0 {
            tracked.state = SyncState::Confirmed;
        }
    }

    fn worker_gone(&mut self) {
        tracing::error!("{} sync worker stopped with {} calls in flight", R::KIND, self.in_flight);
        self.in_flight = 0;
        self.ui.loading = false;

        for tracked in self.records.iter_mut().filter(|t| t.pending > 0) {
            tracked.pending = 0;
            tracked.state = SyncState::Failed("sync worker stopped".into());
        }
        self.ui.status = Some(Status::error("Changes cannot be saved right now"));
    }
}

impl ManagedCollection<ScheduleRecord> {
    /// Upcoming and past events relative to `today`.
    pub fn partition(&self, today: &EventDate) -> Partition {
        partition(today, self.records.iter().map(|t| &t.record))
    }
}

fn singular(kind: &str) -> &str {
    kind.strip_suffix('s').unwrap_or(kind)
}
