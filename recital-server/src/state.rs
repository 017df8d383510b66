use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use recital_core::asset::DirAssetStore;
use recital_core::{Record, ScheduleRecord, VideoRecord};

use crate::mailbox::Mailbox;
use crate::store::RecordStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub schedules: Arc<RecordStore<ScheduleRecord>>,
    pub videos: Arc<RecordStore<VideoRecord>>,
    pub assets: Arc<DirAssetStore>,
    pub asset_root: Arc<Path>,
    pub mailbox: Arc<Mailbox>,
}

impl AppState {
    /// Open all stores under `data_dir`.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let asset_root = data_dir.join("assets");

        Ok(AppState {
            schedules: Arc::new(RecordStore::open(data_dir)?),
            videos: Arc::new(RecordStore::open(data_dir)?),
            assets: Arc::new(DirAssetStore::new(asset_root.clone())),
            asset_root: Arc::from(asset_root.as_path()),
            mailbox: Arc::new(Mailbox::new(data_dir.join("outbox"))),
        })
    }
}

/// Access to the store of one content type, so record routes can be generic.
pub trait HasStore<R: Record> {
    fn store(&self) -> &RecordStore<R>;
}

impl HasStore<ScheduleRecord> for AppState {
    fn store(&self) -> &RecordStore<ScheduleRecord> {
        &self.schedules
    }
}

impl HasStore<VideoRecord> for AppState {
    fn store(&self) -> &RecordStore<VideoRecord> {
        &self.videos
    }
}
