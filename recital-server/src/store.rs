//! File-backed record storage.
//!
//! Each content type lives in one JSON file (`schedules.json`,
//! `videos.json`) under the data directory. The whole file is rewritten on
//! every change via a temp file and rename.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use recital_core::Record;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A record as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stored<R> {
    #[serde(flatten)]
    record: R,
    created_at: DateTime<Utc>,
}

pub struct RecordStore<R: Record> {
    path: PathBuf,
    records: RwLock<Vec<Stored<R>>>,
}

impl<R: Record> RecordStore<R> {
    /// Open the store for `R` in `data_dir`, loading existing records.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Could not create {}", data_dir.display()))?;

        let path = data_dir.join(format!("{}.json", R::KIND));

        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .with_context(|| format!("Could not parse {}", path.display()))?
        } else {
            Vec::new()
        };

        Ok(RecordStore {
            path,
            records: RwLock::new(records),
        })
    }

    /// All records in display order.
    pub async fn list(&self) -> Vec<R> {
        let records = self.records.read().await;
        let mut list: Vec<R> = records.iter().map(|s| s.record.clone()).collect();
        list.sort_by(|a, b| a.display_cmp(b));
        list
    }

    /// Store `record` under a fresh id, ignoring whatever id it came with.
    pub async fn create(&self, mut record: R) -> Result<R> {
        record.set_id(uuid::Uuid::new_v4().to_string());

        let mut records = self.records.write().await;
        let mut next = records.clone();
        next.push(Stored {
            record: record.clone(),
            created_at: Utc::now(),
        });
        self.commit(&mut records, next).await?;

        tracing::info!("Created {} {}", R::KIND, record.id());
        Ok(record)
    }

    /// Replace the record with `id`. Returns `None` if there is none.
    pub async fn update(&self, id: &str, mut record: R) -> Result<Option<R>> {
        record.set_id(id.to_string());

        let mut records = self.records.write().await;
        let mut next = records.clone();
        let Some(slot) = next.iter_mut().find(|s| s.record.id() == id) else {
            return Ok(None);
        };
        slot.record = record.clone();
        self.commit(&mut records, next).await?;

        tracing::info!("Updated {} {}", R::KIND, id);
        Ok(Some(record))
    }

    /// Remove the record with `id`. Returns false if there is none.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        next.retain(|s| s.record.id() != id);

        if next.len() == records.len() {
            return Ok(false);
        }
        self.commit(&mut records, next).await?;

        tracing::info!("Deleted {} {}", R::KIND, id);
        Ok(true)
    }

    /// Write `next` to disk, then make it the served state. On error the
    /// served state is left untouched.
    async fn commit(&self, records: &mut Vec<Stored<R>>, next: Vec<Stored<R>>) -> Result<()> {
        self.save(&next)
            .await
            .with_context(|| format!("Could not save {}", self.path.display()))?;
        *records = next;
        Ok(())
    }

    async fn save(&self, records: &[Stored<R>]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        let temp = self.path.with_extension("json.tmp");

        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}
