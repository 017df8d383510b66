//! In-memory data source seeded with sample content.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::record::{EventDate, Record, ScheduleRecord, VideoRecord};
use crate::remote::RemotePersistence;
use crate::video_ref::VideoRef;

/// Content types that ship with sample records.
pub trait Fixture: Record {
    fn fixtures() -> Vec<Self>;
}

/// A data source that keeps records in memory, with simulated network latency.
pub struct FixtureSource<R: Record> {
    records: Mutex<Vec<R>>,
    latency: Duration,
}

impl<R: Record> FixtureSource<R> {
    pub fn new(records: Vec<R>, latency: Duration) -> Self {
        FixtureSource {
            records: Mutex::new(records),
            latency,
        }
    }

    /// Current contents, without latency.
    pub fn snapshot(&self) -> Vec<R> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn with_records<T>(
        &self,
        f: impl FnOnce(&mut Vec<R>) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| PersistenceError::Transport("fixture store poisoned".into()))?;
        f(&mut records)
    }
}

impl<R: Fixture> FixtureSource<R> {
    pub fn seeded(latency: Duration) -> Self {
        Self::new(R::fixtures(), latency)
    }
}

#[async_trait]
impl<R: Record> RemotePersistence<R> for FixtureSource<R> {
    async fn list_all(&self) -> Result<Vec<R>, PersistenceError> {
        self.simulate_latency().await;
        self.with_records(|records| Ok(records.clone()))
    }

    async fn create(&self, record: &R) -> Result<R, PersistenceError> {
        self.simulate_latency().await;

        let mut created = record.clone();
        created.set_id(uuid::Uuid::new_v4().to_string());

        self.with_records(|records| {
            records.push(created.clone());
            Ok(created)
        })
    }

    async fn update(&self, id: &str, record: &R) -> Result<R, PersistenceError> {
        self.simulate_latency().await;

        self.with_records(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;

            let mut updated = record.clone();
            updated.set_id(id.to_string());
            *slot = updated.clone();
            Ok(updated)
        })
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        self.simulate_latency().await;

        self.with_records(|records| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            if records.len() == before {
                return Err(PersistenceError::NotFound(id.to_string()));
            }
            Ok(())
        })
    }
}

fn schedule(id: &str, date: &str, title: &str, location: &str, details: &str) -> Option<ScheduleRecord> {
    Some(ScheduleRecord {
        id: id.to_string(),
        date: EventDate::parse(date).ok()?,
        title: title.to_string(),
        location: Some(location.to_string()),
        details: Some(details.to_string()),
        image_url: None,
    })
}

fn video(id: &str, title: &str, video_ref: &str, order: i64) -> Option<VideoRecord> {
    Some(VideoRecord {
        id: id.to_string(),
        title: title.to_string(),
        video_ref: VideoRef::parse(video_ref)?,
        order,
    })
}

impl Fixture for ScheduleRecord {
    fn fixtures() -> Vec<Self> {
        [
            schedule(
                "1",
                "2025-12-24",
                "Christmas Concert",
                "Tokyo Opera City",
                "A special night with classical masterpieces.",
            ),
            schedule(
                "2",
                "2026-01-15",
                "New Year Recital",
                "Suntory Hall, Blue Rose",
                "Piano solo recital featuring Chopin and Liszt.",
            ),
            schedule(
                "3",
                "2026-03-03",
                "Spring Gala",
                "Yokohama Minato Mirai Hall",
                "Guest appearance with the Yokohama Symphony Orchestra.",
            ),
            schedule(
                "4",
                "2025-10-10",
                "Autumn Charity Event",
                "Kyoto Concert Hall",
                "Charity concert for music education.",
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Fixture for VideoRecord {
    fn fixtures() -> Vec<Self> {
        [
            video("1", "Rachmaninoff Piano Concerto No.2", "VyNNztb1Irk", 1),
            video("2", "Chopin Ballade No.1", "hOwu3BFWlRo", 2),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ScheduleDraft;

    #[test]
    fn test_fixtures_are_valid() {
        assert_eq!(ScheduleRecord::fixtures().len(), 4);
        assert_eq!(VideoRecord::fixtures().len(), 2);
    }

    #[tokio::test]
    async fn test_create_assigns_new_id() {
        let source = FixtureSource::<ScheduleRecord>::new(Vec::new(), Duration::ZERO);
        let draft = ScheduleDraft::new("2026-05-01", "Recital");
        let local = ScheduleRecord::from_draft("provisional".into(), &draft).unwrap();

        let created = source.create(&local).await.expect("Should create");

        assert_ne!(created.id, "provisional");
        assert_eq!(source.snapshot(), vec![created]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let source = FixtureSource::<VideoRecord>::seeded(Duration::ZERO);
        let record = source.snapshot()[0].clone();

        assert_eq!(
            source.update("missing", &record).await,
            Err(PersistenceError::NotFound("missing".into()))
        );
        assert_eq!(
            source.delete("missing").await,
            Err(PersistenceError::NotFound("missing".into()))
        );
        assert!(source.delete("1").await.is_ok());
        assert_eq!(source.snapshot().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let source = FixtureSource::<VideoRecord>::seeded(Duration::from_millis(800));
        let started = tokio::time::Instant::now();

        let records = source.list_all().await.expect("Should list");

        assert_eq!(records.len(), 2);
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
