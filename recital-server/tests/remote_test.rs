//! The admin collection and asset uploads against a live server.

use std::sync::Arc;
use std::time::Duration;

use recital_core::asset::{HttpAssetStore, ImageUpload};
use recital_core::remote::{HttpRemote, RemotePersistence};
use recital_core::{
    EventDate, ManagedCollection, PersistenceError, ScheduleDraft, ScheduleRecord, SyncReport,
    SyncState, VideoDraft, VideoRecord, VideoRef,
};

mod common;

use common::spawn_server;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_collection_round_trip_through_server() {
    let base_url = spawn_server().await;
    let remote: Arc<dyn RemotePersistence<ScheduleRecord>> =
        Arc::new(HttpRemote::new(&base_url, TIMEOUT));

    let mut schedules = ManagedCollection::init(remote.clone()).await.unwrap();
    assert!(schedules.is_empty());

    let created = schedules
        .create(&ScheduleDraft::new("2026-03-03", "Spring Gala"))
        .unwrap();

    let reports = schedules.settle().await;
    let durable = match &reports[..] {
        [SyncReport::Created { provisional, id }] => {
            assert_eq!(provisional, &created.id);
            id.clone()
        }
        other => panic!("unexpected reports: {other:?}"),
    };

    let entry = schedules.get(&durable).unwrap();
    assert_eq!(entry.state, SyncState::Confirmed);

    let mut draft = ScheduleDraft::new("2026-03-03", "Spring Gala");
    draft.location = "Tokyo Opera City".into();
    schedules.update(&durable, &draft).unwrap();
    schedules.settle().await;

    let stored = remote.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, durable);
    assert_eq!(stored[0].location.as_deref(), Some("Tokyo Opera City"));

    schedules.delete(&durable).unwrap();
    schedules.settle().await;
    assert!(remote.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_http_remote_not_found() {
    let base_url = spawn_server().await;
    let remote = HttpRemote::<VideoRecord>::new(&base_url, TIMEOUT);

    let record = VideoRecord {
        id: "missing".into(),
        title: "Rachmaninoff: Piano Concerto No.2".into(),
        video_ref: VideoRef::parse("VyNNztb1Irk").unwrap(),
        order: 1,
    };

    assert_eq!(
        remote.update("missing", &record).await,
        Err(PersistenceError::NotFound("missing".into()))
    );
    assert_eq!(
        remote.delete("missing").await,
        Err(PersistenceError::NotFound("missing".into()))
    );
}

#[tokio::test]
async fn test_http_remote_surfaces_validation_message() {
    let base_url = spawn_server().await;
    let remote = HttpRemote::<ScheduleRecord>::new(&base_url, TIMEOUT);

    let record = ScheduleRecord {
        id: "local".into(),
        date: EventDate::parse("2026-01-15").unwrap(),
        title: " ".into(),
        location: None,
        details: None,
        image_url: None,
    };

    match remote.create(&record).await {
        Err(PersistenceError::Service { status, .. }) => assert_eq!(status, 400),
        other => panic!("expected a 400, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_fails_record() {
    // Nothing listens on the discard port
    let remote: Arc<dyn RemotePersistence<VideoRecord>> =
        Arc::new(HttpRemote::new("http://127.0.0.1:9", TIMEOUT));

    assert!(ManagedCollection::init(remote).await.is_err());
}

#[tokio::test]
async fn test_attach_image_uploads_to_server() {
    let base_url = spawn_server().await;
    let store = HttpAssetStore::new(&base_url, TIMEOUT);

    let image = ImageUpload {
        bytes: b"GIF89a".to_vec(),
        file_name: "gala poster.gif".into(),
    };

    let attachment = ScheduleDraft::new("2026-03-03", "Spring Gala")
        .attach_image(&store, image)
        .await
        .unwrap();

    assert!(attachment.warning.is_none());
    let image_url = attachment.draft.image_url.unwrap();
    assert!(image_url.starts_with("schedules/"));
    assert!(image_url.ends_with("-gala-poster.gif"));

    let fetched = reqwest::get(format!("{base_url}/assets/{image_url}"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(&fetched[..], b"GIF89a");
}

#[tokio::test]
async fn test_video_collection_against_server() {
    let base_url = spawn_server().await;
    let remote: Arc<dyn RemotePersistence<VideoRecord>> =
        Arc::new(HttpRemote::new(&base_url, TIMEOUT));

    let mut videos = ManagedCollection::init(remote.clone()).await.unwrap();
    videos
        .create(&VideoDraft::new(
            "Chopin: Ballade No.1",
            "https://www.youtube.com/watch?v=hOwu3BFWlRo",
            1,
        ))
        .unwrap();
    let reports = videos.settle().await;
    assert!(reports.iter().all(|r| !r.is_failure()));

    let stored = remote.list_all().await.unwrap();
    assert_eq!(stored[0].video_ref.as_str(), "hOwu3BFWlRo");
}
