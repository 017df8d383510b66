//! Core types for recital.
//!
//! This crate provides everything the admin tools and the API server share:
//! - `record`: schedule and video records and their drafts
//! - `collection`: the admin panel's optimistic working copy of a content type
//! - `remote`: the persistence contract with fixture and HTTP implementations
//! - `asset`: image uploads for schedule entries

pub mod asset;
pub mod collection;
pub mod config;
pub mod contact;
pub mod error;
pub mod partition;
pub mod record;
pub mod remote;
pub mod video_ref;

pub use collection::{ManagedCollection, SyncReport, SyncState};
pub use error::{
    CollectionError, NotFoundError, PersistenceError, RecitalError, RecitalResult, UploadError,
    ValidationError,
};
pub use record::{EventDate, Record, ScheduleDraft, ScheduleRecord, VideoDraft, VideoRecord};
pub use video_ref::{VideoRef, normalize_video_ref};
