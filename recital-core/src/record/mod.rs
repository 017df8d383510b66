//! Record types managed by the admin panel.
//!
//! Both content types implement [`Record`], which is what lets a single
//! [`ManagedCollection`](crate::collection::ManagedCollection) and a single
//! [`RemotePersistence`](crate::remote::RemotePersistence) contract serve
//! schedules and videos alike.

mod schedule;
mod video;

pub use schedule::{EventDate, ScheduleDraft, ScheduleRecord};
pub use video::{VideoDraft, VideoRecord};

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ValidationError;

pub trait Record:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Form contents used to create or edit a record.
    type Draft: Clone + fmt::Debug + Default + Send;

    /// Path segment of this content type in the HTTP API (e.g. `schedules`).
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Validate a draft and build a record with the given id.
    fn from_draft(id: String, draft: &Self::Draft) -> Result<Self, ValidationError>;

    /// Prefill a draft for editing this record.
    fn to_draft(&self) -> Self::Draft;

    /// Natural display order of the content type.
    fn display_cmp(&self, other: &Self) -> Ordering;

    /// Draft shown when opening an empty create form.
    fn blank_draft(_existing: usize) -> Self::Draft {
        Self::Draft::default()
    }

    /// Validate a draft without building a record.
    fn validate(draft: &Self::Draft) -> Result<(), ValidationError> {
        Self::from_draft(String::new(), draft).map(|_| ())
    }
}

/// Returns `None` for empty or whitespace-only input, the trimmed text otherwise.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
