//! Performance videos shown in the gallery.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::record::{Record, non_blank};
use crate::video_ref::{VideoRef, normalize_video_ref};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(alias = "youtubeId")]
    pub video_ref: VideoRef,
    #[serde(default)]
    pub order: i64,
}

/// Form contents for a video entry. `url` is whatever the admin pasted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDraft {
    pub title: String,
    pub url: String,
    pub order: i64,
}

impl VideoDraft {
    pub fn new(title: &str, url: &str, order: i64) -> Self {
        VideoDraft {
            title: title.to_string(),
            url: url.to_string(),
            order,
        }
    }
}

impl Record for VideoRecord {
    type Draft = VideoDraft;

    const KIND: &'static str = "videos";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn from_draft(id: String, draft: &VideoDraft) -> Result<Self, ValidationError> {
        let title = non_blank(&draft.title).ok_or(ValidationError::EmptyTitle)?;
        let video_ref = normalize_video_ref(&draft.url)
            .ok_or_else(|| ValidationError::InvalidVideoUrl(draft.url.clone()))?;

        Ok(VideoRecord {
            id,
            title,
            video_ref,
            order: draft.order,
        })
    }

    fn to_draft(&self) -> VideoDraft {
        VideoDraft {
            title: self.title.clone(),
            url: self.video_ref.share_url(),
            order: self.order,
        }
    }

    fn display_cmp(&self, other: &Self) -> Ordering {
        self.order.cmp(&other.order)
    }

    /// New videos go to the end of the gallery by default.
    fn blank_draft(existing: usize) -> VideoDraft {
        VideoDraft {
            order: existing as i64 + 1,
            ..Default::default()
        }
    }
}

impl fmt::Display for VideoRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_draft_stores_id_not_url() {
        let draft = VideoDraft::new(
            "Chopin Ballade No.1",
            "https://www.youtube.com/watch?v=hOwu3BFWlRo",
            2,
        );
        let record = VideoRecord::from_draft("v1".into(), &draft).expect("Should validate");

        assert_eq!(record.video_ref.as_str(), "hOwu3BFWlRo");
        let json = serde_json::to_value(&record).expect("Should serialize");
        assert_eq!(json["videoRef"], "hOwu3BFWlRo");
    }

    #[test]
    fn test_from_draft_rejects_bad_url() {
        let draft = VideoDraft::new("Chopin", "not a url", 1);
        assert_eq!(
            VideoRecord::from_draft("v1".into(), &draft),
            Err(ValidationError::InvalidVideoUrl("not a url".into()))
        );
    }

    #[test]
    fn test_title_checked_before_url() {
        let draft = VideoDraft::new("", "not a url", 1);
        assert_eq!(
            VideoRecord::from_draft("v1".into(), &draft),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn test_edit_draft_uses_share_url() {
        let draft = VideoDraft::new("Rachmaninoff", "https://youtu.be/VyNNztb1Irk", 1);
        let record = VideoRecord::from_draft("v1".into(), &draft).expect("Should validate");

        let edit = record.to_draft();
        assert_eq!(edit.url, "https://youtu.be/VyNNztb1Irk");
        assert_eq!(edit.order, 1);
    }

    #[test]
    fn test_blank_draft_appends_order() {
        assert_eq!(VideoRecord::blank_draft(2).order, 3);
    }

    #[test]
    fn test_deserialize_accepts_youtube_id_alias() {
        let json = r#"{"id": "1", "title": "Chopin", "youtubeId": "hOwu3BFWlRo", "order": 2}"#;
        let record: VideoRecord = serde_json::from_str(json).expect("Should parse");
        assert_eq!(record.video_ref.as_str(), "hOwu3BFWlRo");
    }
}
