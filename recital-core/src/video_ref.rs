//! YouTube video identifiers.
//!
//! Admins paste whatever link they have at hand (short links, embed links,
//! watch URLs with extra query parameters). Only the 11-character video id is
//! ever stored.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of every YouTube video id.
pub const VIDEO_REF_LEN: usize = 11;

static URL_SHAPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("video url pattern is valid")
});

/// A validated YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoRef(String);

impl VideoRef {
    /// Accept a bare id. Use [`normalize_video_ref`] for URLs.
    pub fn parse(id: &str) -> Option<Self> {
        is_valid_id(id).then(|| VideoRef(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn share_url(&self) -> String {
        format!("https://youtu.be/{}", self.0)
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.0)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/default.jpg", self.0)
    }
}

impl TryFrom<String> for VideoRef {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        VideoRef::parse(&value).ok_or(ValidationError::InvalidVideoUrl(value))
    }
}

impl From<VideoRef> for String {
    fn from(video_ref: VideoRef) -> Self {
        video_ref.0
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_id(id: &str) -> bool {
    id.len() == VIDEO_REF_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Extract the video id from a YouTube URL.
///
/// Recognizes `youtu.be/<id>`, `/embed/<id>`, `/v/<id>`, `watch?v=<id>` and
/// `&v=<id>`. Returns `None` when nothing matches or the candidate is not a
/// well-formed 11-character id.
pub fn normalize_video_ref(input: &str) -> Option<VideoRef> {
    let captures = URL_SHAPES.captures(input.trim())?;
    let candidate = captures.get(2)?.as_str();
    VideoRef::parse(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(url: &str) -> Option<String> {
        normalize_video_ref(url).map(String::from)
    }

    #[test]
    fn test_short_link() {
        assert_eq!(
            id_of("https://youtu.be/VyNNztb1Irk").as_deref(),
            Some("VyNNztb1Irk")
        );
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            id_of("https://www.youtube.com/watch?v=hOwu3BFWlRo").as_deref(),
            Some("hOwu3BFWlRo")
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            id_of("https://www.youtube.com/watch?v=hOwu3BFWlRo&t=42s").as_deref(),
            Some("hOwu3BFWlRo")
        );
        assert_eq!(
            id_of("https://www.youtube.com/watch?feature=share&v=hOwu3BFWlRo").as_deref(),
            Some("hOwu3BFWlRo")
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            id_of("https://www.youtube.com/embed/VyNNztb1Irk?autoplay=1").as_deref(),
            Some("VyNNztb1Irk")
        );
    }

    #[test]
    fn test_rejects_non_urls() {
        assert_eq!(id_of("not a url"), None);
        assert_eq!(id_of(""), None);
        assert_eq!(id_of("https://vimeo.com/123456"), None);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(id_of("https://youtu.be/short"), None);
        assert_eq!(id_of("https://youtu.be/VyNNztb1IrkX"), None);
    }

    #[test]
    fn test_derived_urls() {
        let video_ref = VideoRef::parse("VyNNztb1Irk").expect("Should parse");
        assert_eq!(video_ref.share_url(), "https://youtu.be/VyNNztb1Irk");
        assert_eq!(
            video_ref.thumbnail_url(),
            "https://img.youtube.com/vi/VyNNztb1Irk/default.jpg"
        );
        assert_eq!(
            normalize_video_ref(&video_ref.share_url()),
            Some(video_ref)
        );
    }
}
