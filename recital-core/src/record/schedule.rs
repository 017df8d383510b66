//! Concert schedule entries.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::record::{Record, non_blank};

/// A calendar date stored as a fixed-width `YYYY-MM-DD` string.
///
/// Ordering is plain string ordering, which matches chronological order only
/// because every value is validated to that exact shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventDate(String);

impl EventDate {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::EmptyDate);
        }

        let fixed_width = s.len() == 10
            && s.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });

        if !fixed_width || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
            return Err(ValidationError::InvalidDate(s.to_string()));
        }

        Ok(EventDate(s.to_string()))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        EventDate(date.format("%Y-%m-%d").to_string())
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self::from_naive(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_naive(&self) -> NaiveDate {
        // Shape was checked in `parse`
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").unwrap_or_default()
    }
}

impl TryFrom<String> for EventDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EventDate::parse(&value)
    }
}

impl From<EventDate> for String {
    fn from(date: EventDate) -> Self {
        date.0
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One concert or event on the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: String,
    pub date: EventDate,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Form contents for a schedule entry. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleDraft {
    pub date: String,
    pub title: String,
    pub location: String,
    pub details: String,
    pub image_url: Option<String>,
}

impl ScheduleDraft {
    pub fn new(date: &str, title: &str) -> Self {
        ScheduleDraft {
            date: date.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }
}

impl Record for ScheduleRecord {
    type Draft = ScheduleDraft;

    const KIND: &'static str = "schedules";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn from_draft(id: String, draft: &ScheduleDraft) -> Result<Self, ValidationError> {
        let title = non_blank(&draft.title).ok_or(ValidationError::EmptyTitle)?;
        let date = EventDate::parse(&draft.date)?;

        Ok(ScheduleRecord {
            id,
            date,
            title,
            location: non_blank(&draft.location),
            details: non_blank(&draft.details),
            image_url: draft.image_url.as_deref().and_then(non_blank),
        })
    }

    fn to_draft(&self) -> ScheduleDraft {
        ScheduleDraft {
            date: self.date.to_string(),
            title: self.title.clone(),
            location: self.location.clone().unwrap_or_default(),
            details: self.details.clone().unwrap_or_default(),
            image_url: self.image_url.clone(),
        }
    }

    fn display_cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl fmt::Display for ScheduleRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_date_accepts_fixed_width_only() {
        assert!(EventDate::parse("2025-12-24").is_ok());
        assert_eq!(EventDate::parse(""), Err(ValidationError::EmptyDate));
        assert!(matches!(
            EventDate::parse("2025-1-5"),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(matches!(
            EventDate::parse("24/12/2025"),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(matches!(
            EventDate::parse("2025-02-30"),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_from_draft_requires_title_and_date() {
        let draft = ScheduleDraft::new("2025-12-24", "   ");
        assert_eq!(
            ScheduleRecord::from_draft("x".into(), &draft),
            Err(ValidationError::EmptyTitle)
        );

        let draft = ScheduleDraft::new("", "Recital");
        assert_eq!(
            ScheduleRecord::from_draft("x".into(), &draft),
            Err(ValidationError::EmptyDate)
        );
    }

    #[test]
    fn test_optional_fields_stay_absent() {
        let draft = ScheduleDraft::new("2025-12-24", "Christmas Concert");
        let record = ScheduleRecord::from_draft("1".into(), &draft).expect("Should validate");

        assert_eq!(record.location, None);
        assert_eq!(record.details, None);
        assert_eq!(record.image_url, None);
    }

    #[test]
    fn test_deserialize_accepts_description_alias() {
        let json = r#"{
            "id": "abc",
            "date": "2026-01-15",
            "title": "New Year Recital",
            "location": "Suntory Hall, Blue Rose",
            "description": "Piano solo recital featuring Chopin and Liszt."
        }"#;

        let record: ScheduleRecord = serde_json::from_str(json).expect("Should parse");
        assert_eq!(
            record.details.as_deref(),
            Some("Piano solo recital featuring Chopin and Liszt.")
        );
        assert_eq!(record.image_url, None);
    }

    #[test]
    fn test_deserialize_rejects_malformed_date() {
        let json = r#"{"id": "abc", "date": "Dec 24", "title": "Concert"}"#;
        assert!(serde_json::from_str::<ScheduleRecord>(json).is_err());
    }
}
