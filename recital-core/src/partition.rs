//! Splitting the schedule into upcoming and past events.

use crate::record::{EventDate, ScheduleRecord};

/// Schedule split around a reference day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Events on or after the reference day, soonest first.
    pub upcoming: Vec<ScheduleRecord>,
    /// Events before the reference day, most recent first.
    pub archive: Vec<ScheduleRecord>,
}

/// Partition `records` around `today`. Events dated today count as upcoming.
pub fn partition<'a, I>(today: &EventDate, records: I) -> Partition
where
    I: IntoIterator<Item = &'a ScheduleRecord>,
{
    let (mut upcoming, mut archive): (Vec<_>, Vec<_>) = records
        .into_iter()
        .cloned()
        .partition(|r| r.date >= *today);

    upcoming.sort_by(|a, b| a.date.cmp(&b.date));
    archive.sort_by(|a, b| b.date.cmp(&a.date));

    Partition { upcoming, archive }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, ScheduleDraft};

    fn record(id: &str, date: &str) -> ScheduleRecord {
        ScheduleRecord::from_draft(id.into(), &ScheduleDraft::new(date, "Concert"))
            .expect("Should validate")
    }

    fn dates(records: &[ScheduleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.date.as_str()).collect()
    }

    #[test]
    fn test_partition_around_today() {
        let today = EventDate::parse("2025-06-01").unwrap();
        let records = vec![record("a", "2025-12-24"), record("b", "2025-01-01")];

        let split = partition(&today, &records);

        assert_eq!(dates(&split.upcoming), vec!["2025-12-24"]);
        assert_eq!(dates(&split.archive), vec!["2025-01-01"]);
    }

    #[test]
    fn test_today_is_upcoming() {
        let today = EventDate::parse("2025-06-01").unwrap();
        let records = vec![record("a", "2025-06-01")];

        let split = partition(&today, &records);

        assert_eq!(dates(&split.upcoming), vec!["2025-06-01"]);
        assert!(split.archive.is_empty());
    }

    #[test]
    fn test_sort_directions() {
        let today = EventDate::parse("2025-11-01").unwrap();
        let records = vec![
            record("1", "2025-12-24"),
            record("2", "2026-01-15"),
            record("3", "2026-03-03"),
            record("4", "2025-10-10"),
            record("5", "2025-03-01"),
            record("6", "2025-11-30"),
        ];

        let split = partition(&today, &records);

        assert_eq!(
            dates(&split.upcoming),
            vec!["2025-11-30", "2025-12-24", "2026-01-15", "2026-03-03"]
        );
        assert_eq!(dates(&split.archive), vec!["2025-10-10", "2025-03-01"]);
    }
}
