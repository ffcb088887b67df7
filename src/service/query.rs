//! List query assembly
//!
//! Turns the caller-facing [`ListQuery`] into the storage-level
//! [`TicketPredicate`] and [`Page`]. Calendar days are interpreted in a
//! caller-supplied time zone; "the next day" is always the next calendar
//! date, so a day window is 23 or 25 hours long across DST changes.

use crate::core::Status;
use crate::error::{Result, TicketDeskError};
use crate::storage::{Page, TicketPredicate};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

/// Page size used when the caller does not give one
pub const DEFAULT_LIMIT: usize = 10;

/// Creation-date filter of a list query
///
/// `Day` and `Range` are exclusive by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    /// No date restriction
    #[default]
    Any,
    /// Tickets created on this calendar day
    Day(NaiveDate),
    /// Tickets created on or after `start` and on or before `end` (whole days)
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

/// Parameters of the ticket list operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: usize,
    pub offset: usize,
    pub dates: DateFilter,
    pub status: Option<Status>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            dates: DateFilter::Any,
            status: None,
        }
    }
}

impl ListQuery {
    /// Slice of the ordered result to return
    #[must_use]
    pub const fn page(&self) -> Page {
        Page {
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Maps the query to a storage predicate, reading dates in `tz`
    pub fn predicate_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<TicketPredicate> {
        let (created_from, created_before) = match self.dates {
            DateFilter::Any => (None, None),
            DateFilter::Day(day) => (
                Some(start_of_day(day, tz)?),
                Some(start_of_day(next_day(day)?, tz)?),
            ),
            DateFilter::Range { start, end } => (
                start.map(|day| start_of_day(day, tz)).transpose()?,
                end.map(|day| next_day(day).and_then(|next| start_of_day(next, tz)))
                    .transpose()?,
            ),
        };

        Ok(TicketPredicate {
            created_from,
            created_before,
            status: self.status,
        })
    }
}

fn next_day(day: NaiveDate) -> Result<NaiveDate> {
    day.succ_opt()
        .ok_or_else(|| TicketDeskError::validation(format!("Date {day} is out of range")))
}

/// First instant of `day` in `tz`
///
/// When local midnight falls into a DST gap, the first local time after it
/// that exists is used instead.
fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>> {
    let midnight = day.and_time(NaiveTime::MIN);
    std::iter::successors(Some(midnight), |t: &NaiveDateTime| {
        t.checked_add_signed(TimeDelta::minutes(15))
    })
    .take(4 * 24)
    .find_map(|local| tz.from_local_datetime(&local).earliest())
    .map(|start| start.with_timezone(&Utc))
    .ok_or_else(|| TicketDeskError::validation(format!("Date {day} has no start in local time")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_default_query() {
        let query = ListQuery::default();

        assert_eq!(
            query.page(),
            Page {
                limit: 10,
                offset: 0
            }
        );
        assert_eq!(query.predicate_in(&Utc).unwrap(), TicketPredicate::default());
    }

    #[test]
    fn test_single_day_window() {
        let query = ListQuery {
            dates: DateFilter::Day(date(2024, 1, 31)),
            ..ListQuery::default()
        };

        let predicate = query.predicate_in(&Utc).unwrap();
        assert_eq!(predicate.created_from, Some(utc(2024, 1, 31, 0)));
        assert_eq!(predicate.created_before, Some(utc(2024, 2, 1, 0)));
    }

    #[test]
    fn test_day_window_follows_local_offset() {
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        let query = ListQuery {
            dates: DateFilter::Day(date(2024, 12, 31)),
            ..ListQuery::default()
        };

        let predicate = query.predicate_in(&moscow).unwrap();
        assert_eq!(predicate.created_from, Some(utc(2024, 12, 30, 21)));
        assert_eq!(predicate.created_before, Some(utc(2024, 12, 31, 21)));
    }

    #[test]
    fn test_range_end_is_inclusive_of_whole_day() {
        let query = ListQuery {
            dates: DateFilter::Range {
                start: Some(date(2024, 2, 27)),
                end: Some(date(2024, 2, 29)),
            },
            status: Some(Status::InProgress),
            ..ListQuery::default()
        };

        let predicate = query.predicate_in(&Utc).unwrap();
        assert_eq!(predicate.created_from, Some(utc(2024, 2, 27, 0)));
        assert_eq!(predicate.created_before, Some(utc(2024, 3, 1, 0)));
        assert_eq!(predicate.status, Some(Status::InProgress));
    }

    #[test]
    fn test_open_ended_ranges() {
        let only_start = ListQuery {
            dates: DateFilter::Range {
                start: Some(date(2024, 6, 1)),
                end: None,
            },
            ..ListQuery::default()
        }
        .predicate_in(&Utc)
        .unwrap();
        assert_eq!(only_start.created_from, Some(utc(2024, 6, 1, 0)));
        assert!(only_start.created_before.is_none());

        let only_end = ListQuery {
            dates: DateFilter::Range {
                start: None,
                end: Some(date(2024, 6, 1)),
            },
            ..ListQuery::default()
        }
        .predicate_in(&Utc)
        .unwrap();
        assert!(only_end.created_from.is_none());
        assert_eq!(only_end.created_before, Some(utc(2024, 6, 2, 0)));
    }

    #[test]
    fn test_day_starting_in_dst_gap_uses_first_valid_instant() {
        // Midnight did not exist in Sao Paulo on 2018-11-04; clocks jumped to 01:00
        let predicate = ListQuery {
            dates: DateFilter::Day(date(2018, 11, 4)),
            ..ListQuery::default()
        }
        .predicate_in(&chrono_tz::America::Sao_Paulo)
        .unwrap();

        assert_eq!(predicate.created_from, Some(utc(2018, 11, 4, 3)));
        assert_eq!(predicate.created_before, Some(utc(2018, 11, 5, 2)));
    }

    #[test]
    fn test_day_windows_follow_dst_changes() {
        let spring_forward = ListQuery {
            dates: DateFilter::Day(date(2024, 3, 10)),
            ..ListQuery::default()
        }
        .predicate_in(&chrono_tz::America::New_York)
        .unwrap();
        let (Some(from), Some(before)) =
            (spring_forward.created_from, spring_forward.created_before)
        else {
            panic!("day filter must be bounded");
        };
        assert_eq!(before - from, TimeDelta::hours(23));

        let fall_back = ListQuery {
            dates: DateFilter::Day(date(2024, 11, 3)),
            ..ListQuery::default()
        }
        .predicate_in(&chrono_tz::America::New_York)
        .unwrap();
        let (Some(from), Some(before)) = (fall_back.created_from, fall_back.created_before)
        else {
            panic!("day filter must be bounded");
        };
        assert_eq!(before - from, TimeDelta::hours(25));
    }

    #[test]
    fn test_range_end_before_fall_back() {
        let predicate = ListQuery {
            dates: DateFilter::Range {
                start: None,
                end: Some(date(2024, 11, 2)),
            },
            ..ListQuery::default()
        }
        .predicate_in(&chrono_tz::America::New_York)
        .unwrap();

        assert_eq!(predicate.created_before, Some(utc(2024, 11, 3, 4)));
    }

    #[test]
    fn test_last_representable_day_is_rejected() {
        let query = ListQuery {
            dates: DateFilter::Day(NaiveDate::MAX),
            ..ListQuery::default()
        };

        let err = query.predicate_in(&Utc).unwrap_err();
        assert!(matches!(err, TicketDeskError::Validation(_)));
    }
}
