//! Budget periods
//!
//! The screen always shows one inclusive date range. Its length follows the
//! user's preferred period kind, and the header steps it backwards and
//! forwards one period at a time.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget period preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Weekly,
    #[serde(alias = "bi-weekly")]
    BiWeekly,
    #[default]
    Monthly,
}

impl PeriodKind {
    /// The kind that follows this one when cycling through them
    pub fn cycle(self) -> Self {
        match self {
            Self::Weekly => Self::BiWeekly,
            Self::BiWeekly => Self::Monthly,
            Self::Monthly => Self::Weekly,
        }
    }

    /// Parse a kind from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Some(Self::BiWeekly),
            "monthly" | "month" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::BiWeekly => write!(f, "Bi-weekly"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}

/// An inclusive range of dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range; the bounds are swapped if given in reverse
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// The period of the given kind that contains `date`
    pub fn containing(kind: PeriodKind, date: NaiveDate, week_start: Weekday) -> Self {
        match kind {
            PeriodKind::Monthly => Self::month_of(date),
            PeriodKind::Weekly => {
                let start = start_of_week(date, week_start);
                Self::new(start, start + Duration::days(6))
            }
            PeriodKind::BiWeekly => {
                let start = start_of_week(date, week_start);
                Self::new(start, start + Duration::days(13))
            }
        }
    }

    /// Re-anchor on this range's start date with a different kind
    pub fn with_kind(&self, kind: PeriodKind, week_start: Weekday) -> Self {
        Self::containing(kind, self.start, week_start)
    }

    fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .map(|next| next - Duration::days(1))
            .unwrap_or(start);
        Self::new(start, end)
    }

    /// The period before this one
    pub fn previous(&self, kind: PeriodKind) -> Self {
        match kind {
            PeriodKind::Monthly => {
                let anchor = self
                    .start
                    .with_day(1)
                    .and_then(|first| first.checked_sub_months(Months::new(1)))
                    .unwrap_or(self.start);
                Self::month_of(anchor)
            }
            PeriodKind::Weekly | PeriodKind::BiWeekly => {
                let length = self.days();
                Self::new(
                    self.start - Duration::days(length),
                    self.end - Duration::days(length),
                )
            }
        }
    }

    /// The period after this one
    pub fn next(&self, kind: PeriodKind) -> Self {
        match kind {
            PeriodKind::Monthly => {
                let anchor = self
                    .start
                    .with_day(1)
                    .and_then(|first| first.checked_add_months(Months::new(1)))
                    .unwrap_or(self.start);
                Self::month_of(anchor)
            }
            PeriodKind::Weekly | PeriodKind::BiWeekly => {
                let length = self.days();
                Self::new(
                    self.start + Duration::days(length),
                    self.end + Duration::days(length),
                )
            }
        }
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether the whole range lies before `today`
    pub fn ended_before(&self, today: NaiveDate) -> bool {
        self.end < today
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() as i64
        - week_start.num_days_from_monday() as i64)
        % 7;
    date - Duration::days(offset)
}
