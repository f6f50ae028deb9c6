//! Reporting date windows.
//!
//! Dashboards report on day-granularity windows in the tenant's local
//! time, expressed as a UTC offset in minutes. Multi-day presets are
//! anchored to the end of yesterday so a partially elapsed today never
//! drags averages down.

use chrono::{Datelike, FixedOffset, NaiveDate};

use crate::types::Timestamp;

/// Inclusive day range in tenant-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Number of days covered, inclusive.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Named reporting presets accepted by the dashboard and campaign list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Today,
    Yesterday,
    Last7d,
    Last30d,
    Last90d,
}

impl RangePreset {
    /// Parse the query-parameter spelling of a preset.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(RangePreset::Today),
            "yesterday" => Some(RangePreset::Yesterday),
            "7d" => Some(RangePreset::Last7d),
            "30d" => Some(RangePreset::Last30d),
            "90d" => Some(RangePreset::Last90d),
            _ => None,
        }
    }

    /// Resolve the preset into an inclusive local-day range.
    pub fn resolve(self, now: Timestamp, tz_offset_minutes: i32) -> DateRange {
        let today = local_date(now, tz_offset_minutes);
        let yesterday = today.pred_opt().unwrap_or(today);

        match self {
            RangePreset::Today => DateRange {
                from: today,
                to: today,
            },
            RangePreset::Yesterday => DateRange {
                from: yesterday,
                to: yesterday,
            },
            RangePreset::Last7d => trailing(yesterday, 7),
            RangePreset::Last30d => trailing(yesterday, 30),
            RangePreset::Last90d => trailing(yesterday, 90),
        }
    }
}

/// Default dashboard window: yesterday back `days` days.
pub fn trailing_days(days: i64, now: Timestamp, tz_offset_minutes: i32) -> DateRange {
    let today = local_date(now, tz_offset_minutes);
    let yesterday = today.pred_opt().unwrap_or(today);
    trailing(yesterday, days)
}

/// Calendar-month-to-date window ending today, used for the trailing
/// month spend shown on account highlights.
pub fn month_to_date(now: Timestamp, tz_offset_minutes: i32) -> DateRange {
    let today = local_date(now, tz_offset_minutes);
    let first = today.with_day(1).unwrap_or(today);
    DateRange {
        from: first,
        to: today,
    }
}

/// Today's date in the tenant's local time.
///
/// Invalid offsets fall back to UTC rather than erroring; the boundary
/// validates user input, this is the last line of defense for stored
/// values.
pub fn local_date(now: Timestamp, tz_offset_minutes: i32) -> NaiveDate {
    match FixedOffset::east_opt(tz_offset_minutes * 60) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

fn trailing(anchor: NaiveDate, days: i64) -> DateRange {
    DateRange {
        from: anchor - chrono::Duration::days(days - 1),
        to: anchor,
    }
}
