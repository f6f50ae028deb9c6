//! Shared query-parameter types for reporting endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use adpulse_core::types::{DbId, Timestamp};
use adpulse_core::windows::{trailing_days, DateRange, RangePreset};

use crate::error::AppError;

/// Default dashboard lookback when neither dates nor a preset are given.
const DEFAULT_TRAILING_DAYS: i64 = 30;

/// Date-range parameters accepted by the dashboard and campaign list.
///
/// Either explicit `from`/`to` (ISO dates, inclusive), a named `preset`
/// (`today`, `yesterday`, `7d`, `30d`, `90d`), or nothing -- which
/// defaults to yesterday back [`DEFAULT_TRAILING_DAYS`] days. All
/// presets are computed in the requested UTC offset.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub preset: Option<String>,
    /// Tenant timezone as minutes east of UTC. Defaults to 0 (UTC).
    pub tz_offset_minutes: Option<i32>,
    /// Narrow to the ad accounts linked to one client.
    pub client_id: Option<DbId>,
}

impl RangeQuery {
    pub fn tz_offset(&self) -> i32 {
        self.tz_offset_minutes.unwrap_or(0)
    }

    /// Resolve to an inclusive day range, validating at the boundary.
    pub fn resolve(&self, now: Timestamp) -> Result<DateRange, AppError> {
        let offset = self.tz_offset();
        if !(-16 * 60..=16 * 60).contains(&offset) {
            return Err(AppError::BadRequest(format!(
                "tz_offset_minutes out of range: {offset}"
            )));
        }

        match (self.from, self.to, self.preset.as_deref()) {
            (Some(from), Some(to), _) => {
                if from > to {
                    return Err(AppError::BadRequest(format!(
                        "from ({from}) must not be after to ({to})"
                    )));
                }
                Ok(DateRange { from, to })
            }
            (Some(_), None, _) | (None, Some(_), _) => Err(AppError::BadRequest(
                "from and to must be provided together".into(),
            )),
            (None, None, Some(preset)) => RangePreset::parse(preset)
                .map(|p| p.resolve(now, offset))
                .ok_or_else(|| AppError::BadRequest(format!("Unknown preset: {preset}"))),
            (None, None, None) => Ok(trailing_days(DEFAULT_TRAILING_DAYS, now, offset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn explicit_range_wins_over_preset() {
        let q = RangeQuery {
            from: NaiveDate::from_ymd_opt(2025, 5, 1),
            to: NaiveDate::from_ymd_opt(2025, 5, 10),
            preset: Some("7d".into()),
            ..Default::default()
        };
        let range = q.resolve(now()).unwrap();
        assert_eq!(range.days(), 10);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let q = RangeQuery {
            from: NaiveDate::from_ymd_opt(2025, 5, 10),
            to: NaiveDate::from_ymd_opt(2025, 5, 1),
            ..Default::default()
        };
        assert!(q.resolve(now()).is_err());
    }

    #[test]
    fn default_is_trailing_thirty_days_ending_yesterday() {
        let range = RangeQuery::default().resolve(now()).unwrap();
        assert_eq!(range.days(), 30);
        assert_eq!(range.to, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let q = RangeQuery {
            preset: Some("fortnight".into()),
            ..Default::default()
        };
        assert!(q.resolve(now()).is_err());
    }

    #[test]
    fn absurd_offset_is_rejected() {
        let q = RangeQuery {
            tz_offset_minutes: Some(100_000),
            ..Default::default()
        };
        assert!(q.resolve(now()).is_err());
    }
}
