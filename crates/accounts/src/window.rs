//! Leaderboard time windows.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Named interval a leaderboard is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeWindow {
    AllTime,
    CurrentMonth,
    CurrentWeek,
}

impl TimeWindow {
    /// Wire name of the window.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::AllTime => "allTime",
            TimeWindow::CurrentMonth => "currentMonth",
            TimeWindow::CurrentWeek => "currentWeek",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allTime" => Ok(TimeWindow::AllTime),
            "currentMonth" => Ok(TimeWindow::CurrentMonth),
            "currentWeek" => Ok(TimeWindow::CurrentWeek),
            other => Err(ValidationError::Unrecognized {
                field: "window".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Time zone whose calendar defines "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarZone {
    /// The host's zone, resolved at every call so DST changes are followed.
    Local,
    /// A named IANA zone.
    Named(Tz),
}

impl fmt::Display for CalendarZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarZone::Local => f.write_str("local"),
            CalendarZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Calendar settings that decide where "this month" and "this week" begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Zone of the local calendar.
    pub zone: CalendarZone,
    /// First day of the week.
    pub week_start: Weekday,
}

impl WindowConfig {
    pub fn new(zone: CalendarZone, week_start: Weekday) -> Self {
        Self { zone, week_start }
    }

    /// Inclusive lower bound of `window` as of `now`, or `None` for no bound.
    pub fn start(&self, window: TimeWindow, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.zone {
            CalendarZone::Local => self.start_in(&Local, window, now),
            CalendarZone::Named(tz) => self.start_in(&tz, window, now),
        }
    }

    fn start_in<Z: TimeZone>(
        &self,
        zone: &Z,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let today = now.with_timezone(zone).date_naive();

        let first_day = match window {
            TimeWindow::AllTime => return None,
            TimeWindow::CurrentMonth => today - Days::new(u64::from(today.day0())),
            TimeWindow::CurrentWeek => {
                let since_start = (7 + today.weekday().num_days_from_monday()
                    - self.week_start.num_days_from_monday())
                    % 7;
                today - Days::new(u64::from(since_start))
            }
        };

        Some(start_of_day(zone, first_day))
    }
}

impl Default for WindowConfig {
    /// Host time zone, weeks starting on the host locale's first weekday.
    fn default() -> Self {
        Self {
            zone: CalendarZone::Local,
            week_start: locale_week_start(),
        }
    }
}

/// First instant of `day` in `zone`.
///
/// Midnight is used unless a DST gap skips it, in which case the day starts
/// where the gap ends.
fn start_of_day<Z: TimeZone>(zone: &Z, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);

    // Gaps are at most an hour; try each half hour after midnight.
    for step in 0..=4 {
        let local = midnight + Duration::minutes(30 * step);
        if let Some(instant) = zone.from_local_datetime(&local).earliest() {
            return instant.with_timezone(&Utc);
        }
    }

    Utc.from_utc_datetime(&midnight)
}

/// First weekday of the host locale, Monday when it cannot be determined.
pub fn locale_week_start() -> Weekday {
    sys_locale::get_locale()
        .as_deref()
        .and_then(week_start_for_locale)
        .unwrap_or(Weekday::Mon)
}

/// First weekday customary in a locale such as `en-US` or `ar_EG.UTF-8`.
///
/// Returns `None` when the locale names no region.
pub fn week_start_for_locale(locale: &str) -> Option<Weekday> {
    let tag = locale.split(['.', '@']).next()?;
    let region = tag
        .split(['-', '_'])
        .skip(1)
        .find(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))?
        .to_ascii_uppercase();

    Some(week_start_for_region(&region))
}

fn week_start_for_region(region: &str) -> Weekday {
    const SUNDAY: &[&str] = &[
        "AG", "AS", "BD", "BR", "BS", "BT", "BW", "BZ", "CA", "CN", "CO", "DM", "DO", "ET", "GT",
        "GU", "HK", "HN", "ID", "IL", "IN", "JM", "JP", "KE", "KH", "KR", "LA", "MH", "MM", "MO",
        "MT", "MX", "MZ", "NI", "NP", "PA", "PE", "PH", "PK", "PR", "PT", "PY", "SA", "SG", "SV",
        "TH", "TT", "TW", "UM", "US", "VE", "VI", "WS", "YE", "ZA", "ZW",
    ];
    const SATURDAY: &[&str] = &[
        "AE", "AF", "BH", "DJ", "DZ", "EG", "IQ", "IR", "JO", "KW", "LY", "OM", "QA", "SD", "SY",
    ];

    if SUNDAY.contains(&region) {
        Weekday::Sun
    } else if SATURDAY.contains(&region) {
        Weekday::Sat
    } else if region == "MV" {
        Weekday::Fri
    } else {
        Weekday::Mon
    }
}
