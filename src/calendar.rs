use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::hours::BusinessHours;
use crate::metadata::DEFAULT_TIMEZONE;

/// Business-day calendar anchored to an explicit IANA time zone.
///
/// Every rule is evaluated on the wall-clock representation of a timestamp in
/// the configured zone. The UTC day is never consulted, so a Friday evening
/// that is already Saturday in UTC still counts as a weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessCalendar {
    timezone: Tz,
    hours: BusinessHours,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl BusinessCalendar {
    /// Create a calendar with the default [9, 18) opening window.
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            hours: BusinessHours::default(),
        }
    }

    pub fn with_hours(timezone: Tz, hours: BusinessHours) -> Self {
        Self { timezone, hours }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn hours(&self) -> BusinessHours {
        self.hours
    }

    fn local(&self, t: DateTime<Utc>) -> NaiveDateTime {
        t.with_timezone(&self.timezone).naive_local()
    }

    /// Map a local wall-clock time back to UTC. Ambiguous times (DST fold)
    /// take the earlier offset; nonexistent times (DST gap) are nudged
    /// forward until the wall time exists.
    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let mut candidate = local;
        loop {
            match self.timezone.from_local_datetime(&candidate) {
                LocalResult::Single(t) => return t.with_timezone(&Utc),
                LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
                LocalResult::None => candidate = candidate + Duration::hours(1),
            }
        }
    }

    /// True when the local calendar day is Saturday or Sunday.
    pub fn is_weekend_day(&self, t: DateTime<Utc>) -> bool {
        is_weekend(self.local(t).date())
    }

    pub fn is_sunday(&self, t: DateTime<Utc>) -> bool {
        self.local(t).weekday() == Weekday::Sun
    }

    /// Step the local calendar day forward until `days` non-weekend days have
    /// been taken, preserving the wall-clock time of day. Zero days is the
    /// identity.
    pub fn advance_business_days(&self, t: DateTime<Utc>, days: u32) -> DateTime<Utc> {
        if days == 0 {
            return t;
        }
        let local = self.local(t);
        let date = add_business_days(local.date(), days);
        self.resolve_local(date.and_time(local.time()))
    }

    /// Move a timestamp onto the nearest valid business slot.
    ///
    /// Before opening it is clamped forward to the opening time of the same
    /// local day; at or after closing it rolls to the opening time of the
    /// next business day. Timestamps already inside the window on a weekday
    /// come back unchanged. The result always lands on a weekday inside the
    /// window, which also makes the operation idempotent.
    pub fn adjust_to_business_hours(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let local = self.local(t);
        let opening = self.hours.opening_time();

        let mut adjusted = if local.hour() < self.hours.open_hour {
            local.date().and_time(opening)
        } else if local.hour() >= self.hours.close_hour {
            add_business_days(local.date(), 1).and_time(opening)
        } else if !is_weekend(local.date()) {
            return t;
        } else {
            local
        };

        // At most two steps: weekends are exactly two consecutive days.
        while is_weekend(adjusted.date()) {
            adjusted = adjusted + Duration::days(1);
        }
        self.resolve_local(adjusted)
    }

    /// Weekend timestamps jump to the opening time of the next weekday;
    /// weekday timestamps defer to `adjust_to_business_hours`.
    pub fn next_business_period(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        if !self.is_weekend_day(t) {
            return self.adjust_to_business_hours(t);
        }
        let mut date = self.local(t).date();
        while is_weekend(date) {
            date = date + Duration::days(1);
        }
        self.resolve_local(date.and_time(self.hours.opening_time()))
    }

    /// True on weekdays with the local hour inside the opening window.
    pub fn is_within_business_hours(&self, t: DateTime<Utc>) -> bool {
        let local = self.local(t);
        !is_weekend(local.date()) && self.hours.contains_hour(local.hour())
    }

    /// Count business days in the inclusive local-date range.
    pub fn business_days_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        let mut current = self.local(start).date();
        let end = self.local(end).date();
        let mut count = 0;
        while current <= end {
            if !is_weekend(current) {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        count
    }

    /// Hourly slot starts for the local day of `t`, empty on weekends.
    pub fn open_slots(&self, t: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let date = self.local(t).date();
        if is_weekend(date) {
            return Vec::new();
        }
        (self.hours.open_hour..self.hours.close_hour)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .map(|time| self.resolve_local(date.and_time(time)))
            .collect()
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every 7 calendar days contain at least 5 non-weekend days, so this always
/// terminates.
fn add_business_days(date: NaiveDate, days: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = days;
    while remaining > 0 {
        current = current + Duration::days(1);
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    current
}
