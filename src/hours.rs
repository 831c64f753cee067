use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily opening window in the calendar's local time.
///
/// The window is half-open: a timestamp exactly at `close_hour` is already
/// after hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open_hour: u32,
    pub close_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHours {
    open_hour: u32,
    close_hour: u32,
}

impl fmt::Display for InvalidHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid business hours [{}, {}): open must come before close and close at most 24",
            self.open_hour, self.close_hour
        )
    }
}

impl std::error::Error for InvalidHours {}

impl BusinessHours {
    pub fn new(open_hour: u32, close_hour: u32) -> Result<Self, InvalidHours> {
        let hours = Self {
            open_hour,
            close_hour,
        };
        hours.validate()?;
        Ok(hours)
    }

    /// Re-check the window, for values that arrived through deserialization.
    pub fn validate(&self) -> Result<(), InvalidHours> {
        if self.open_hour >= self.close_hour || self.close_hour > 24 {
            return Err(InvalidHours {
                open_hour: self.open_hour,
                close_hour: self.close_hour,
            });
        }
        Ok(())
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= self.open_hour && hour < self.close_hour
    }

    pub fn opening_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.open_hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}
