use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::BusinessCalendar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    pub title: String,
    pub student: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(id: i32, title: impl Into<String>, requested_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            student: None,
            requested_at,
            scheduled_at: None,
            notes: None,
        }
    }

    /// Stamp the booking with the nearest valid business slot for its
    /// request time and return that slot.
    pub fn schedule_with(&mut self, calendar: &BusinessCalendar) -> DateTime<Utc> {
        let slot = calendar.next_business_period(self.requested_at);
        self.scheduled_at = Some(slot);
        slot
    }
}
