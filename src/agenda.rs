use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::calendar::BusinessCalendar;
use crate::metadata::AgendaMetadata;

pub struct Agenda {
    metadata: AgendaMetadata,
    bookings: Vec<Booking>,
    calendar: BusinessCalendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeSummary {
    pub total: usize,
    pub rescheduled: usize,
}

impl NormalizeSummary {
    pub fn to_cli_summary(&self) -> String {
        format!("{} bookings, {} rescheduled", self.total, self.rescheduled)
    }
}

impl Default for Agenda {
    fn default() -> Self {
        Self::new()
    }
}

impl Agenda {
    pub fn new() -> Self {
        Self::new_with_metadata(AgendaMetadata::default())
    }

    pub fn new_with_metadata(metadata: AgendaMetadata) -> Self {
        let calendar = Self::calendar_for_metadata(&metadata);
        Self {
            metadata,
            bookings: Vec::new(),
            calendar,
        }
    }

    fn calendar_for_metadata(metadata: &AgendaMetadata) -> BusinessCalendar {
        BusinessCalendar::with_hours(metadata.timezone, metadata.hours)
    }

    pub fn metadata(&self) -> &AgendaMetadata {
        &self.metadata
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn set_metadata(&mut self, metadata: AgendaMetadata) {
        self.calendar = Self::calendar_for_metadata(&metadata);
        self.metadata = metadata;
    }

    /// Insert the booking, or replace the stored one with the same id.
    pub fn upsert_booking(&mut self, booking: Booking) {
        match self.bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => *existing = booking,
            None => self.bookings.push(booking),
        }
    }

    pub fn find_booking(&self, id: i32) -> Option<Booking> {
        self.bookings.iter().find(|b| b.id == id).cloned()
    }

    pub fn delete_booking(&mut self, id: i32) -> bool {
        let before = self.bookings.len();
        self.bookings.retain(|b| b.id != id);
        self.bookings.len() != before
    }

    /// Stamp every booking with the nearest valid business slot for its
    /// request time.
    pub fn normalize(&mut self) -> NormalizeSummary {
        let mut rescheduled = 0;
        for booking in &mut self.bookings {
            let previous = booking.scheduled_at;
            let slot = booking.schedule_with(&self.calendar);
            if previous != Some(slot) {
                rescheduled += 1;
            }
        }
        NormalizeSummary {
            total: self.bookings.len(),
            rescheduled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn upsert_booking_inserts_and_updates() {
        let mut agenda = Agenda::new();
        let requested = Utc.with_ymd_and_hms(2025, 1, 8, 17, 0, 0).unwrap();
        agenda.upsert_booking(Booking::new(1, "Trial class", requested));
        assert_eq!(agenda.bookings().len(), 1);

        let mut replacement = Booking::new(1, "Trial class (rescheduled)", requested);
        replacement.student = Some("Ana".to_string());
        agenda.upsert_booking(replacement);

        assert_eq!(agenda.bookings().len(), 1);
        let stored = agenda.find_booking(1).unwrap();
        assert_eq!(stored.title, "Trial class (rescheduled)");
        assert_eq!(stored.student.as_deref(), Some("Ana"));
    }

    #[test]
    fn delete_booking_reports_whether_it_existed() {
        let mut agenda = Agenda::new();
        let requested = Utc.with_ymd_and_hms(2025, 1, 8, 17, 0, 0).unwrap();
        agenda.upsert_booking(Booking::new(7, "Assessment", requested));

        assert!(agenda.delete_booking(7));
        assert!(!agenda.delete_booking(7));
        assert!(agenda.bookings().is_empty());
    }
}
