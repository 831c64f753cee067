use super::{PersistenceError, PersistenceResult};
use crate::{Agenda, AgendaMetadata, Booking};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct AgendaSnapshot {
    metadata: AgendaMetadata,
    bookings: Vec<Booking>,
}

impl AgendaSnapshot {
    fn from_agenda(agenda: &Agenda) -> PersistenceResult<Self> {
        super::validate_agenda(agenda)?;
        Ok(Self {
            metadata: agenda.metadata().clone(),
            bookings: agenda.bookings().to_vec(),
        })
    }

    fn into_agenda(self) -> PersistenceResult<Agenda> {
        if let Err(err) = self.metadata.hours.validate() {
            return Err(PersistenceError::InvalidData(err.to_string()));
        }
        super::validate_bookings(&self.bookings)?;
        let mut agenda = Agenda::new_with_metadata(self.metadata);
        for booking in self.bookings {
            agenda.upsert_booking(booking);
        }
        Ok(agenda)
    }
}

pub fn save_agenda_to_json<P: AsRef<Path>>(agenda: &Agenda, path: P) -> PersistenceResult<()> {
    let snapshot = AgendaSnapshot::from_agenda(agenda)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_agenda_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Agenda> {
    let file = File::open(path)?;
    let snapshot: AgendaSnapshot = serde_json::from_reader(file)?;
    snapshot.into_agenda()
}

#[derive(Serialize, Deserialize)]
struct BookingCsvRecord {
    id: i32,
    title: String,
    student: String,
    requested_at: String,
    scheduled_at: String,
    notes: String,
}

impl From<&Booking> for BookingCsvRecord {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            title: booking.title.clone(),
            student: booking.student.clone().unwrap_or_default(),
            requested_at: booking.requested_at.to_rfc3339(),
            scheduled_at: format_timestamp(booking.scheduled_at),
            notes: booking.notes.clone().unwrap_or_default(),
        }
    }
}

impl BookingCsvRecord {
    fn into_booking(self) -> PersistenceResult<Booking> {
        let requested_at = parse_timestamp(&self.requested_at)?.ok_or_else(|| {
            PersistenceError::InvalidData(format!("booking {} is missing requested_at", self.id))
        })?;
        let mut booking = Booking::new(self.id, self.title, requested_at);
        booking.scheduled_at = parse_timestamp(&self.scheduled_at)?;
        booking.student = parse_string_option(self.student);
        booking.notes = parse_string_option(self.notes);
        Ok(booking)
    }
}

pub fn save_agenda_to_csv<P: AsRef<Path>>(agenda: &Agenda, path: P) -> PersistenceResult<()> {
    super::validate_agenda(agenda)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for booking in agenda.bookings() {
        writer.serialize(BookingCsvRecord::from(booking))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_agenda_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Agenda> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut bookings = Vec::new();
    for record in reader.deserialize::<BookingCsvRecord>() {
        let record = record?;
        bookings.push(record.into_booking()?);
    }

    if bookings.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no bookings".into(),
        ));
    }

    super::validate_bookings(&bookings)?;

    // CSV carries no metadata, so default metadata is used.
    // Callers can adjust metadata after load if needed.
    let mut agenda = Agenda::new();
    for booking in bookings {
        agenda.upsert_booking(booking);
    }
    Ok(agenda)
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map(|t| t.to_rfc3339()).unwrap_or_default()
}

fn parse_timestamp(input: &str) -> PersistenceResult<Option<DateTime<Utc>>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(input.trim())
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| PersistenceError::InvalidData(format!("invalid timestamp '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
