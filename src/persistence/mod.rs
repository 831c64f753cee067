use crate::{Agenda, Booking};
use serde_json::Error as SerdeJsonError;
use std::collections::HashSet;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    InvalidData(String),
    NotFound,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::NotFound => write!(f, "no agenda stored"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait BookingStore {
    fn save_agenda(&self, agenda: &Agenda) -> PersistenceResult<()>;
    fn load_agenda(&self) -> PersistenceResult<Option<Agenda>>;
}

pub fn validate_bookings(bookings: &[Booking]) -> PersistenceResult<()> {
    let mut seen_ids = HashSet::with_capacity(bookings.len());
    for booking in bookings {
        if !seen_ids.insert(booking.id) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate booking id {}",
                booking.id
            )));
        }
        if let Some(scheduled) = booking.scheduled_at {
            // The adjustment rules only ever move timestamps forward.
            if scheduled < booking.requested_at {
                return Err(PersistenceError::InvalidData(format!(
                    "booking {} is scheduled at {} before its request at {}",
                    booking.id, scheduled, booking.requested_at
                )));
            }
        }
    }
    Ok(())
}

pub fn validate_agenda(agenda: &Agenda) -> PersistenceResult<()> {
    if let Err(err) = agenda.metadata().hours.validate() {
        return Err(PersistenceError::InvalidData(err.to_string()));
    }
    validate_bookings(agenda.bookings())?;

    let calendar = agenda.calendar();
    for booking in agenda.bookings() {
        if let Some(scheduled) = booking.scheduled_at {
            if !calendar.is_within_business_hours(scheduled) {
                return Err(PersistenceError::InvalidData(format!(
                    "booking {} is scheduled outside business hours",
                    booking.id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod file;

pub use file::{
    load_agenda_from_csv, load_agenda_from_json, save_agenda_to_csv, save_agenda_to_json,
};
