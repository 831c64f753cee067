pub mod agenda;
pub mod booking;
pub mod calendar;
pub mod hours;
pub mod metadata;
pub mod persistence;
#[cfg(feature = "http_api")]
pub mod http_api;

pub use agenda::{Agenda, NormalizeSummary};
pub use booking::Booking;
pub use calendar::BusinessCalendar;
pub use hours::BusinessHours;
pub use metadata::AgendaMetadata;
pub use persistence::{
    BookingStore, PersistenceError, PersistenceResult, load_agenda_from_csv,
    load_agenda_from_json, save_agenda_to_csv, save_agenda_to_json,
};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteBookingStore;
