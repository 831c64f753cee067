use super::{BookingStore, PersistenceError, PersistenceResult};
use crate::{Agenda, AgendaMetadata, Booking};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteBookingStore {
    connection: Mutex<Connection>,
}

impl SqliteBookingStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS agenda_metadata (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                metadata_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY,
                booking_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_metadata(
        &self,
        tx: &rusqlite::Transaction,
        metadata: &AgendaMetadata,
    ) -> PersistenceResult<()> {
        let json = serde_json::to_string(metadata)?;
        tx.execute("DELETE FROM agenda_metadata", [])?;
        tx.execute(
            "INSERT INTO agenda_metadata (id, metadata_json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn save_bookings(&self, tx: &rusqlite::Transaction, agenda: &Agenda) -> PersistenceResult<()> {
        tx.execute("DELETE FROM bookings", [])?;
        let mut stmt = tx.prepare("INSERT INTO bookings (id, booking_json) VALUES (?1, ?2)")?;
        for booking in agenda.bookings() {
            let json = serde_json::to_string(booking)?;
            stmt.execute(params![booking.id, json])?;
        }
        Ok(())
    }
}

impl BookingStore for SqliteBookingStore {
    fn save_agenda(&self, agenda: &Agenda) -> PersistenceResult<()> {
        super::validate_agenda(agenda)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_metadata(&tx, agenda.metadata())?;
        self.save_bookings(&tx, agenda)?;
        tx.commit()?;
        Ok(())
    }

    fn load_agenda(&self) -> PersistenceResult<Option<Agenda>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT metadata_json FROM agenda_metadata WHERE id = 1")?;
        let metadata_json_opt: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;

        let Some(metadata_json) = metadata_json_opt else {
            return Ok(None);
        };

        let metadata: AgendaMetadata = serde_json::from_str(&metadata_json)?;
        if let Err(err) = metadata.hours.validate() {
            return Err(PersistenceError::InvalidData(err.to_string()));
        }

        let mut stmt = conn.prepare("SELECT booking_json FROM bookings ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut bookings = Vec::new();
        for json in rows {
            let json = json?;
            let booking: Booking = serde_json::from_str(&json)?;
            bookings.push(booking);
        }

        super::validate_bookings(&bookings)?;

        let mut agenda = Agenda::new_with_metadata(metadata);
        for booking in bookings {
            agenda.upsert_booking(booking);
        }

        Ok(Some(agenda))
    }
}
