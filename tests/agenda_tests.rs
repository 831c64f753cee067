use booking_tool::{Agenda, AgendaMetadata, Booking, BusinessHours};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Sao_Paulo
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn default_agenda_uses_default_metadata() {
    let agenda = Agenda::new();
    assert_eq!(agenda.metadata().agenda_name, "New Agenda");
    assert_eq!(agenda.metadata().hours, BusinessHours::default());
    assert!(agenda.bookings().is_empty());
}

#[test]
fn normalize_stamps_every_booking_with_a_valid_slot() {
    let mut agenda = Agenda::new();
    agenda.upsert_booking(Booking::new(1, "Trial class", local(2025, 1, 4, 10, 0)));
    agenda.upsert_booking(Booking::new(2, "Parent meeting", local(2025, 1, 8, 14, 0)));
    agenda.upsert_booking(Booking::new(3, "Assessment", local(2025, 1, 3, 19, 0)));

    let summary = agenda.normalize();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.rescheduled, 3);

    assert_eq!(
        agenda.find_booking(1).unwrap().scheduled_at,
        Some(local(2025, 1, 6, 9, 0))
    );
    assert_eq!(
        agenda.find_booking(2).unwrap().scheduled_at,
        Some(local(2025, 1, 8, 14, 0))
    );
    assert_eq!(
        agenda.find_booking(3).unwrap().scheduled_at,
        Some(local(2025, 1, 6, 9, 0))
    );

    for booking in agenda.bookings() {
        let scheduled = booking.scheduled_at.unwrap();
        assert!(agenda.calendar().is_within_business_hours(scheduled));
    }
}

#[test]
fn normalize_is_stable_on_second_pass() {
    let mut agenda = Agenda::new();
    agenda.upsert_booking(Booking::new(1, "Trial class", local(2025, 1, 4, 10, 0)));

    let first = agenda.normalize();
    assert_eq!(first.rescheduled, 1);

    let second = agenda.normalize();
    assert_eq!(second.total, 1);
    assert_eq!(second.rescheduled, 0);
    assert_eq!(second.to_cli_summary(), "1 bookings, 0 rescheduled");
}

#[test]
fn set_metadata_rebuilds_the_calendar() {
    let mut agenda = Agenda::new();

    let mut metadata = AgendaMetadata::default();
    metadata.hours = BusinessHours::new(10, 12).unwrap();
    agenda.set_metadata(metadata);

    // 09:30 is now before opening.
    assert_eq!(
        agenda
            .calendar()
            .adjust_to_business_hours(local(2025, 1, 8, 9, 30)),
        local(2025, 1, 8, 10, 0)
    );
}

#[test]
fn timezone_configuration_changes_day_classification() {
    let mut agenda = Agenda::new();
    let mut metadata = agenda.metadata().clone();
    metadata.timezone = chrono_tz::Asia::Tokyo;
    agenda.set_metadata(metadata);

    // Friday 22:00 in Sao Paulo is Saturday morning in Tokyo.
    let friday_night = local(2025, 1, 3, 22, 0);
    assert!(agenda.calendar().is_weekend_day(friday_night));
}
