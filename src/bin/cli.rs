use std::io::{self, Write};

use booking_tool::{
    Agenda, Booking, BusinessHours, load_agenda_from_csv, load_agenda_from_json,
    save_agenda_to_csv, save_agenda_to_json,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Interpret user input as wall-clock time in the agenda's zone.
fn parse_local(agenda: &Agenda, input: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input, INPUT_FORMAT).ok()?;
    agenda
        .calendar()
        .timezone()
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

fn format_local(agenda: &Agenda, t: DateTime<Utc>) -> String {
    t.with_timezone(&agenda.calendar().timezone())
        .format("%Y-%m-%d %H:%M %Z")
        .to_string()
}

fn render_bookings_as_text_table(agenda: &Agenda) -> String {
    let headers = ["id", "title", "student", "requested", "scheduled", "notes"];

    let rows: Vec<[String; 6]> = agenda
        .bookings()
        .iter()
        .map(|b| {
            [
                b.id.to_string(),
                b.title.clone(),
                b.student.clone().unwrap_or_default(),
                format_local(agenda, b.requested_at),
                b.scheduled_at
                    .map(|t| format_local(agenda, t))
                    .unwrap_or_default(),
                b.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row in &rows {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current bookings\n  meta                               Show agenda metadata\n  tz <zone>                          Set agenda time zone (IANA name)\n  hours <open> <close>               Set opening window (hours, half-open)\n  add <id> <YYYY-MM-DDTHH:MM> <title...>\n                                     Upsert a booking request\n  student <id> <name...>             Set student name\n  notes   <id> <text...>             Set booking notes\n  del     <id>                       Delete a booking\n  weekend <YYYY-MM-DDTHH:MM>         Is this a weekend day?\n  sunday  <YYYY-MM-DDTHH:MM>         Is this a Sunday?\n  adjust  <YYYY-MM-DDTHH:MM>         Clamp to business hours\n  next    <YYYY-MM-DDTHH:MM>         Next valid business slot\n  advance <YYYY-MM-DDTHH:MM> <n>     Advance n business days\n  slots   <YYYY-MM-DDTHH:MM>         Hourly slots of that day\n  between <from> <to>                Business days in the range\n  normalize                          Stamp every booking with its slot\n  savejson|loadjson <path>           JSON snapshot\n  savecsv|loadcsv <path>             CSV import/export\n  quit|exit                          Exit"
    );
}

fn main() {
    let mut agenda = Agenda::new();

    println!("Booking Tool (CLI) - type 'help' for commands\n");
    println!("{}", render_bookings_as_text_table(&agenda));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_bookings_as_text_table(&agenda));
            }
            "meta" => {
                let metadata = agenda.metadata();
                println!(
                    "{} - {} | zone {} | hours [{}, {})",
                    metadata.agenda_name,
                    metadata.agenda_description,
                    metadata.timezone,
                    metadata.hours.open_hour,
                    metadata.hours.close_hour
                );
            }
            "tz" => match parts.next().map(|z| z.parse::<Tz>()) {
                Some(Ok(zone)) => {
                    let mut metadata = agenda.metadata().clone();
                    metadata.timezone = zone;
                    agenda.set_metadata(metadata);
                    println!("Time zone set to {zone}");
                }
                Some(Err(_)) => println!("Unknown time zone"),
                None => println!("Usage: tz <zone>"),
            },
            "hours" => {
                let open_s = parts.next();
                let close_s = parts.next();
                match (
                    open_s.and_then(|s| s.parse::<u32>().ok()),
                    close_s.and_then(|s| s.parse::<u32>().ok()),
                ) {
                    (Some(open), Some(close)) => {
                        match BusinessHours::new(open, close) {
                            Ok(hours) => {
                                let mut metadata = agenda.metadata().clone();
                                metadata.hours = hours;
                                agenda.set_metadata(metadata);
                                println!("Opening window set to [{open}, {close})");
                            }
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => println!("Usage: hours <open> <close>"),
                }
            }
            "add" => {
                let id_s = parts.next();
                let when_s = parts.next();
                let title: Vec<&str> = parts.collect();
                match (id_s, when_s, !title.is_empty()) {
                    (Some(id_s), Some(when_s), true) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let requested_at = match parse_local(&agenda, when_s) {
                            Some(t) => t,
                            None => {
                                println!("Invalid datetime (YYYY-MM-DDTHH:MM)");
                                continue;
                            }
                        };
                        agenda.upsert_booking(Booking::new(id, title.join(" "), requested_at));
                        println!("Booking upserted.");
                        println!("{}", render_bookings_as_text_table(&agenda));
                    }
                    _ => println!("Usage: add <id> <YYYY-MM-DDTHH:MM> <title...>"),
                }
            }
            "student" | "notes" => {
                let id_s = parts.next();
                let rest: Vec<&str> = parts.collect();
                match (id_s, !rest.is_empty()) {
                    (Some(id_s), true) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        match agenda.find_booking(id) {
                            Some(mut booking) => {
                                let text = rest.join(" ");
                                if cmd == "student" {
                                    booking.student = Some(text);
                                } else {
                                    booking.notes = Some(text);
                                }
                                agenda.upsert_booking(booking);
                                println!("{cmd} set.\n{}", render_bookings_as_text_table(&agenda));
                            }
                            None => println!("No booking with id {id}"),
                        }
                    }
                    _ => println!("Usage: {cmd} <id> <text...>"),
                }
            }
            "del" => match parts.next().and_then(|s| s.parse::<i32>().ok()) {
                Some(id) => {
                    if agenda.delete_booking(id) {
                        println!("Booking {id} deleted.");
                    } else {
                        println!("No booking with id {id}");
                    }
                }
                None => println!("Usage: del <id>"),
            },
            "weekend" | "sunday" | "adjust" | "next" | "slots" => {
                let when_s = parts.next();
                match when_s.and_then(|s| parse_local(&agenda, s)) {
                    Some(t) => {
                        let calendar = agenda.calendar();
                        match cmd {
                            "weekend" => println!("{}", calendar.is_weekend_day(t)),
                            "sunday" => println!("{}", calendar.is_sunday(t)),
                            "adjust" => println!(
                                "{}",
                                format_local(&agenda, calendar.adjust_to_business_hours(t))
                            ),
                            "next" => println!(
                                "{}",
                                format_local(&agenda, calendar.next_business_period(t))
                            ),
                            _ => {
                                for slot in calendar.open_slots(t) {
                                    println!("{}", format_local(&agenda, slot));
                                }
                            }
                        }
                    }
                    None => println!("Usage: {cmd} <YYYY-MM-DDTHH:MM>"),
                }
            }
            "advance" => {
                let when_s = parts.next();
                let days_s = parts.next();
                match (
                    when_s.and_then(|s| parse_local(&agenda, s)),
                    days_s.and_then(|s| s.parse::<u32>().ok()),
                ) {
                    (Some(t), Some(days)) => {
                        let advanced = agenda.calendar().advance_business_days(t, days);
                        println!("{}", format_local(&agenda, advanced));
                    }
                    _ => println!("Usage: advance <YYYY-MM-DDTHH:MM> <n>"),
                }
            }
            "between" => {
                let from_s = parts.next();
                let to_s = parts.next();
                match (
                    from_s.and_then(|s| parse_local(&agenda, s)),
                    to_s.and_then(|s| parse_local(&agenda, s)),
                ) {
                    (Some(from), Some(to)) => {
                        println!("{}", agenda.calendar().business_days_between(from, to));
                    }
                    _ => println!("Usage: between <from> <to>"),
                }
            }
            "normalize" => {
                let summary = agenda.normalize();
                println!(
                    "Normalized ({})\n{}",
                    summary.to_cli_summary(),
                    render_bookings_as_text_table(&agenda)
                );
            }
            "savejson" | "loadjson" | "savecsv" | "loadcsv" => match parts.next() {
                Some(path) => {
                    let result = match cmd {
                        "savejson" => save_agenda_to_json(&agenda, path).map(|()| None),
                        "savecsv" => save_agenda_to_csv(&agenda, path).map(|()| None),
                        "loadjson" => load_agenda_from_json(path).map(Some),
                        _ => load_agenda_from_csv(path).map(Some),
                    };
                    match result {
                        Ok(Some(loaded)) => {
                            agenda = loaded;
                            println!("Loaded.\n{}", render_bookings_as_text_table(&agenda));
                        }
                        Ok(None) => println!("Saved."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                None => println!("Usage: {cmd} <path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
