// --- File: crates/cantacal_cantamen/src/ical.rs ---
//! iCalendar rendering of enriched bookings.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike, Property};

use crate::logic::to_ical_utc;
use crate::models::EnrichedBooking;

pub const PRODUCT_ID: &str = "-//cantacal//cantamen-ical//EN";
pub const ICAL_VERSION: &str = "2.0";
pub const ICAL_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Renders one VEVENT per booking into a complete VCALENDAR document.
///
/// `dtstamp` is written to every event; pass the time the feed was built.
pub fn render_calendar(bookings: &[EnrichedBooking], dtstamp: DateTime<Utc>) -> String {
    let mut calendar = Calendar::empty();
    calendar.append_property(Property::new("PRODID", PRODUCT_ID));
    calendar.append_property(Property::new("VERSION", ICAL_VERSION));

    let dtstamp = to_ical_utc(dtstamp);
    for booking in bookings {
        let mut event = icalendar::Event::new();
        event
            .uid(&booking.id)
            .summary(&booking.vehicle)
            .location(&booking.location);
        // DTSTAMP/DTSTART/DTEND are written as UTC basic format strings
        event.add_property("DTSTAMP", &dtstamp);
        event.add_property("DTSTART", to_ical_utc(booking.start));
        event.add_property("DTEND", to_ical_utc(booking.end));
        calendar.push(event.done());
    }

    calendar.done().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::parse_timestamp;
    use chrono::TimeZone;

    fn booking(id: &str, vehicle: &str, start: &str, end: &str) -> EnrichedBooking {
        EnrichedBooking {
            id: id.to_string(),
            vehicle: vehicle.to_string(),
            location: "Hauptbahnhof Nord".to_string(),
            start: parse_timestamp(start).unwrap(),
            end: parse_timestamp(end).unwrap(),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 7, 30, 0).unwrap()
    }

    #[test]
    fn empty_calendar_has_header_and_footer() {
        let ics = render_calendar(&[], stamp());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
        assert!(ics.contains("PRODID:-//cantacal//cantamen-ical//EN\r\n"));
        assert!(ics.contains("VERSION:2.0\r\n"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn booking_times_are_rendered_in_utc() {
        let ics = render_calendar(
            &[booking(
                "4711",
                "VW Golf",
                "2024-06-01T10:00:00+02:00",
                "2024-06-01T12:00:00+02:00",
            )],
            stamp(),
        );

        assert!(ics.contains("DTSTART:20240601T080000Z\r\n"));
        assert!(ics.contains("DTEND:20240601T100000Z\r\n"));
        assert!(ics.contains("DTSTAMP:20240520T073000Z\r\n"));
        assert!(ics.contains("UID:4711\r\n"));
        assert!(ics.contains("SUMMARY:VW Golf\r\n"));
        assert!(ics.contains("LOCATION:Hauptbahnhof Nord\r\n"));
    }

    #[test]
    fn one_event_per_booking_in_order() {
        let ics = render_calendar(
            &[
                booking("1", "Golf", "2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z"),
                booking("2", "Zoe", "2024-06-02T10:00:00Z", "2024-06-02T11:00:00Z"),
            ],
            stamp(),
        );

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert_eq!(ics.matches("END:VEVENT").count(), 2);
        let first = ics.find("UID:1\r\n").unwrap();
        let second = ics.find("UID:2\r\n").unwrap();
        assert!(first < second);
    }

    #[test]
    fn header_does_not_depend_on_content() {
        let header = |ics: &str| -> Vec<String> {
            ics.lines()
                .filter(|l| l.starts_with("PRODID:") || l.starts_with("VERSION:"))
                .map(str::to_string)
                .collect()
        };

        let empty = render_calendar(&[], stamp());
        let full = render_calendar(
            &[booking("9", "Kangoo", "2024-07-01T10:00:00+02:00", "2024-07-01T18:00:00+02:00")],
            Utc::now(),
        );

        assert_eq!(header(&empty), header(&full));
        assert_eq!(header(&empty).len(), 2);
    }
}
