//! Tests for calendar rendering.

use calsieve_core::source::parse_ics;
use calsieve_core::{Calendar, Event};

fn calendar() -> Calendar {
    Calendar::new([
        Event::from_fields([("SUMMARY", "Math"), ("LOCATION", "A1")]),
        Event::new(),
    ])
}

#[test]
fn display_nests_events_under_calendar() {
    assert_eq!(
        calendar().to_string(),
        "Calendar:\n\tEvent:\n\t\tSUMMARY: Math\n\t\tLOCATION: A1\n\tEvent:"
    );
    assert_eq!(Calendar::default().to_string(), "Calendar:");
}

#[test]
fn ics_wraps_events_in_vcalendar() {
    let ics = calendar().to_ics();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert!(ics.contains("BEGIN:VEVENT\r\nSUMMARY:Math\r\nLOCATION:A1\r\nEND:VEVENT\r\n"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
}

#[test]
fn json_preserves_field_order() {
    let json = calendar().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = value[0].as_object().unwrap();
    let keys: Vec<&String> = first.keys().collect();
    assert_eq!(keys, ["SUMMARY", "LOCATION"]);
    assert_eq!(value[1], serde_json::json!({}));
}

#[test]
fn ics_keeps_multiline_values_on_one_content_line() {
    let calendar = Calendar::new([
        Event::from_fields([("DESCRIPTION", "line one\nEND:VEVENT")]),
        Event::from_fields([("SUMMARY", "x")]),
    ]);
    let ics = calendar.to_ics();
    assert!(ics.contains("DESCRIPTION:line one\\nEND:VEVENT\r\n"), "ics: {}", ics);
    assert_eq!(ics.split("\r\n").filter(|line| *line == "END:VEVENT").count(), 2);

    let events = parse_ics("out", &ics).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0].get_field_text("DESCRIPTION").unwrap(),
        "line one\\nEND:VEVENT"
    );
    assert_eq!(events[1].get_field_text("SUMMARY").unwrap(), "x");
}
