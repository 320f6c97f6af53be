//! Tests for the seven-day week view.

use calsieve_core::{Calendar, Event, SieveError, Time, WeekView};

fn event(summary: &str, start: &str, end: &str) -> Event {
    Event::from_fields([("SUMMARY", summary), ("DTSTART", start), ("DTEND", end)])
}

fn monday() -> Time {
    Time::new(2024, 1, 8, 0, 0)
}

fn summaries(view: &WeekView, day: usize) -> Vec<String> {
    view.days()[day].entries.iter().map(|e| e.summary.clone()).collect()
}

#[test]
fn week_has_seven_consecutive_days() {
    let view = WeekView::new(&Calendar::default(), monday()).unwrap();
    let dates: Vec<String> = view.days().iter().map(|d| d.date.to_string()).collect();
    assert_eq!(
        dates,
        vec![
            "2024-01-08", "2024-01-09", "2024-01-10", "2024-01-11", "2024-01-12", "2024-01-13",
            "2024-01-14"
        ]
    );
    assert!(view.days().iter().all(|d| d.entries.is_empty()));
}

#[test]
fn week_start_hour_is_ignored() {
    let at_noon = WeekView::new(&Calendar::default(), Time::new(2024, 1, 8, 12, 30)).unwrap();
    let at_midnight = WeekView::new(&Calendar::default(), monday()).unwrap();
    assert_eq!(at_noon, at_midnight);
}

#[test]
fn week_crosses_month_and_year_boundaries() {
    let view = WeekView::new(&Calendar::default(), Time::new(2023, 12, 29, 0, 0)).unwrap();
    assert_eq!(view.days()[3].date.to_string(), "2024-01-01");
}

#[test]
fn events_land_on_their_day_sorted_by_start() {
    let calendar = Calendar::new([
        event("late", "20240110T150000Z", "20240110T160000Z"),
        event("early", "20240110T090000Z", "20240110T103000Z"),
        event("friday", "20240112T080000Z", "20240112T090000Z"),
    ]);
    let view = WeekView::new(&calendar, monday()).unwrap();

    assert_eq!(summaries(&view, 2), vec!["early", "late"]);
    assert_eq!(summaries(&view, 4), vec!["friday"]);
    let early = &view.days()[2].entries[0];
    assert_eq!((early.from_minute, early.to_minute), (540, 630));
}

#[test]
fn events_outside_the_week_are_left_out() {
    let calendar = Calendar::new([
        event("before", "20240107T090000Z", "20240107T100000Z"),
        event("after", "20240115T090000Z", "20240115T100000Z"),
    ]);
    let view = WeekView::new(&calendar, monday()).unwrap();
    assert!(view.days().iter().all(|d| d.entries.is_empty()));
}

#[test]
fn overnight_event_is_clipped_into_both_days() {
    let calendar = Calendar::new([event("night", "20240109T220000Z", "20240110T020000Z")]);
    let view = WeekView::new(&calendar, monday()).unwrap();

    let tuesday = &view.days()[1].entries[0];
    assert_eq!((tuesday.from_minute, tuesday.to_minute), (22 * 60, 24 * 60));
    let wednesday = &view.days()[2].entries[0];
    assert_eq!((wednesday.from_minute, wednesday.to_minute), (0, 120));
}

#[test]
fn event_ending_at_midnight_stays_on_its_day() {
    let calendar = Calendar::new([event("evening", "20240108T200000Z", "20240109T000000Z")]);
    let view = WeekView::new(&calendar, monday()).unwrap();
    assert_eq!(summaries(&view, 0), vec!["evening"]);
    assert!(view.days()[1].entries.is_empty());
}

#[test]
fn events_without_usable_times_are_skipped() {
    let calendar = Calendar::new([
        Event::from_fields([("SUMMARY", "no times")]),
        event("bad", "20240108T0900Z", "20240108T100000Z"),
        event("impossible date", "20240230T090000Z", "20240230T100000Z"),
        event("ok", "20240108T090000Z", "20240108T100000Z"),
    ]);
    let view = WeekView::new(&calendar, monday()).unwrap();
    assert_eq!(summaries(&view, 0), vec!["ok"]);
}

#[test]
fn impossible_week_start_is_invalid_time() {
    let err = WeekView::new(&Calendar::default(), Time::new(2024, 2, 30, 0, 0)).unwrap_err();
    assert!(matches!(err, SieveError::InvalidTime(_)), "got {:?}", err);
}

#[test]
fn html_lists_days_hours_and_events() {
    let calendar = Calendar::new([event("Math <lab> & co", "20240110T090000Z", "20240110T100000Z")]);
    let html = WeekView::new(&calendar, monday()).unwrap().to_html();

    assert!(html.starts_with("<!DOCTYPE html>\n"));
    assert!(html.ends_with("</html>\n"));
    assert!(html.contains("<title>Schedule 2024/01/08 to 2024/01/14</title>"));
    assert!(html.contains("<h2 class=\"day-header\">Monday 2024-01-08</h2>"));
    assert!(html.contains("<h2 class=\"day-header\">Wednesday 2024-01-10</h2>"));
    assert_eq!(html.matches("<p class=\"time\">").count(), 24);
    assert!(html.contains("<p class=\"time\">23:00</p>"));
    assert!(html.contains("style=\"top: 37.500%; height: 4.167%\""));
    assert!(html.contains("<p class=\"event-time\">09:00 - 10:00</p>"));
    assert!(html.contains("Math &lt;lab&gt; &amp; co"), "html: {}", html);
}
