//! Week view: seven day columns with each event placed by its start and end.
//!
//! Events overlap a day with the same strict test `in_time` uses, so an event
//! ending exactly at midnight does not spill into the next column. Events with
//! a missing or unparsable `DTSTART`/`DTEND` are left out.

use crate::calendar::Calendar;
use crate::error::{Result, SieveError};
use crate::event::Event;
use crate::time::Time;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use std::fmt;
use tracing::debug;

const SUMMARY: &str = "SUMMARY";
const MINUTES_PER_DAY: i64 = 24 * 60;

/// An event as drawn in one day column.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub summary: String,
    pub start: Time,
    pub end: Time,
    /// Minutes after midnight, clipped to the day.
    pub from_minute: i64,
    pub to_minute: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    pub date: NaiveDate,
    /// Sorted by clipped start, then end.
    pub entries: Vec<DayEntry>,
}

/// Seven consecutive days starting at a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    days: Vec<Day>,
}

impl WeekView {
    /// Lay out `calendar` over the seven days beginning on `week_start`'s
    /// date. The hour and minute of `week_start` are ignored.
    ///
    /// # Errors
    /// Returns `SieveError::InvalidTime` if `week_start` is not a real date.
    pub fn new(calendar: &Calendar, week_start: Time) -> Result<Self> {
        let invalid = || SieveError::InvalidTime(format!("week start {} is not a date", week_start));
        let first = date_of(week_start).ok_or_else(invalid)?;

        let mut days = Vec::with_capacity(7);
        for offset in 0..7 {
            let date = first.checked_add_days(Days::new(offset)).ok_or_else(invalid)?;
            days.push(Day {
                date,
                entries: Vec::new(),
            });
        }

        for event in calendar {
            let Some((start, end)) = span(event) else {
                debug!(
                    summary = %event.field_text(SUMMARY).unwrap_or_default(),
                    "no usable time span, left out of week"
                );
                continue;
            };
            for day in &mut days {
                if let Some(entry) = clip(event, start, end, day.date) {
                    day.entries.push(entry);
                }
            }
        }

        for day in &mut days {
            day.entries.sort_by_key(|e| (e.from_minute, e.to_minute));
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Render as a standalone HTML document.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

fn date_of(time: Time) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(time.year).ok()?, time.month, time.day)
}

fn datetime_of(time: Time) -> Option<NaiveDateTime> {
    date_of(time)?.and_hms_opt(time.hour, time.minute, 0)
}

fn span(event: &Event) -> Option<((Time, NaiveDateTime), (Time, NaiveDateTime))> {
    let start = event.get_start_time().ok()?;
    let end = event.get_end_time().ok()?;
    Some(((start, datetime_of(start)?), (end, datetime_of(end)?)))
}

fn clip(
    event: &Event,
    (start, start_at): (Time, NaiveDateTime),
    (end, end_at): (Time, NaiveDateTime),
    date: NaiveDate,
) -> Option<DayEntry> {
    let day_start = date.and_hms_opt(0, 0, 0)?;
    let day_end = date.checked_add_days(Days::new(1))?.and_hms_opt(0, 0, 0)?;
    if !(start_at < day_end && end_at > day_start) {
        return None;
    }
    Some(DayEntry {
        summary: event.field_text(SUMMARY).unwrap_or_default(),
        start,
        end,
        from_minute: (start_at.max(day_start) - day_start).num_minutes(),
        to_minute: (end_at.min(day_end) - day_start).num_minutes(),
    })
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn percent(minutes: i64) -> f64 {
    minutes as f64 * 100.0 / MINUTES_PER_DAY as f64
}

/// `hh:mm` when both ends fall on the same date, the human form otherwise.
fn time_range(start: Time, end: Time) -> String {
    if (start.year, start.month, start.day) == (end.year, end.month, end.day) {
        format!(
            "{:02}:{:02} - {:02}:{:02}",
            start.hour, start.minute, end.hour, end.minute
        )
    } else {
        format!("{} - {}", start.human(), end.human())
    }
}

/// Escape text for use in HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for WeekView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "\t<meta charset=\"UTF-8\">")?;
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => writeln!(
                f,
                "\t<title>Schedule {} to {}</title>",
                first.date.format("%Y/%m/%d"),
                last.date.format("%Y/%m/%d")
            )?,
            _ => writeln!(f, "\t<title>Schedule</title>")?,
        }
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "\t<div class=\"schedule\">")?;

        writeln!(f, "\t\t<div class=\"time-sidebar\">")?;
        for hour in 0..24 {
            writeln!(f, "\t\t\t<p class=\"time\">{:02}:00</p>", hour)?;
        }
        writeln!(f, "\t\t</div>")?;

        writeln!(f, "\t\t<div class=\"week\">")?;
        for day in &self.days {
            writeln!(f, "\t\t\t<div class=\"day\">")?;
            writeln!(
                f,
                "\t\t\t\t<h2 class=\"day-header\">{} {}</h2>",
                weekday_name(day.date.weekday()),
                day.date.format("%Y-%m-%d")
            )?;
            for entry in &day.entries {
                writeln!(
                    f,
                    "\t\t\t\t<div class=\"event\" style=\"top: {:.3}%; height: {:.3}%\">",
                    percent(entry.from_minute),
                    percent(entry.to_minute - entry.from_minute)
                )?;
                writeln!(
                    f,
                    "\t\t\t\t\t<p class=\"event-time\">{}</p>",
                    time_range(entry.start, entry.end)
                )?;
                writeln!(
                    f,
                    "\t\t\t\t\t<p class=\"event-summary\">{}</p>",
                    escape_html(&entry.summary)
                )?;
                writeln!(f, "\t\t\t\t</div>")?;
            }
            writeln!(f, "\t\t\t</div>")?;
        }
        writeln!(f, "\t\t</div>")?;

        writeln!(f, "\t</div>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn time_range_shortens_same_day_spans() {
        let start = Time::new(2024, 1, 8, 9, 0);
        assert_eq!(time_range(start, Time::new(2024, 1, 8, 10, 30)), "09:00 - 10:30");
        assert_eq!(
            time_range(start, Time::new(2024, 1, 9, 1, 0)),
            "2024/01/08 09:00 - 2024/01/09 01:00"
        );
    }

    #[test]
    fn percent_of_day() {
        assert_eq!(percent(0), 0.0);
        assert_eq!(percent(MINUTES_PER_DAY / 2), 50.0);
        assert_eq!(percent(MINUTES_PER_DAY), 100.0);
    }
}
