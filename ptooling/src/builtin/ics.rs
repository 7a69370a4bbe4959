//! All-day events from an iCalendar (RFC 5545) feed.

use chrono::NaiveDate;
use icalendar::{Calendar, CalendarComponent, Component, DatePerhapsTime, EventLike};

use crate::ToolError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub summary: String,
}

/// Extracts every `VEVENT` whose `DTSTART` is a calendar date, in feed order.
///
/// Events with a date-time start or no start at all are skipped.
pub fn parse_calendar(source: &str) -> Result<Vec<CalendarEvent>, ToolError> {
    let calendar = source
        .parse::<Calendar>()
        .map_err(|error| ToolError::execution(format!("invalid calendar feed: {error}")))?;

    let events = calendar
        .components
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .filter_map(|event| match event.get_start()? {
            DatePerhapsTime::Date(date) => Some(CalendarEvent {
                date,
                summary: event.get_summary().unwrap_or_default().trim().to_string(),
            }),
            DatePerhapsTime::DateTime(_) => None,
        })
        .collect();

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//parley//holidays//EN\r\n\
BEGIN:VEVENT\r\n\
UID:national-day\r\n\
DTSTART;VALUE=DATE:20261012\r\n\
SUMMARY:Fiesta Nacional de Espa\r\n ña\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:all-saints\r\n\
DTSTART;VALUE=DATE:20261101\r\n\
SUMMARY:All Saints Day\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:meeting\r\n\
DTSTART:20261105T090000Z\r\n\
SUMMARY:Meeting\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn parses_all_day_events_and_skips_timed_ones() {
        let events = parse_calendar(FEED).expect("feed should parse");

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            CalendarEvent {
                date: NaiveDate::from_ymd_opt(2026, 10, 12).expect("date"),
                summary: "Fiesta Nacional de España".to_string(),
            }
        );
        assert_eq!(
            events[1].date,
            NaiveDate::from_ymd_opt(2026, 11, 1).expect("date")
        );
        assert_eq!(events[1].summary, "All Saints Day");
    }

    #[test]
    fn calendar_without_all_day_events_is_empty() {
        let feed = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:standup\r\n\
DTSTART:20260105T093000Z\r\n\
SUMMARY:Standup\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let events = parse_calendar(feed).expect("feed should parse");
        assert!(events.is_empty());
    }
}
