//! vEvent payloads and event date conversion.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::intent::EventFields;

/// Compact UTC form used by `DTSTART`/`DTEND`.
const ICAL_UTC: &str = "%Y%m%dT%H%M%SZ";

/// Wall-clock layouts accepted without an offset, most specific first.
const NAIVE_LAYOUTS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub(super) fn vevent(event: &EventFields, local_offset: FixedOffset) -> String {
    let mut lines = vec!["BEGIN:VEVENT".to_owned(), format!("SUMMARY:{}", event.title)];
    if !event.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", event.description));
    }
    if !event.location.is_empty() {
        lines.push(format!("LOCATION:{}", event.location));
    }
    if let Some(start) = event_date("DTSTART", &event.start, local_offset) {
        lines.push(format!("DTSTART:{start}"));
    }
    if let Some(end) = event_date("DTEND", &event.end, local_offset) {
        lines.push(format!("DTEND:{end}"));
    }
    lines.push("END:VEVENT".to_owned());
    lines.join("\n")
}

fn event_date(property: &str, raw: &str, local_offset: FixedOffset) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    let formatted = format_event_date(raw, local_offset);
    if formatted.is_none() {
        tracing::warn!(property, value = raw, "unparseable event date, omitting line");
    }
    formatted
}

/// Converts an entered date to `YYYYMMDDTHHMMSSZ`.
///
/// Values with an explicit offset (RFC 3339) are converted directly. Wall
/// clock values are read in `local_offset`. A bare date is midnight UTC.
/// Returns `None` for anything else.
///
/// ```
/// use chrono::FixedOffset;
/// use qrforge::encode::format_event_date;
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// assert_eq!(
///     format_event_date("2024-12-25T10:00", utc).as_deref(),
///     Some("20241225T100000Z")
/// );
/// ```
pub fn format_event_date(raw: &str, local_offset: FixedOffset) -> Option<String> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc).format(ICAL_UTC).to_string());
    }

    let wall_clock = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok());
    if let Some(wall_clock) = wall_clock {
        let instant = local_offset.from_local_datetime(&wall_clock).single()?;
        return Some(instant.with_timezone(&Utc).format(ICAL_UTC).to_string());
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().format(ICAL_UTC).to_string())
}
