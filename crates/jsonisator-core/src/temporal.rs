//! Canonical text grammars for date/time fields.
//!
//! | Shape            | Rendered as                          |
//! |------------------|--------------------------------------|
//! | `Date`           | `2024-03-01`                         |
//! | `Time`           | `09:30:00` / `09:30:00.250`          |
//! | `DateTime`       | `2024-03-01T09:30:00[.fraction]`     |
//! | `OffsetDateTime` | `2024-03-01T09:30:00+03:00`, `…Z`    |
//! | `OffsetTime`     | `09:30:00+03:00`, `09:30:00Z`        |
//!
//! Fractional seconds are printed only when non-zero. Offsets with seconds
//! print as `+01:00:30`. Parsing accepts the rendered forms plus
//! seconds-less `HH:MM` times.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

use crate::datum::Datum;
use crate::descriptor::TemporalShape;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const SHORT_TIME_FORMAT: &str = "%H:%M";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const SHORT_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A wall-clock time with a fixed UTC offset, e.g. `10:15:30+01:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    pub time: NaiveTime,
    pub offset: FixedOffset,
}

impl OffsetTime {
    pub fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }
}

/// Midnight UTC.
impl Default for OffsetTime {
    fn default() -> Self {
        Self {
            time: NaiveTime::MIN,
            offset: Utc.fix(),
        }
    }
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time.format(TIME_FORMAT), format_offset(self.offset))
    }
}

impl FromStr for OffsetTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(time) = s.strip_suffix('Z') {
            return Ok(Self::new(parse_time(time)?, Utc.fix()));
        }
        let split = s
            .rfind(['+', '-'])
            .ok_or_else(|| "missing UTC offset".to_string())?;
        let (time, offset) = s.split_at(split);
        Ok(Self::new(parse_time(time)?, parse_offset(offset)?))
    }
}

/// Format a temporal datum in its canonical grammar. Returns `None` when the
/// datum does not belong to `shape`.
pub(crate) fn format(shape: TemporalShape, datum: &Datum) -> Option<String> {
    let text = match (shape, datum) {
        (TemporalShape::Date, Datum::Date(d)) => d.format(DATE_FORMAT).to_string(),
        (TemporalShape::Time, Datum::Time(t)) => t.format(TIME_FORMAT).to_string(),
        (TemporalShape::DateTime, Datum::DateTime(dt)) => dt.format(DATE_TIME_FORMAT).to_string(),
        (TemporalShape::OffsetDateTime, Datum::OffsetDateTime(dt)) => format!(
            "{}{}",
            dt.naive_local().format(DATE_TIME_FORMAT),
            format_offset(*dt.offset())
        ),
        (TemporalShape::OffsetTime, Datum::OffsetTime(t)) => t.to_string(),
        _ => return None,
    };
    Some(text)
}

/// Parse `text` with the grammar of `shape`. The error is a human-readable
/// reason.
pub(crate) fn parse(shape: TemporalShape, text: &str) -> Result<Datum, String> {
    match shape {
        TemporalShape::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Datum::Date)
            .map_err(|e| e.to_string()),
        TemporalShape::Time => parse_time(text).map(Datum::Time),
        TemporalShape::DateTime => parse_date_time(text).map(Datum::DateTime),
        TemporalShape::OffsetDateTime => DateTime::parse_from_rfc3339(text)
            .or_else(|e| parse_offset_date_time(text).ok_or(e))
            .map(Datum::OffsetDateTime)
            .map_err(|e| e.to_string()),
        TemporalShape::OffsetTime => text.parse::<OffsetTime>().map(Datum::OffsetTime),
    }
}

fn parse_date_time(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, SHORT_DATE_TIME_FORMAT))
        .map_err(|e| e.to_string())
}

/// The rendered form RFC 3339 cannot express: an offset with seconds.
fn parse_offset_date_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let (_, clock) = text.split_once('T')?;
    let split = text.len() - clock.len() + clock.rfind(['+', '-'])?;
    let (local, offset) = text.split_at(split);
    let offset = parse_offset(offset).ok()?;
    parse_date_time(local).ok()?.and_local_timezone(offset).single()
}

fn parse_time(text: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(text, SHORT_TIME_FORMAT))
        .map_err(|e| e.to_string())
}

/// `Z` for UTC, otherwise `+HH:MM`, with `:SS` appended when the offset has
/// seconds.
fn format_offset(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    if total == 0 {
        return "Z".to_string();
    }
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    if seconds == 0 {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

/// Parse `+HH:MM:SS`, `+HH:MM`, `+HHMM` or `+HH` (and the `-` forms).
fn parse_offset(text: &str) -> Result<FixedOffset, String> {
    let invalid = || format!("invalid UTC offset {:?}", text);
    let (sign, body) = match text.split_at_checked(1) {
        Some(("+", body)) => (1, body),
        Some(("-", body)) => (-1, body),
        _ => return Err(invalid()),
    };
    let parts: Vec<&str> = match body.split(':').collect::<Vec<_>>().as_slice() {
        [compact] if compact.len() == 4 => {
            let (h, m) = compact.split_at_checked(2).ok_or_else(invalid)?;
            vec![h, m]
        }
        parts => parts.to_vec(),
    };
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h] => (*h, "00", "00"),
        [h, m] => (*h, *m, "00"),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };
    let field = |part: &str, max: i32| -> Result<i32, String> {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse::<i32>()
            .ok()
            .filter(|v| *v < max)
            .ok_or_else(invalid)
    };
    let total = field(hours, 24)? * 3600 + field(minutes, 60)? * 60 + field(seconds, 60)?;
    FixedOffset::east_opt(sign * total).ok_or_else(invalid)
}
