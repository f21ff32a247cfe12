//! The built-in converters: `date`, `time`, `datetime`, `timedelta`, `uuid`.
//!
//! Each decoder checks the exact textual shape with an anchored pattern
//! before handing the text to a parser, so malformed input fails with a
//! [`DecodingErrorKind::Format`] rather than a parser-specific message.

use crate::converter::{Converter, NaiveCounterpart};
use crate::error::{ConvertError, ConvertResult, DecodingError, DecodingErrorKind};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeDelta,
};
use regex_lite::Regex;
use std::sync::OnceLock;
use tagjson_types::OffsetTime;
use uuid::Uuid;

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("built-in pattern is valid"))
}

fn date_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^\d{4}-\d{2}-\d{2}$")
}

fn time_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^\d{2}:\d{2}:\d{2}[+-]\d{2}:\d{2}$")
}

fn naive_time_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^\d{2}:\d{2}:\d{2}(\.\d+)?$")
}

/// Date and time with a `T` or space separator; the offset is optional so a
/// naive value can be told apart from garbage.
fn datetime_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(
        &RE,
        r"^\d{4}-\d{2}-\d{2}[Tt ]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})?$",
    )
}

fn seconds_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(-)?(\d+)(?:\.(\d{1,9}))?$")
}

fn float_seconds_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^-?\d+(\.\d+)?[eE][+-]?\d+$")
}

fn uuid_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(
        &RE,
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Borrows the wire value as a string or fails with `NotAString`.
fn wire_str<'a>(key: &str, wire: &'a serde_json::Value) -> Result<&'a str, DecodingError> {
    wire.as_str().ok_or_else(|| {
        DecodingError::new(key, wire, DecodingErrorKind::NotAString(json_kind(wire)))
    })
}

fn fail(key: &str, wire: &serde_json::Value, kind: DecodingErrorKind) -> ConvertError {
    DecodingError::new(key, wire, kind).into()
}

fn year_in_range(year: i32) -> bool {
    (1..=9999).contains(&year)
}

/// Four-digit years only; anything else cannot survive the text format.
fn check_year(key: &str, year: i32) -> ConvertResult<()> {
    if year_in_range(year) {
        Ok(())
    } else {
        Err(ConvertError::encoding(key, format!("year {year} is outside 1..=9999")))
    }
}

fn check_whole_minute_offset(key: &str, offset: FixedOffset) -> ConvertResult<()> {
    if offset.local_minus_utc() % 60 == 0 {
        Ok(())
    } else {
        Err(ConvertError::encoding(key, format!("offset {offset} has seconds")))
    }
}

// ── date ─────────────────────────────────────────────────────────

/// A calendar date as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl Converter for DateConverter {
    type Native = NaiveDate;

    fn key(&self) -> &str {
        "date"
    }

    fn encode(&self, value: &NaiveDate) -> ConvertResult<serde_json::Value> {
        check_year(self.key(), value.year())?;
        Ok(value.format("%Y-%m-%d").to_string().into())
    }

    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<NaiveDate> {
        let text = wire_str(self.key(), wire)?;
        if !date_format().is_match(text) {
            return Err(fail(
                self.key(),
                wire,
                DecodingErrorKind::Format {
                    expected: "YYYY-MM-DD",
                },
            ));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .filter(|date| year_in_range(date.year()))
            .ok_or_else(|| fail(self.key(), wire, DecodingErrorKind::OutOfRange))
    }
}

// ── time ─────────────────────────────────────────────────────────

/// A timezone-aware time of day as `HH:MM:SS±HH:MM`.
///
/// Sub-second precision has no place in the format and is rejected on
/// encode, as are offsets with a seconds component.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeConverter;

impl Converter for TimeConverter {
    type Native = OffsetTime;

    fn key(&self) -> &str {
        "time"
    }

    fn encode(&self, value: &OffsetTime) -> ConvertResult<serde_json::Value> {
        if value.has_subsecond() {
            return Err(ConvertError::encoding(
                self.key(),
                format!("{value} has sub-second precision"),
            ));
        }
        check_whole_minute_offset(self.key(), value.offset())?;
        Ok(value.to_string().into())
    }

    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<OffsetTime> {
        let text = wire_str(self.key(), wire)?;
        if !time_format().is_match(text) {
            let kind = if naive_time_format().is_match(text) {
                DecodingErrorKind::MissingTimezone
            } else {
                DecodingErrorKind::Format {
                    expected: "HH:MM:SS±HH:MM",
                }
            };
            return Err(fail(self.key(), wire, kind));
        }
        text.parse::<OffsetTime>().map_err(|e| {
            let kind = match e {
                tagjson_types::Error::MissingOffset(_) => DecodingErrorKind::MissingTimezone,
                _ => DecodingErrorKind::OutOfRange,
            };
            fail(self.key(), wire, kind)
        })
    }

    fn naive_counterpart(&self) -> Option<NaiveCounterpart> {
        Some(NaiveCounterpart::of::<NaiveTime>())
    }
}

// ── datetime ─────────────────────────────────────────────────────

/// A timezone-aware date and time as ISO-8601 with a `T` separator and a
/// numeric offset, e.g. `2024-03-01T08:15:00.250+01:00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl Converter for DateTimeConverter {
    type Native = DateTime<FixedOffset>;

    fn key(&self) -> &str {
        "datetime"
    }

    fn encode(&self, value: &DateTime<FixedOffset>) -> ConvertResult<serde_json::Value> {
        check_year(self.key(), value.year())?;
        check_whole_minute_offset(self.key(), *value.offset())?;
        Ok(value.to_rfc3339_opts(SecondsFormat::AutoSi, false).into())
    }

    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<DateTime<FixedOffset>> {
        let text = wire_str(self.key(), wire)?;
        let Some(shape) = datetime_format().captures(text) else {
            return Err(fail(
                self.key(),
                wire,
                DecodingErrorKind::Format {
                    expected: "YYYY-MM-DDTHH:MM:SS±HH:MM",
                },
            ));
        };
        if shape.get(2).is_none() {
            return Err(fail(self.key(), wire, DecodingErrorKind::MissingTimezone));
        }
        DateTime::parse_from_rfc3339(text)
            .ok()
            .filter(|parsed| year_in_range(parsed.year()))
            .ok_or_else(|| fail(self.key(), wire, DecodingErrorKind::OutOfRange))
    }

    fn naive_counterpart(&self) -> Option<NaiveCounterpart> {
        Some(NaiveCounterpart::of::<NaiveDateTime>())
    }
}

// ── timedelta ────────────────────────────────────────────────────

/// A signed duration as decimal total seconds, e.g. `86400.0` or `-1.5`.
///
/// Decoding is exact for up to nine fractional digits. Exponent notation
/// (`1e-06`, as float-based producers write it) is accepted and rounded to
/// the microsecond.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeDeltaConverter;

impl TimeDeltaConverter {
    fn decode_exact(
        &self,
        wire: &serde_json::Value,
        negative: bool,
        whole: &str,
        fraction: Option<&str>,
    ) -> ConvertResult<TimeDelta> {
        let out_of_range = || fail(self.key(), wire, DecodingErrorKind::OutOfRange);
        let secs: i64 = whole.parse().map_err(|_| out_of_range())?;
        let nanos = match fraction {
            Some(digits) => {
                let scale = 10u32.pow(9 - digits.len() as u32);
                digits.parse::<u32>().map_err(|_| out_of_range())? * scale
            }
            None => 0,
        };
        let delta = TimeDelta::new(secs, nanos).ok_or_else(out_of_range)?;
        Ok(if negative { -delta } else { delta })
    }

    fn decode_float(&self, wire: &serde_json::Value, text: &str) -> ConvertResult<TimeDelta> {
        let out_of_range = || fail(self.key(), wire, DecodingErrorKind::OutOfRange);
        let secs: f64 = text.parse().map_err(|_| out_of_range())?;
        let micros = (secs * 1e6).round();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        Ok(TimeDelta::microseconds(micros as i64))
    }
}

impl Converter for TimeDeltaConverter {
    type Native = TimeDelta;

    fn key(&self) -> &str {
        "timedelta"
    }

    fn encode(&self, value: &TimeDelta) -> ConvertResult<serde_json::Value> {
        let sign = if *value < TimeDelta::zero() { "-" } else { "" };
        let secs = value.num_seconds().unsigned_abs();
        let nanos = value.subsec_nanos().unsigned_abs();
        let text = if nanos == 0 {
            format!("{sign}{secs}.0")
        } else {
            let fraction = format!("{nanos:09}");
            format!("{sign}{secs}.{}", fraction.trim_end_matches('0'))
        };
        Ok(text.into())
    }

    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<TimeDelta> {
        let text = wire_str(self.key(), wire)?;
        if let Some(caps) = seconds_format().captures(text) {
            let negative = caps.get(1).is_some();
            let whole = caps.get(2).map_or("0", |m| m.as_str());
            let fraction = caps.get(3).map(|m| m.as_str());
            return self.decode_exact(wire, negative, whole, fraction);
        }
        if float_seconds_format().is_match(text) {
            return self.decode_float(wire, text);
        }
        Err(fail(
            self.key(),
            wire,
            DecodingErrorKind::Format {
                expected: "decimal seconds",
            },
        ))
    }
}

// ── uuid ─────────────────────────────────────────────────────────

/// A UUID in canonical hyphenated form, written lowercase.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl Converter for UuidConverter {
    type Native = Uuid;

    fn key(&self) -> &str {
        "uuid"
    }

    fn encode(&self, value: &Uuid) -> ConvertResult<serde_json::Value> {
        Ok(value.hyphenated().to_string().into())
    }

    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<Uuid> {
        let text = wire_str(self.key(), wire)?;
        let malformed = || {
            fail(
                self.key(),
                wire,
                DecodingErrorKind::Format {
                    expected: "8-4-4-4-12 hexadecimal UUID",
                },
            )
        };
        if !uuid_format().is_match(text) {
            return Err(malformed());
        }
        Uuid::parse_str(text).map_err(|_| malformed())
    }
}
