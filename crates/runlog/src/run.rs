//! The run record.
//!
//! A [`Run`] is one workout entry. Its `id` is positional: it names the slot
//! the run occupied in the log when it was last fetched, and is `-1` for a
//! run that has not been saved yet.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Id carried by a run that has not been saved yet.
pub const NEW_RUN_ID: i64 = -1;

/// Unit label used when nothing else is configured.
pub const DEFAULT_UNITS: &str = "Km";

/// A single run.
///
/// The serialized field names match the layout of the stored collection,
/// where the date lives under `dateval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Date of the run.
    #[serde(rename = "dateval", deserialize_with = "date_or_timestamp")]
    pub date: NaiveDate,

    /// Position in the log at last retrieval, or [`NEW_RUN_ID`].
    #[serde(default = "new_run_id", deserialize_with = "number_or_string")]
    pub id: i64,

    /// Distance covered.
    #[serde(default, deserialize_with = "number_or_string")]
    pub distance: f64,

    /// Distance unit label, e.g. `Km`.
    #[serde(default = "default_units")]
    pub units: String,

    /// Duration, in minutes by convention.
    #[serde(default, deserialize_with = "number_or_string")]
    pub duration: f64,

    /// Free-text comments.
    #[serde(default)]
    pub comments: String,
}

impl Run {
    /// Create an unsaved run.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        distance: f64,
        units: impl Into<String>,
        duration: f64,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            date,
            id: NEW_RUN_ID,
            distance,
            units: units.into(),
            duration,
            comments: comments.into(),
        }
    }

    /// The blank run a cleared form shows: today, zero distance and duration.
    #[must_use]
    pub fn blank(units: impl Into<String>) -> Self {
        Self::new(Local::now().date_naive(), 0.0, units, 0.0, "")
    }

    /// Whether this run has never been saved.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id == NEW_RUN_ID
    }

    /// Distance and unit as shown in the list, e.g. `5 Km`.
    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{} {}", self.distance, self.units)
    }

    /// Compare everything except the positional id.
    #[must_use]
    pub fn same_entry(&self, other: &Self) -> bool {
        self.date == other.date
            && self.distance == other.distance
            && self.units == other.units
            && self.duration == other.duration
            && self.comments == other.comments
    }
}

fn new_run_id() -> i64 {
    NEW_RUN_ID
}

fn default_units() -> String {
    DEFAULT_UNITS.to_string()
}

/// Accept `YYYY-MM-DD` or an RFC 3339 timestamp, keeping the date part.
fn date_or_timestamp<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

/// Parse a date as either a plain calendar date or a full timestamp.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Numeric fields were historically stored as raw form strings, and a
/// non-finite number serializes as `null`. Blank and `null` read as zero.
fn number_or_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + TryFromJsonNumber,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
        Null,
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => T::try_from_number(&n)
            .ok_or_else(|| serde::de::Error::custom(format!("number out of range: {n}"))),
        Raw::Null => Ok(T::zero()),
        Raw::Text(s) if s.trim().is_empty() => Ok(T::zero()),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {s}"))),
    }
}

/// Conversion from a JSON number into the field's numeric type.
trait TryFromJsonNumber: Sized {
    fn try_from_number(n: &serde_json::Number) -> Option<Self>;
    fn zero() -> Self;
}

impl TryFromJsonNumber for f64 {
    fn try_from_number(n: &serde_json::Number) -> Option<Self> {
        n.as_f64()
    }

    fn zero() -> Self {
        0.0
    }
}

impl TryFromJsonNumber for i64 {
    fn try_from_number(n: &serde_json::Number) -> Option<Self> {
        n.as_i64()
    }

    fn zero() -> Self {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_run_is_unsaved() {
        let run = Run::new(date(2024, 1, 1), 5.0, "Km", 30.0, "");
        assert!(run.is_new());
        assert_eq!(run.id, NEW_RUN_ID);
    }

    #[test]
    fn test_blank_run() {
        let run = Run::blank("Mi");
        assert!(run.is_new());
        assert_eq!(run.units, "Mi");
        assert_eq!(run.distance, 0.0);
        assert_eq!(run.duration, 0.0);
        assert!(run.comments.is_empty());
        assert_eq!(run.date, Local::now().date_naive());
    }

    #[test]
    fn test_distance_label() {
        let run = Run::new(date(2024, 1, 1), 5.5, "Km", 30.0, "");
        assert_eq!(run.distance_label(), "5.5 Km");
    }

    #[test]
    fn test_serialize_layout() {
        let run = Run::new(date(2024, 1, 1), 5.0, "Km", 30.0, "easy");
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["dateval"], "2024-01-01");
        assert_eq!(json["id"], -1);
        assert_eq!(json["units"], "Km");
        assert_eq!(json["comments"], "easy");
    }

    #[test]
    fn test_deserialize_browser_layout() {
        let json = r#"{
            "dateval": "2024-03-05T00:00:00.000Z",
            "id": "2",
            "distance": "10.5",
            "units": "Mi",
            "duration": "62",
            "comments": "hills"
        }"#;
        let run: Run = serde_json::from_str(json).unwrap();
        assert_eq!(run.date, date(2024, 3, 5));
        assert_eq!(run.id, 2);
        assert_eq!(run.distance, 10.5);
        assert_eq!(run.duration, 62.0);
        assert_eq!(run.units, "Mi");
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let run: Run = serde_json::from_str(r#"{"dateval": "2024-01-01"}"#).unwrap();
        assert_eq!(run.id, NEW_RUN_ID);
        assert_eq!(run.units, DEFAULT_UNITS);
        assert_eq!(run.distance, 0.0);
    }

    #[test]
    fn test_deserialize_empty_number_string() {
        let run: Run =
            serde_json::from_str(r#"{"dateval": "2024-01-01", "distance": ""}"#).unwrap();
        assert_eq!(run.distance, 0.0);
    }

    #[test]
    fn test_deserialize_null_number() {
        let run: Run = serde_json::from_str(
            r#"{"dateval": "2024-01-01", "distance": null, "duration": null}"#,
        )
        .unwrap();
        assert_eq!(run.distance, 0.0);
        assert_eq!(run.duration, 0.0);
    }

    #[test]
    fn test_deserialize_rejects_bad_date() {
        let result: std::result::Result<Run, _> =
            serde_json::from_str(r#"{"dateval": "yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-01"), Some(date(2024, 1, 1)));
        assert_eq!(parse_date(" 2024-01-01 "), Some(date(2024, 1, 1)));
        assert_eq!(
            parse_date("2024-01-01T10:00:00+02:00"),
            Some(date(2024, 1, 1))
        );
        assert_eq!(parse_date("01/02/2024"), None);
    }

    #[test]
    fn test_same_entry_ignores_id() {
        let a = Run::new(date(2024, 1, 1), 5.0, "Km", 30.0, "");
        let mut b = a.clone();
        b.id = 4;
        assert!(a.same_entry(&b));
        b.comments = "different".to_string();
        assert!(!a.same_entry(&b));
    }
}
