//! Field checks shared by the record constructors and patch appliers.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::ModelError;

/// Collects field problems so one error can name every offending field.
#[derive(Debug, Default)]
pub struct Checks {
    problems: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text field: present and not blank.
    pub fn text(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.problems.push(format!("{field} is required"));
                String::new()
            }
        }
    }

    /// Re-check of a text field that is already stored on a record.
    pub fn non_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.problems.push(format!("{field} is required"));
        }
    }

    /// Required numeric field.
    pub fn number(&mut self, field: &str, value: Option<f64>) -> f64 {
        match value {
            Some(v) => {
                self.finite(field, v);
                v
            }
            None => {
                self.problems.push(format!("{field} is required"));
                0.0
            }
        }
    }

    pub fn finite(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.problems.push(format!("{field} must be a finite number"));
        }
    }

    /// Required enumerated field.
    pub fn choice<T>(&mut self, field: &str, value: Option<String>) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match value {
            Some(raw) => self.parse(field, &raw),
            None => {
                self.problems.push(format!("{field} is required"));
                None
            }
        }
    }

    /// Enumerated field that may be omitted.
    pub fn optional_choice<T>(&mut self, field: &str, value: Option<String>) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        value.and_then(|raw| self.parse(field, &raw))
    }

    /// Optional calendar date or timestamp.
    pub fn optional_date(&mut self, field: &str, value: Option<String>) -> Option<DateTime<Utc>> {
        let raw = value?;
        match parse_date(&raw) {
            Some(d) => Some(d),
            None => {
                self.problems.push(format!(
                    "{field}: `{raw}` is not a date (expected YYYY-MM-DD or RFC 3339)"
                ));
                None
            }
        }
    }

    fn parse<T>(&mut self, field: &str, raw: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                self.problems.push(format!("{field}: {e}"));
                None
            }
        }
    }

    pub fn finish(self, entity: &str) -> Result<(), ModelError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(format!(
                "{entity} validation failed: {}",
                self.problems.join(", ")
            )))
        }
    }
}

/// Error for a required value that was reported missing by [`Checks`].
pub fn missing(entity: &str, field: &str) -> ModelError {
    ModelError::Validation(format!("{entity} validation failed: {field} is required"))
}

/// Patch field that tells an explicit `null` apart from a missing key.
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_problem() {
        let mut checks = Checks::new();
        checks.text("name", None);
        checks.text("department", Some("   ".into()));
        checks.number("marks", Some(f64::NAN));
        let err = checks.finish("Faculty").unwrap_err();
        assert_eq!(
            err,
            ModelError::Validation(
                "Faculty validation failed: name is required, department is required, marks must be a finite number"
                    .into()
            )
        );
    }

    #[test]
    fn dates_accept_calendar_and_timestamp_forms() {
        let day = parse_date("2024-05-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-05-01T00:00:00+00:00");
        let ts = parse_date("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T08:30:00+00:00");
        assert!(parse_date("next friday").is_none());
    }
}
