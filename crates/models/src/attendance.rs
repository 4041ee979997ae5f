use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::LoggedRecord;
use crate::validation::{missing, Checks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(Self::Present),
            "Absent" => Ok(Self::Absent),
            other => Err(format!("`{other}` is not one of Present, Absent")),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("Present"),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// One attendance mark for one user on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub user_id: String,
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAttendance {
    pub user_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

impl LoggedRecord for AttendanceRecord {
    type Input = NewAttendance;

    const ENTITY: &'static str = "Attendance";

    fn from_input(input: NewAttendance) -> Result<Self, ModelError> {
        let mut checks = Checks::new();
        let user_id = checks.text("user_id", input.user_id);
        let date = checks.text("date", input.date);
        let status = checks.choice::<AttendanceStatus>("status", input.status);
        checks.finish(Self::ENTITY)?;
        Ok(Self {
            id: Uuid::now_v7(),
            user_id,
            date,
            status: status.ok_or_else(|| missing(Self::ENTITY, "status"))?,
        })
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(status: Option<&str>) -> NewAttendance {
        NewAttendance {
            user_id: Some("u-1".into()),
            date: Some("2024-03-01".into()),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn builds_from_valid_input() {
        let rec = AttendanceRecord::from_input(input(Some("Absent"))).unwrap();
        assert_eq!(rec.status, AttendanceStatus::Absent);
        assert_eq!(rec.user_id, "u-1");
    }

    #[test]
    fn status_outside_the_enum_is_rejected() {
        let err = AttendanceRecord::from_input(input(Some("present"))).unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref m) if m.contains("status")));
        let err = AttendanceRecord::from_input(input(None)).unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref m) if m.contains("status is required")));
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = AttendanceRecord::from_input(NewAttendance::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation error: Attendance validation failed: user_id is required, date is required, status is required"
        );
    }
}
