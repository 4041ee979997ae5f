use std::path::Path;

use models::attendance::{AttendanceRecord, NewAttendance};
use tracing::instrument;

use crate::errors::ServiceError;
use crate::record_log::RecordLog;

/// Attendance marks, many per user.
pub struct AttendanceService {
    records: RecordLog<AttendanceRecord>,
}

impl AttendanceService {
    pub async fn open(data_dir: &Path) -> Result<Self, ServiceError> {
        let records = RecordLog::open(data_dir.join("attendance.json")).await?;
        Ok(Self { records })
    }

    #[instrument(skip_all)]
    pub async fn record(&self, input: NewAttendance) -> Result<AttendanceRecord, ServiceError> {
        self.records.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn for_user(&self, user_id: &str) -> Result<Vec<AttendanceRecord>, ServiceError> {
        self.records
            .matching("Attendance records", user_id, |r| r.user_id == user_id)
            .await
    }
}
