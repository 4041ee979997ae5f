//! Which of the four services a process runs, and that service's state.

use std::{fmt, sync::Arc};

use configs::{ServicesConfig, StorageConfig};
use service::{
    attendance::AttendanceService, errors::ServiceError, examination::ExaminationService,
    faculty::FacultyService, student::StudentService, WritePolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Attendance,
    Examination,
    Faculty,
    Student,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] =
        [Self::Attendance, Self::Examination, Self::Faculty, Self::Student];

    pub fn name(self) -> &'static str {
        match self {
            Self::Attendance => "attendance",
            Self::Examination => "examination",
            Self::Faculty => "faculty",
            Self::Student => "student",
        }
    }

    pub fn port(self, services: &ServicesConfig) -> u16 {
        match self {
            Self::Attendance => services.attendance_port,
            Self::Examination => services.examination_port,
            Self::Faculty => services.faculty_port,
            Self::Student => services.student_port,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The opened collections of one service. Each variant only touches its own files.
#[derive(Clone)]
pub enum ServiceState {
    Attendance(Arc<AttendanceService>),
    Examination(Arc<ExaminationService>),
    Faculty(Arc<FacultyService>),
    Student(Arc<StudentService>),
}

impl ServiceState {
    pub async fn open(kind: ServiceKind, storage: &StorageConfig) -> Result<Self, ServiceError> {
        let dir = storage.data_dir.as_path();
        let policy = WritePolicy::from_flag(storage.optimistic_concurrency);
        Ok(match kind {
            ServiceKind::Attendance => Self::Attendance(Arc::new(AttendanceService::open(dir).await?)),
            ServiceKind::Examination => {
                Self::Examination(Arc::new(ExaminationService::open(dir).await?))
            }
            ServiceKind::Faculty => Self::Faculty(Arc::new(FacultyService::open(dir, policy).await?)),
            ServiceKind::Student => Self::Student(Arc::new(StudentService::open(dir, policy).await?)),
        })
    }

    pub fn kind(&self) -> ServiceKind {
        match self {
            Self::Attendance(_) => ServiceKind::Attendance,
            Self::Examination(_) => ServiceKind::Examination,
            Self::Faculty(_) => ServiceKind::Faculty,
            Self::Student(_) => ServiceKind::Student,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_are_distinct_per_service() {
        let services = ServicesConfig::default();
        let mut ports: Vec<u16> = ServiceKind::ALL.iter().map(|k| k.port(&services)).collect();
        ports.sort_unstable();
        ports.dedup();
        assert_eq!(ports, vec![5000, 5001, 5002, 5003]);
        assert_eq!(ServiceKind::Examination.port(&services), 5000);
    }
}
