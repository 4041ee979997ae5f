//! Service layer for the campus record services.
//! - Keyed collections with embedded sub-records (faculty, students).
//! - Append-only record logs looked up by owner (attendance, examinations).
//! - Every collection persists to one JSON file under the data directory.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod collection;
pub mod subcollection;
pub mod record_log;
pub mod attendance;
pub mod examination;
pub mod faculty;
pub mod student;

pub use collection::{KeyedCollection, WritePolicy};
pub use record_log::RecordLog;
