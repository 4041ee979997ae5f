//! Record shapes for the campus services.
//! - Entities, their create/patch inputs and field validation.
//! - Grade bands used for derived values.
//! - Storage-facing traits implemented by every entity kind.

pub mod errors;
pub mod validation;
pub mod record;
pub mod grade;
pub mod attendance;
pub mod examination;
pub mod faculty;
pub mod student;
