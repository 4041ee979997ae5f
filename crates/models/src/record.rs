//! Traits the storage-facing layers use to handle every entity kind the same way.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Top-level entity addressed by a caller-supplied business key.
///
/// `version` counts full-document writes; it is the token checked when
/// optimistic writes are enabled.
pub trait KeyedRecord:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Input: Send;
    type Patch: Send;

    /// Human name used in messages, e.g. `Faculty`.
    const ENTITY: &'static str;
    /// Name of the business key field, e.g. `faculty_id`.
    const KEY_FIELD: &'static str;

    /// Validate a create payload and build the record with fresh storage fields.
    fn from_input(input: Self::Input) -> Result<Self, ModelError>;
    fn key(&self) -> &str;
    /// Merge the fields present in `patch`; callers re-run [`validate`](Self::validate).
    fn apply(&mut self, patch: Self::Patch);
    fn validate(&self) -> Result<(), ModelError>;
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

/// Record owned by a parent entity, identified by a per-parent sequence number.
pub trait SubRecord: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Input: Send;

    const ENTITY: &'static str;

    fn build(id: u64, input: Self::Input) -> Result<Self, ModelError>;
    fn id(&self) -> u64;
}

/// Sub-record with an update path.
pub trait PatchableSubRecord: SubRecord {
    type Patch: Send;

    /// Merge and re-validate; on error `self` may be partially updated and must be discarded.
    fn apply(&mut self, patch: Self::Patch) -> Result<(), ModelError>;
}

/// Keyed entity that embeds an ordered sub-collection.
pub trait Embeds: KeyedRecord {
    type Item: SubRecord;

    fn items(&self) -> &[Self::Item];
    fn items_mut(&mut self) -> &mut Vec<Self::Item>;
    /// Advance the parent's sequence counter and return the new identifier.
    fn next_item_id(&mut self) -> u64;
}

/// Entity in a keyless collection: many rows may share an owner value.
pub trait LoggedRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Input: Send;

    const ENTITY: &'static str;

    fn from_input(input: Self::Input) -> Result<Self, ModelError>;
    fn id(&self) -> Uuid;
}
