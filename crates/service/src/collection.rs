//! Keyed CRUD shared by every entity kind that has a business key.

use std::{path::PathBuf, sync::Arc};

use models::record::KeyedRecord;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::storage::JsonMapStore;

/// How a full-document write treats a document that changed since it was read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// The later write silently replaces the earlier one.
    #[default]
    LastWriterWins,
    /// Reject the write when the stored version differs from the one read.
    Optimistic,
}

impl WritePolicy {
    pub fn from_flag(optimistic: bool) -> Self {
        if optimistic { Self::Optimistic } else { Self::LastWriterWins }
    }
}

/// Collection of `E` stored under its business key.
///
/// Mutations read the document, change a private copy and write the whole
/// document back. The read and the write are separate steps, so under
/// [`WritePolicy::LastWriterWins`] two concurrent mutations of the same
/// key can lose one of the updates.
pub struct KeyedCollection<E> {
    store: Arc<JsonMapStore<String, E>>,
    policy: WritePolicy,
}

impl<E: KeyedRecord> KeyedCollection<E> {
    pub async fn open<P: Into<PathBuf>>(path: P, policy: WritePolicy) -> Result<Self, ServiceError> {
        let store = JsonMapStore::<String, E>::new(path).await?;
        Ok(Self { store, policy })
    }

    #[instrument(skip_all, fields(entity = E::ENTITY))]
    pub async fn create(&self, input: E::Input) -> Result<E, ServiceError> {
        let record = E::from_input(input)?;
        let key = record.key().to_string();
        if !self.store.insert_new(key.clone(), record.clone()).await? {
            warn!(entity = E::ENTITY, %key, "duplicate business key rejected");
            return Err(duplicate::<E>(&key));
        }
        info!(entity = E::ENTITY, %key, "record_created");
        Ok(record)
    }

    pub async fn get(&self, key: &str) -> Result<E, ServiceError> {
        self.store
            .get(&key.to_string())
            .await
            .ok_or_else(|| ServiceError::not_found(E::ENTITY, key))
    }

    /// Merge `patch`, re-validate the whole record and store it.
    /// A patch that changes nothing returns the stored record without writing.
    #[instrument(skip(self, patch), fields(entity = E::ENTITY))]
    pub async fn update(&self, key: &str, patch: E::Patch) -> Result<E, ServiceError> {
        let current = self.get(key).await?;
        let mut next = current.clone();
        next.apply(patch);
        next.validate()?;
        if next == current {
            return Ok(current);
        }
        let stored = self.write(key, current.version(), next).await?;
        info!(entity = E::ENTITY, key = stored.key(), version = stored.version(), "record_updated");
        Ok(stored)
    }

    /// Remove the record together with everything embedded in it.
    #[instrument(skip(self), fields(entity = E::ENTITY))]
    pub async fn delete(&self, key: &str) -> Result<E, ServiceError> {
        let removed = self
            .store
            .remove(&key.to_string())
            .await?
            .ok_or_else(|| ServiceError::not_found(E::ENTITY, key))?;
        info!(entity = E::ENTITY, %key, "record_deleted");
        Ok(removed)
    }

    /// Read-modify-write of one document. `f` works on a copy; if it fails
    /// nothing is written.
    pub async fn modify<F>(&self, key: &str, f: F) -> Result<E, ServiceError>
    where
        F: FnOnce(&mut E) -> Result<(), ServiceError> + Send,
    {
        let current = self.get(key).await?;
        let mut next = current.clone();
        f(&mut next)?;
        self.write(key, current.version(), next).await
    }

    async fn write(&self, key: &str, read_version: u64, mut next: E) -> Result<E, ServiceError> {
        next.set_version(read_version + 1);
        let policy = self.policy;
        let original = key.to_string();
        let doc = next.clone();
        self.store
            .update_map(move |map| {
                let found = map
                    .get(&original)
                    .map(|e| e.version())
                    .ok_or_else(|| ServiceError::not_found(E::ENTITY, original.as_str()))?;
                if policy == WritePolicy::Optimistic && found != read_version {
                    return Err(ServiceError::VersionMismatch {
                        entity: E::ENTITY,
                        expected: read_version,
                        found,
                    });
                }
                let new_key = doc.key().to_string();
                if new_key != original {
                    if map.contains_key(&new_key) {
                        return Err(duplicate::<E>(&new_key));
                    }
                    map.remove(&original);
                }
                map.insert(new_key, doc);
                Ok(())
            })
            .await?;
        Ok(next)
    }
}

fn duplicate<E: KeyedRecord>(key: &str) -> ServiceError {
    ServiceError::Conflict(format!("{} with {} `{}` already exists", E::ENTITY, E::KEY_FIELD, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_file;
    use models::faculty::{Faculty, FacultyPatch, NewFaculty};

    fn new_faculty(id: &str) -> NewFaculty {
        NewFaculty {
            faculty_id: Some(id.into()),
            name: Some("Ada".into()),
            department: Some("CS".into()),
            schedule: Some("Mon 9-11".into()),
        }
    }

    async fn collection(policy: WritePolicy) -> KeyedCollection<Faculty> {
        KeyedCollection::open(temp_file("faculty"), policy).await.expect("open collection")
    }

    #[tokio::test]
    async fn duplicate_key_is_rejected_and_original_untouched() -> anyhow::Result<()> {
        let c = collection(WritePolicy::default()).await;
        let first = c.create(new_faculty("F-1")).await?;
        let mut other = new_faculty("F-1");
        other.name = Some("Someone else".into());
        let err = c.create(other).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(c.get("F-1").await?, first);
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op() -> anyhow::Result<()> {
        let c = collection(WritePolicy::default()).await;
        let created = c.create(new_faculty("F-2")).await?;
        let updated = c.update("F-2", FacultyPatch::default()).await?;
        assert_eq!(updated, created);
        assert_eq!(updated.version, created.version);
        Ok(())
    }

    #[tokio::test]
    async fn update_revalidates_and_bumps_version() -> anyhow::Result<()> {
        let c = collection(WritePolicy::default()).await;
        c.create(new_faculty("F-3")).await?;
        let updated = c
            .update("F-3", FacultyPatch { department: Some("Math".into()), ..Default::default() })
            .await?;
        assert_eq!(updated.department, "Math");
        assert_eq!(updated.version, 2);

        let err = c
            .update("F-3", FacultyPatch { name: Some("".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(c.get("F-3").await?.name, "Ada");
        Ok(())
    }

    #[tokio::test]
    async fn key_change_moves_the_record_and_guards_uniqueness() -> anyhow::Result<()> {
        let c = collection(WritePolicy::default()).await;
        c.create(new_faculty("F-4")).await?;
        c.create(new_faculty("F-5")).await?;

        let err = c
            .update("F-4", FacultyPatch { faculty_id: Some("F-5".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        c.update("F-4", FacultyPatch { faculty_id: Some("F-6".into()), ..Default::default() })
            .await?;
        assert!(matches!(c.get("F-4").await, Err(ServiceError::NotFound { .. })));
        assert_eq!(c.get("F-6").await?.faculty_id, "F-6");
        Ok(())
    }

    #[tokio::test]
    async fn missing_keys_are_not_found() {
        let c = collection(WritePolicy::default()).await;
        assert!(matches!(c.get("nope").await, Err(ServiceError::NotFound { entity: "Faculty", .. })));
        assert!(matches!(
            c.update("nope", FacultyPatch::default()).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(c.delete("nope").await, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_returns_the_removed_record() -> anyhow::Result<()> {
        let c = collection(WritePolicy::default()).await;
        let created = c.create(new_faculty("F-7")).await?;
        assert_eq!(c.delete("F-7").await?, created);
        assert!(c.get("F-7").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn stale_write_wins_by_default() -> anyhow::Result<()> {
        let c = collection(WritePolicy::LastWriterWins).await;
        c.create(new_faculty("F-8")).await?;
        // a write from a reader that saw version 1 after the document moved on
        c.update("F-8", FacultyPatch { name: Some("Grace".into()), ..Default::default() }).await?;
        let mut stale = c.get("F-8").await?;
        stale.schedule = "Fri".into();
        let stored = c.write("F-8", 1, stale).await?;
        assert_eq!(stored.schedule, "Fri");
        Ok(())
    }

    #[tokio::test]
    async fn stale_write_is_rejected_when_optimistic() -> anyhow::Result<()> {
        let c = collection(WritePolicy::Optimistic).await;
        c.create(new_faculty("F-9")).await?;
        c.update("F-9", FacultyPatch { name: Some("Grace".into()), ..Default::default() }).await?;
        let mut stale = c.get("F-9").await?;
        stale.schedule = "Fri".into();
        let err = c.write("F-9", 1, stale).await.unwrap_err();
        assert!(matches!(err, ServiceError::VersionMismatch { expected: 1, found: 2, .. }));
        assert_eq!(c.get("F-9").await?.schedule, "Mon 9-11");
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_no_record_behind() -> anyhow::Result<()> {
        let path = temp_file("faculty");
        let c = KeyedCollection::<Faculty>::open(path.clone(), WritePolicy::default()).await?;
        let blocker = path.with_extension("json.tmp");
        tokio::fs::create_dir_all(&blocker).await?;

        let err = c.create(new_faculty("F-1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(matches!(c.get("F-1").await, Err(ServiceError::NotFound { .. })));

        tokio::fs::remove_dir(&blocker).await?;
        let created = c.create(new_faculty("F-1")).await?;
        assert_eq!(c.get("F-1").await?, created);
        Ok(())
    }
}
