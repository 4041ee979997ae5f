//! Keyless collections: records are only ever added and looked up by an owner field.

use std::{path::PathBuf, sync::Arc};

use models::record::LoggedRecord;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::JsonMapStore;

pub struct RecordLog<E> {
    store: Arc<JsonMapStore<Uuid, E>>,
}

impl<E: LoggedRecord> RecordLog<E> {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let store = JsonMapStore::<Uuid, E>::new(path).await?;
        Ok(Self { store })
    }

    pub async fn create(&self, input: E::Input) -> Result<E, ServiceError> {
        let record = E::from_input(input)?;
        self.store.insert(record.id(), record.clone()).await?;
        info!(entity = E::ENTITY, id = %record.id(), "record_created");
        Ok(record)
    }

    /// Records accepted by `pred`, oldest first. An empty match is
    /// reported as `what` not found for `key`.
    pub async fn matching<F>(&self, what: &'static str, key: &str, pred: F) -> Result<Vec<E>, ServiceError>
    where
        F: Fn(&E) -> bool + Send,
    {
        let mut records = self.store.find(pred).await;
        if records.is_empty() {
            debug!(entity = E::ENTITY, %key, "no matching records");
            return Err(ServiceError::not_found(what, key));
        }
        // v7 ids sort by creation time
        records.sort_by_key(|r| r.id());
        Ok(records)
    }
}
