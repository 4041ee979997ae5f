//! Operations on the sub-records embedded in a keyed entity.
//!
//! Sub-records are never stored on their own: every change rewrites the
//! parent document through [`KeyedCollection::modify`].

use models::record::{Embeds, PatchableSubRecord, SubRecord};
use tracing::{info, instrument};

use crate::collection::KeyedCollection;
use crate::errors::ServiceError;

impl<E: Embeds> KeyedCollection<E> {
    /// Validate `input`, give it the parent's next sequence id and append it.
    #[instrument(skip(self, input), fields(entity = E::ENTITY))]
    pub async fn append_item(
        &self,
        key: &str,
        input: <E::Item as SubRecord>::Input,
    ) -> Result<E, ServiceError> {
        let parent = self
            .modify(key, move |parent| {
                let id = parent.next_item_id();
                let item = <E::Item as SubRecord>::build(id, input)?;
                parent.items_mut().push(item);
                Ok(())
            })
            .await?;
        info!(
            entity = E::ENTITY,
            %key,
            items = parent.items().len(),
            "sub_record_appended"
        );
        Ok(parent)
    }

    /// Merge `patch` into the sub-record `item_id`. Ids that do not parse
    /// are reported the same way as ids that do not exist.
    #[instrument(skip(self, patch), fields(entity = E::ENTITY))]
    pub async fn update_item(
        &self,
        key: &str,
        item_id: &str,
        patch: <E::Item as PatchableSubRecord>::Patch,
    ) -> Result<E, ServiceError>
    where
        E::Item: PatchableSubRecord,
    {
        let wanted = item_id.trim().parse::<u64>().ok();
        let missing = item_id.to_string();
        let parent = self
            .modify(key, move |parent| {
                let item = wanted
                    .and_then(|id| parent.items_mut().iter_mut().find(|i| i.id() == id))
                    .ok_or_else(|| {
                        ServiceError::not_found(<E::Item as SubRecord>::ENTITY, missing)
                    })?;
                item.apply(patch)?;
                Ok(())
            })
            .await?;
        info!(entity = E::ENTITY, %key, %item_id, "sub_record_updated");
        Ok(parent)
    }

    /// The parent's sub-records in insertion order.
    pub async fn list_items(&self, key: &str) -> Result<Vec<E::Item>, ServiceError> {
        Ok(self.get(key).await?.items().to_vec())
    }
}
