use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::error;

use crate::errors::ServiceError;

fn storage_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

/// Generic JSON file-backed document map.
///
/// Persists a `HashMap<K, V>` to a JSON file. A mutation only stays in
/// memory once the file write succeeded; otherwise it is undone and the
/// caller gets [`ServiceError::Storage`].
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(storage_err)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                error!(path = %file_path.display(), error = %e, "corrupt collection file");
                storage_err(format!("{}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(storage_err)?)
                    .await
                    .map_err(storage_err)?;
                empty
            }
            Err(e) => return Err(storage_err(e)),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    // Called with the write guard held so file contents follow mutation order.
    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(storage_err)?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(storage_err)?;
        fs::rename(&tmp, &self.file_path).await.map_err(storage_err)?;
        Ok(())
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// All values matching `pred`, in no particular order.
    pub async fn find<F>(&self, pred: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let map = self.inner.read().await;
        map.values().filter(|v| pred(v)).cloned().collect()
    }

    /// Insert or replace a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let previous = map.insert(key.clone(), value);
        if let Err(e) = self.save(&map).await {
            restore(&mut map, key, previous);
            return Err(e);
        }
        Ok(())
    }

    /// Insert only when `key` is free; returns `false` (and writes nothing) otherwise.
    pub async fn insert_new(&self, key: K, value: V) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        if map.contains_key(&key) {
            return Ok(false);
        }
        map.insert(key.clone(), value);
        if let Err(e) = self.save(&map).await {
            map.remove(&key);
            return Err(e);
        }
        Ok(true)
    }

    /// Remove a key and persist; returns the removed value if it existed.
    pub async fn remove(&self, key: &K) -> Result<Option<V>, ServiceError> {
        let mut map = self.inner.write().await;
        let removed = map.remove(key);
        if let Some(value) = &removed {
            if let Err(e) = self.save(&map).await {
                map.insert(key.clone(), value.clone());
                return Err(e);
            }
        }
        Ok(removed)
    }

    /// Apply a mutation to the underlying map and persist.
    ///
    /// When `f` or the file write fails the map is put back as it was.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let before = map.clone();
        let out = match f(&mut map) {
            Ok(out) => out,
            Err(e) => {
                *map = before;
                return Err(e);
            }
        };
        if let Err(e) = self.save(&map).await {
            *map = before;
            return Err(e);
        }
        Ok(out)
    }
}

fn restore<K: Eq + Hash, V>(map: &mut HashMap<K, V>, key: K, previous: Option<V>) {
    match previous {
        Some(v) => {
            map.insert(key, v);
        }
        None => {
            map.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::new(&tmp).await?;

        // initially empty
        assert!(store.find(|_| true).await.is_empty());

        // insert and check
        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        assert_eq!(store.find(|v| v == "1").await, vec!["1".to_string()]);
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        // insert_new refuses a taken key
        assert!(!store.insert_new("a".into(), "99".into()).await?);
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        // update_map
        store
            .update_map(|m| {
                if let Some(v) = m.get_mut(&"a".to_string()) { *v = "10".into(); }
                Ok(())
            })
            .await?;
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("10"));

        // remove and reload persistence
        let removed = store.remove(&"b".into()).await?;
        assert_eq!(removed.as_deref(), Some("2"));
        assert!(store.remove(&"b".into()).await?.is_none());
        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        let entries = reloaded.find(|_| true).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(reloaded.get(&"a".into()).await.as_deref(), Some("10"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await?;
        let res = JsonMapStore::<String, String>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    // a directory at the temp path makes every save fail
    async fn store_that_cannot_save() -> Result<(Arc<JsonMapStore<String, String>>, PathBuf), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::new(&tmp).await?;
        store.insert("kept".into(), "1".into()).await?;
        tokio::fs::create_dir_all(tmp.with_extension("json.tmp")).await?;
        Ok((store, tmp))
    }

    #[tokio::test]
    async fn failed_save_leaves_memory_and_file_unchanged() -> Result<(), anyhow::Error> {
        let (store, tmp) = store_that_cannot_save().await?;

        assert!(matches!(store.insert_new("new".into(), "2".into()).await, Err(ServiceError::Storage(_))));
        assert!(store.get(&"new".into()).await.is_none());

        assert!(store.insert("kept".into(), "changed".into()).await.is_err());
        assert_eq!(store.get(&"kept".into()).await.as_deref(), Some("1"));

        assert!(store.remove(&"kept".into()).await.is_err());
        assert_eq!(store.get(&"kept".into()).await.as_deref(), Some("1"));

        let res = store
            .update_map(|m| {
                m.insert("other".into(), "3".into());
                Ok(())
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.find(|_| true).await, vec!["1".to_string()]);

        let on_disk: HashMap<String, String> = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(on_disk.len(), 1);

        // once the file is writable again a retry goes through
        tokio::fs::remove_dir(tmp.with_extension("json.tmp")).await?;
        assert!(store.insert_new("new".into(), "2".into()).await?);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_closure_rolls_back_its_changes() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::new(&tmp).await?;
        let res: Result<(), ServiceError> = store
            .update_map(|m| {
                m.insert("half".into(), "done".into());
                Err(ServiceError::Conflict("late check".into()))
            })
            .await;
        assert!(res.is_err());
        assert!(store.get(&"half".into()).await.is_none());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
