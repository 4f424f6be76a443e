//! In-memory TreeStore and BlobStore for testing and server fallback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::blobs::{is_url, BlobStore, StoredBlob};
use crate::error::StoreError;
use crate::tree::{self, TreeStore};

/// In-memory TreeStore. The whole batch of an `update` call is applied under
/// one lock, so multi-path writes are atomic.
#[derive(Clone, Debug)]
pub struct MemoryTreeStore {
    root: Arc<Mutex<Value>>,
}

impl Default for MemoryTreeStore {
    fn default() -> Self {
        Self {
            root: Arc::new(Mutex::new(Value::Object(Default::default()))),
        }
    }
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeStore for MemoryTreeStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let root = self.root.lock().unwrap();
        Ok(tree::get_at(&root, path).cloned())
    }

    async fn update(&self, ops: Vec<(String, Option<Value>)>) -> Result<(), StoreError> {
        let mut root = self.root.lock().unwrap();
        for (path, op) in ops {
            match op {
                Some(value) => tree::set_at(&mut root, &path, value),
                None => tree::remove_at(&mut root, &path),
            }
        }
        Ok(())
    }
}

/// In-memory BlobStore.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs; used by tests to check orphan behaviour.
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(&self, location: &str, bytes: &[u8]) -> Result<StoredBlob, StoreError> {
        let size = bytes.len() as u64;
        self.blobs
            .lock()
            .unwrap()
            .insert(location.to_string(), bytes.to_vec());
        Ok(StoredBlob {
            location: location.to_string(),
            url: format!("/media/{location}"),
            size,
        })
    }

    fn url(&self, location: &str) -> String {
        if is_url(location) {
            location.to_string()
        } else {
            format!("/media/{location}")
        }
    }

    async fn delete(&self, location: &str) -> Result<(), StoreError> {
        match self.blobs.lock().unwrap().remove(location) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("blob {location}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_batch_and_get() {
        let store = MemoryTreeStore::new();
        store
            .update(vec![
                ("users/u1".into(), Some(json!({"username": "amina"}))),
                ("login_credentials/u1".into(), Some(json!({"isActive": true}))),
            ])
            .await
            .unwrap();

        let user = store.get("users/u1").await.unwrap().unwrap();
        assert_eq!(user["username"], "amina");
        assert!(store.get("users/u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_in_batch() {
        let store = MemoryTreeStore::new();
        store
            .update(vec![("a/b".into(), Some(json!(1)))])
            .await
            .unwrap();
        store.update(vec![("a/b".into(), None)]).await.unwrap();
        // Branch pruned along with its last child.
        assert!(store.get("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blob_roundtrip() {
        let blobs = MemoryBlobStore::new();
        let stored = blobs.put("cours/1/m/x.pdf", b"%PDF-").await.unwrap();
        assert_eq!(stored.size, 5);
        assert_eq!(stored.url, "/media/cours/1/m/x.pdf");

        blobs.delete("cours/1/m/x.pdf").await.unwrap();
        assert!(blobs.delete("cours/1/m/x.pdf").await.is_err());
    }

    #[test]
    fn test_url_passthrough() {
        let blobs = MemoryBlobStore::new();
        assert_eq!(
            blobs.url("https://example.org/a.pdf"),
            "https://example.org/a.pdf"
        );
        assert_eq!(blobs.url("td/1/m/a.pdf"), "/media/td/1/m/a.pdf");
    }
}
