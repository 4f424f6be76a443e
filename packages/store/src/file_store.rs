//! # Filesystem-backed TreeStore and BlobStore
//!
//! [`FileTreeStore`] persists each top-level key of the record tree as one
//! JSON document, so the portal survives server restarts without an external
//! database.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── login_credentials.json
//! ├── users.json
//! ├── resources.json
//! └── media/
//!     └── <type>/<year>/<module>/<id>.<ext>    # uploaded blobs
//! ```
//!
//! Writes go through a temp file followed by a rename, and an in-process
//! mutex serializes writers. A multi-path update touching a single top-level
//! key (the common case: both credential records live under different keys,
//! but a module rename stays inside `resources`) is therefore atomic; batches
//! spanning keys are applied key by key, best-effort.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::blobs::{is_url, BlobStore, StoredBlob};
use crate::error::StoreError;
use crate::tree::{self, TreeStore};

/// Filesystem-backed TreeStore.
#[derive(Clone, Debug)]
pub struct FileTreeStore {
    base: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileTreeStore {
    pub fn new(base: PathBuf) -> Self {
        Self {
            base,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn doc_path(&self, top: &str) -> PathBuf {
        self.base.join(format!("{top}.json"))
    }

    fn load_doc(&self, top: &str) -> Result<Value, StoreError> {
        match std::fs::read(self.doc_path(top)) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(StoreError::unavailable)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Value::Object(Default::default()))
            }
            Err(e) => Err(StoreError::unavailable(e)),
        }
    }

    fn save_doc(&self, top: &str, doc: &Value) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base).map_err(StoreError::unavailable)?;
        let path = self.doc_path(top);
        let tmp = self.base.join(format!(".{top}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::unavailable)?;
        std::fs::write(&tmp, bytes).map_err(StoreError::unavailable)?;
        std::fs::rename(&tmp, &path).map_err(StoreError::unavailable)
    }
}

impl TreeStore for FileTreeStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let segs = tree::segments(path);
        let Some((top, rest)) = segs.split_first() else {
            return Err(StoreError::ValidationFailed("empty path".into()));
        };
        let doc = self.load_doc(top)?;
        let sub = rest.join("/");
        let value = tree::get_at(&doc, &sub).cloned();
        // A freshly-created empty document means nothing is stored yet.
        match value {
            Some(Value::Object(ref m)) if m.is_empty() => Ok(None),
            other => Ok(other),
        }
    }

    async fn update(&self, ops: Vec<(String, Option<Value>)>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();

        // Group ops by top-level key so each document is rewritten once.
        let mut by_top: Vec<(String, Vec<(String, Option<Value>)>)> = Vec::new();
        for (path, op) in ops {
            let segs = tree::segments(&path);
            let Some((top, rest)) = segs.split_first() else {
                return Err(StoreError::ValidationFailed("empty path".into()));
            };
            let sub = rest.join("/");
            match by_top.iter_mut().find(|(t, _)| t == top) {
                Some((_, list)) => list.push((sub, op)),
                None => by_top.push((top.to_string(), vec![(sub, op)])),
            }
        }

        for (top, list) in by_top {
            let mut doc = self.load_doc(&top)?;
            for (sub, op) in list {
                match op {
                    Some(value) => tree::set_at(&mut doc, &sub, value),
                    None => tree::remove_at(&mut doc, &sub),
                }
            }
            self.save_doc(&top, &doc)?;
        }
        Ok(())
    }
}

/// Filesystem-backed BlobStore. Blobs live under `<base>/media/` and are
/// served by the web server at `/media/<location>`.
#[derive(Clone, Debug)]
pub struct FileBlobStore {
    base: PathBuf,
}

impl FileBlobStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Directory the web server should serve at `/media`.
    pub fn media_dir(&self) -> PathBuf {
        self.base.join("media")
    }

    fn blob_file(&self, location: &str) -> PathBuf {
        let mut path = self.media_dir();
        // Reject traversal segments rather than sanitize them.
        for seg in tree::segments(location) {
            path.push(seg);
        }
        path
    }
}

impl BlobStore for FileBlobStore {
    async fn put(&self, location: &str, bytes: &[u8]) -> Result<StoredBlob, StoreError> {
        if tree::segments(location).iter().any(|s| *s == "..") {
            return Err(StoreError::ValidationFailed("invalid blob path".into()));
        }
        let path = self.blob_file(location);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::unavailable)?;
        }
        std::fs::write(&path, bytes).map_err(StoreError::unavailable)?;
        Ok(StoredBlob {
            location: location.to_string(),
            url: format!("/media/{location}"),
            size: bytes.len() as u64,
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
        match std::fs::remove_file(self.blob_file(location)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(format!("blob {location}")))
            }
            Err(e) => Err(StoreError::unavailable(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_base(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("encg_portal_test_{tag}_{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_tree_survives_reopen() {
        let dir = temp_base("tree");
        let _ = std::fs::remove_dir_all(&dir);

        let store = FileTreeStore::new(dir.clone());
        store
            .update(vec![(
                "resources/cours/3/compta/r1".into(),
                Some(json!({"name": "ch1", "type": "link", "url": "https://x"})),
            )])
            .await
            .unwrap();

        // Re-open from the same directory.
        let store2 = FileTreeStore::new(dir.clone());
        let entry = store2
            .get("resources/cours/3/compta/r1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry["name"], "ch1");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_blob_roundtrip_on_disk() {
        let dir = temp_base("blob");
        let _ = std::fs::remove_dir_all(&dir);

        let blobs = FileBlobStore::new(dir.clone());
        let stored = blobs.put("td/1/algo/x.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(stored.size, 8);
        assert!(dir.join("media/td/1/algo/x.pdf").exists());

        blobs.delete("td/1/algo/x.pdf").await.unwrap();
        assert!(matches!(
            blobs.delete("td/1/algo/x.pdf").await,
            Err(StoreError::NotFound(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let dir = temp_base("traversal");
        let blobs = FileBlobStore::new(dir.clone());
        assert!(matches!(
            blobs.put("../../etc/passwd", b"x").await,
            Err(StoreError::ValidationFailed(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
