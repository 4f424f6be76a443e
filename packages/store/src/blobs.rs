//! # BlobStore — opaque binary objects
//!
//! Uploaded files live outside the record tree, keyed by a deterministic
//! path derived from their catalog position. The store returns a retrievable
//! URL alongside the location so catalog records can reference both.
//!
//! Uploads are all-or-nothing; there is no chunking or resume. The ≤50 MB
//! cap is enforced by the caller, not here.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::CatalogType;

/// Result of a successful upload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Store-internal location, recorded in the catalog entry.
    pub location: String,
    /// Retrievable URL for the blob.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
}

/// Async interface to the binary object store.
pub trait BlobStore {
    /// Upload `bytes` under `location`, returning the stored blob metadata.
    fn put(
        &self,
        location: &str,
        bytes: &[u8],
    ) -> impl std::future::Future<Output = Result<StoredBlob, StoreError>>;

    /// Resolve a fresh retrievable URL for a stored location. Locations that
    /// already look like URLs pass through unchanged.
    fn url(&self, location: &str) -> String;

    /// Remove the blob at `location`.
    fn delete(
        &self,
        location: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// Canonical blob location: `{type}/{year}/{module}/{id}.{ext}`.
pub fn blob_path(
    catalog_type: CatalogType,
    year: &str,
    module: &str,
    id: &str,
    ext: &str,
) -> String {
    format!("{catalog_type}/{year}/{module}/{id}.{ext}")
}

/// True when a location is already a full URL and needs no resolution.
pub(crate) fn is_url(location: &str) -> bool {
    location.contains("://") || location.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_path() {
        assert_eq!(
            blob_path(CatalogType::Td, "3", "compta", "ab12", "pdf"),
            "td/3/compta/ab12.pdf"
        );
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.org/x.pdf"));
        assert!(is_url("/media/cours/1/m/x.pdf"));
        assert!(!is_url("cours/1/m/x.pdf"));
    }
}
