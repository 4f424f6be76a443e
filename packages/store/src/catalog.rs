//! # Resource catalog adapter
//!
//! High-level operations over the `resources/{type}/{year}/{module}/{id}`
//! subtree plus the blob store. This is the layer every view goes through to
//! list modules and resources and to apply admin mutations.
//!
//! Consistency notes, inherited deliberately from the system being ported:
//! last writer wins on every field, there is no versioning, and a module
//! rename is copy-then-delete (both steps land in one multi-path update, so
//! the crash window of the original is narrowed where the backend applies
//! batches atomically). Blob deletion failures during resource deletion are
//! logged and swallowed so the catalog entry is removed regardless — the
//! occasional orphaned blob is preferred over an unreachable catalog entry.

use futures::future::join_all;
use serde_json::Value;

use crate::blobs::{blob_path, BlobStore};
use crate::error::StoreError;
use crate::models::{CatalogType, NewResource, Resource, ResourceKind};
use crate::tree::{self, TreeStore};

/// Placeholder entry written by `add_module` so an empty module is
/// distinguishable from a missing one.
const MODULE_KEEP_KEY: &str = ".keep";

/// Outcome of a bulk deletion: how many records were removed and which ids
/// failed. Succeeded deletions are never rolled back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BulkOutcome {
    pub removed: usize,
    pub failed: Vec<String>,
}

/// Adapter over the resource subtree and the blob store.
#[derive(Clone, Debug)]
pub struct Catalog<S: TreeStore, B: BlobStore> {
    tree: S,
    blobs: B,
}

impl<S: TreeStore, B: BlobStore> Catalog<S, B> {
    pub fn new(tree: S, blobs: B) -> Self {
        Self { tree, blobs }
    }

    fn module_path(catalog_type: CatalogType, year: &str, module: &str) -> String {
        format!("resources/{catalog_type}/{year}/{module}")
    }

    fn resource_path(catalog_type: CatalogType, year: &str, module: &str, id: &str) -> String {
        format!("resources/{catalog_type}/{year}/{module}/{id}")
    }

    /// Module names under `(catalog_type, year)`, sorted.
    pub async fn list_modules(
        &self,
        catalog_type: CatalogType,
        year: &str,
    ) -> Result<Vec<String>, StoreError> {
        let path = format!("resources/{catalog_type}/{year}");
        match self.tree.get(&path).await? {
            Some(node) => Ok(tree::child_keys(&node)),
            None => Ok(Vec::new()),
        }
    }

    /// Resources under a module, flattened into the uniform [`Resource`]
    /// view, newest first.
    pub async fn list_resources(
        &self,
        catalog_type: CatalogType,
        year: &str,
        module: &str,
    ) -> Result<Vec<Resource>, StoreError> {
        let path = Self::module_path(catalog_type, year, module);
        let Some(node) = self.tree.get(&path).await? else {
            return Ok(Vec::new());
        };
        let Some(entries) = node.as_object() else {
            return Ok(Vec::new());
        };
        let mut resources: Vec<Resource> = entries
            .iter()
            .filter(|(id, _)| id.as_str() != MODULE_KEEP_KEY)
            .filter_map(|(id, value)| Resource::from_entry(id, value))
            .map(|mut r| {
                // Refresh the retrievable URL for stored blobs.
                if let Some(ref location) = r.location {
                    r.url = self.blobs.url(location);
                }
                r
            })
            .collect();
        resources.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.name.cmp(&b.name)));
        Ok(resources)
    }

    /// Create a resource. For files the blob is uploaded first, then the
    /// catalog record referencing its location and URL is written. The id is
    /// assigned here, at write time, never by the caller.
    pub async fn add_resource(
        &self,
        input: NewResource,
        catalog_type: CatalogType,
        year: &str,
        module: &str,
    ) -> Result<Resource, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now();

        let resource = match input {
            NewResource::File { name, ext, bytes } => {
                let location = blob_path(catalog_type, year, module, &id, &ext);
                let stored = self.blobs.put(&location, &bytes).await?;
                Resource {
                    id: id.clone(),
                    kind: ResourceKind::File,
                    name,
                    url: stored.url,
                    location: Some(stored.location),
                    ext: Some(ext),
                    size: Some(stored.size),
                    created_at,
                }
            }
            NewResource::Link { name, url } => Resource {
                id: id.clone(),
                kind: ResourceKind::Link,
                name,
                url,
                location: None,
                ext: None,
                size: None,
                created_at,
            },
        };

        self.tree
            .update(vec![(
                Self::resource_path(catalog_type, year, module, &id),
                Some(serde_json::to_value(&resource).map_err(StoreError::unavailable)?),
            )])
            .await?;
        Ok(resource)
    }

    /// Delete a resource record and, for files, its backing blob. Returns
    /// `Ok(false)` when the id was already gone — a repeated delete is a
    /// no-op, never a crash. Blob deletion failures are logged and swallowed.
    pub async fn delete_resource(
        &self,
        catalog_type: CatalogType,
        year: &str,
        module: &str,
        id: &str,
    ) -> Result<bool, StoreError> {
        let path = Self::resource_path(catalog_type, year, module, id);
        let Some(value) = self.tree.get(&path).await? else {
            return Ok(false);
        };

        if let Some(location) = value.get("location").and_then(|v| v.as_str()) {
            if let Err(e) = self.blobs.delete(location).await {
                tracing::warn!(location, error = %e, "blob deletion failed, removing catalog entry anyway");
            }
        }
        self.tree.update(vec![(path, None)]).await?;
        Ok(true)
    }

    /// Delete several resources concurrently. Partial failure is reported in
    /// the outcome; succeeded deletions stick.
    pub async fn delete_resources(
        &self,
        catalog_type: CatalogType,
        year: &str,
        module: &str,
        ids: &[String],
    ) -> BulkOutcome {
        let deletions = ids.iter().map(|id| {
            let id = id.clone();
            async move {
                let result = self
                    .delete_resource(catalog_type, year, module, &id)
                    .await;
                (id, result)
            }
        });

        let mut outcome = BulkOutcome::default();
        for (id, result) in join_all(deletions).await {
            match result {
                Ok(true) => outcome.removed += 1,
                Ok(false) => outcome.failed.push(id),
                Err(e) => {
                    tracing::warn!(id, error = %e, "bulk delete item failed");
                    outcome.failed.push(id);
                }
            }
        }
        outcome
    }

    /// Create an empty module by writing a placeholder entry.
    pub async fn add_module(
        &self,
        catalog_type: CatalogType,
        year: &str,
        module: &str,
    ) -> Result<(), StoreError> {
        validate_module_name(module)?;
        if self
            .tree
            .get(&Self::module_path(catalog_type, year, module))
            .await?
            .is_some()
        {
            return Err(StoreError::ValidationFailed(format!(
                "module {module} already exists"
            )));
        }
        self.tree
            .update(vec![(
                format!(
                    "{}/{MODULE_KEEP_KEY}",
                    Self::module_path(catalog_type, year, module)
                ),
                Some(Value::Bool(true)),
            )])
            .await
    }

    /// Rename a module: read the full subtree, write it under the new key,
    /// remove the old key. Both writes go into one update batch. Blob
    /// locations recorded inside the entries keep pointing at their old
    /// paths, which stay valid.
    pub async fn rename_module(
        &self,
        catalog_type: CatalogType,
        year: &str,
        from: &str,
        to: &str,
    ) -> Result<(), StoreError> {
        validate_module_name(to)?;
        let from_path = Self::module_path(catalog_type, year, from);
        let to_path = Self::module_path(catalog_type, year, to);

        let subtree = self
            .tree
            .get(&from_path)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("module {from}")))?;
        if self.tree.get(&to_path).await?.is_some() {
            return Err(StoreError::ValidationFailed(format!(
                "module {to} already exists"
            )));
        }

        self.tree
            .update(vec![(to_path, Some(subtree)), (from_path, None)])
            .await
    }

    /// Delete a module and every backing blob it references. Blob failures
    /// follow the same swallow policy as [`delete_resource`].
    ///
    /// [`delete_resource`]: Catalog::delete_resource
    pub async fn delete_module(
        &self,
        catalog_type: CatalogType,
        year: &str,
        module: &str,
    ) -> Result<(), StoreError> {
        let path = Self::module_path(catalog_type, year, module);
        let subtree = self
            .tree
            .get(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("module {module}")))?;

        if let Some(entries) = subtree.as_object() {
            for value in entries.values() {
                if let Some(location) = value.get("location").and_then(|v| v.as_str()) {
                    if let Err(e) = self.blobs.delete(location).await {
                        tracing::warn!(location, error = %e, "blob deletion failed during module delete");
                    }
                }
            }
        }
        self.tree.update(vec![(path, None)]).await
    }
}

fn validate_module_name(module: &str) -> Result<(), StoreError> {
    let module = module.trim();
    if module.is_empty() {
        return Err(StoreError::ValidationFailed("module name is required".into()));
    }
    if module.contains('/') || module == MODULE_KEEP_KEY {
        return Err(StoreError::ValidationFailed(format!(
            "invalid module name: {module}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryBlobStore, MemoryTreeStore};

    const YEAR: &str = "3";

    fn make_catalog() -> (Catalog<MemoryTreeStore, MemoryBlobStore>, MemoryBlobStore) {
        let blobs = MemoryBlobStore::new();
        (
            Catalog::new(MemoryTreeStore::new(), blobs.clone()),
            blobs,
        )
    }

    fn pdf(name: &str) -> NewResource {
        NewResource::File {
            name: name.to_string(),
            ext: "pdf".to_string(),
            bytes: b"%PDF-1.4 test".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_then_list() {
        let (catalog, _) = make_catalog();
        let before = catalog
            .list_resources(CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();
        assert!(before.is_empty());

        let added = catalog
            .add_resource(pdf("chapitre-1"), CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();

        let after = catalog
            .list_resources(CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, added.id);
        assert_eq!(after[0].size, Some(13));
        assert_eq!(after[0].ext.as_deref(), Some("pdf"));
        assert_eq!(after[0].url, format!("/media/cours/3/compta/{}.pdf", added.id));
    }

    #[tokio::test]
    async fn test_link_resource_has_no_blob() {
        let (catalog, blobs) = make_catalog();
        let added = catalog
            .add_resource(
                NewResource::Link {
                    name: "poly".to_string(),
                    url: "https://example.org/poly.pdf".to_string(),
                },
                CatalogType::Td,
                YEAR,
                "algo",
            )
            .await
            .unwrap();
        assert_eq!(added.kind, ResourceKind::Link);
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_is_noop() {
        let (catalog, blobs) = make_catalog();
        let added = catalog
            .add_resource(pdf("ch1"), CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();

        let removed = catalog
            .delete_resource(CatalogType::Cours, YEAR, "compta", &added.id)
            .await
            .unwrap();
        assert!(removed);
        assert!(blobs.is_empty());
        assert!(catalog
            .list_resources(CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap()
            .is_empty());

        // Second delete of the same id is a no-op, not a crash.
        let removed_again = catalog
            .delete_resource(CatalogType::Cours, YEAR, "compta", &added.id)
            .await
            .unwrap();
        assert!(!removed_again);
    }

    #[tokio::test]
    async fn test_list_modules_and_placeholder() {
        let (catalog, _) = make_catalog();
        catalog
            .add_resource(pdf("a"), CatalogType::Cours, YEAR, "droit")
            .await
            .unwrap();
        catalog
            .add_module(CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();

        let modules = catalog.list_modules(CatalogType::Cours, YEAR).await.unwrap();
        assert_eq!(modules, vec!["compta".to_string(), "droit".to_string()]);

        // The placeholder is invisible in resource listings.
        assert!(catalog
            .list_resources(CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap()
            .is_empty());

        assert!(matches!(
            catalog.add_module(CatalogType::Cours, YEAR, "compta").await,
            Err(StoreError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_module_keeps_resources() {
        let (catalog, _) = make_catalog();
        catalog
            .add_resource(pdf("a"), CatalogType::Td, YEAR, "ancien")
            .await
            .unwrap();
        catalog
            .add_resource(pdf("b"), CatalogType::Td, YEAR, "ancien")
            .await
            .unwrap();

        catalog
            .rename_module(CatalogType::Td, YEAR, "ancien", "nouveau")
            .await
            .unwrap();

        let modules = catalog.list_modules(CatalogType::Td, YEAR).await.unwrap();
        assert!(!modules.contains(&"ancien".to_string()));
        assert!(modules.contains(&"nouveau".to_string()));

        let moved = catalog
            .list_resources(CatalogType::Td, YEAR, "nouveau")
            .await
            .unwrap();
        assert_eq!(moved.len(), 2);
        // Old blob locations stay valid after a rename.
        assert!(moved.iter().all(|r| r
            .location
            .as_deref()
            .is_some_and(|l| l.starts_with("td/3/ancien/"))));
    }

    #[tokio::test]
    async fn test_rename_missing_module() {
        let (catalog, _) = make_catalog();
        assert!(matches!(
            catalog
                .rename_module(CatalogType::Td, YEAR, "nope", "mieux")
                .await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_module_removes_blobs() {
        let (catalog, blobs) = make_catalog();
        catalog
            .add_resource(pdf("a"), CatalogType::Cours, YEAR, "stat")
            .await
            .unwrap();
        catalog
            .add_resource(pdf("b"), CatalogType::Cours, YEAR, "stat")
            .await
            .unwrap();
        assert_eq!(blobs.len(), 2);

        catalog
            .delete_module(CatalogType::Cours, YEAR, "stat")
            .await
            .unwrap();
        assert!(blobs.is_empty());
        assert!(catalog
            .list_modules(CatalogType::Cours, YEAR)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_bulk_delete_partial_failure() {
        let (catalog, _) = make_catalog();
        let a = catalog
            .add_resource(pdf("a"), CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();
        let b = catalog
            .add_resource(pdf("b"), CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();
        let c = catalog
            .add_resource(pdf("c"), CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();

        // Three selected, one id forced to fail.
        let ids = vec![a.id.clone(), b.id.clone(), "bogus-id".to_string()];
        let outcome = catalog
            .delete_resources(CatalogType::Cours, YEAR, "compta", &ids)
            .await;
        assert_eq!(outcome.removed, 2);
        assert_eq!(outcome.failed, vec!["bogus-id".to_string()]);

        // Succeeded deletions are not rolled back; one resource remains.
        let remaining = catalog
            .list_resources(CatalogType::Cours, YEAR, "compta")
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, c.id);
    }
}
