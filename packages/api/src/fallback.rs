//! Static fallback catalog for unauthenticated visitors.
//!
//! When the live store is unreachable or a catalog is empty, the views fall
//! back to a pre-published `index.json` per catalog type
//! (`<data_dir>/fallback/cours/index.json`, `.../td/index.json`). A missing
//! file is an empty catalog, not an error.

use std::path::Path;

use store::{CatalogType, FallbackEntry, StoreError};

pub async fn load_fallback(
    data_dir: &Path,
    catalog_type: CatalogType,
) -> Result<Vec<FallbackEntry>, StoreError> {
    let path = data_dir
        .join("fallback")
        .join(catalog_type.as_str())
        .join("index.json");
    match tokio::fs::read(&path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::unavailable),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(StoreError::unavailable(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_index_is_empty() {
        let dir = std::env::temp_dir().join(format!("portal_fb_none_{}", std::process::id()));
        let entries = load_fallback(&dir, CatalogType::Cours).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_load_entries() {
        let dir = std::env::temp_dir().join(format!("portal_fb_{}", std::process::id()));
        let td = dir.join("fallback/td");
        std::fs::create_dir_all(&td).unwrap();
        std::fs::write(
            td.join("index.json"),
            r#"[{"name":"serie-1","url":"/static/td/serie-1.pdf","uploadedAt":"2024-09-12","year":"2","ext":"pdf","size":20480}]"#,
        )
        .unwrap();

        let entries = load_fallback(&dir, CatalogType::Td).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "serie-1");
        assert_eq!(entries[0].size, 20480);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
