//! Process-wide storage backend using the OnceCell pattern.
//!
//! The server holds one set of adapters over a filesystem-backed tree and
//! blob store. The data directory comes from `PORTAL_DATA_DIR` (default
//! `./portal-data`); `portal.toml` inside it tunes upload validation and the
//! list of enrollment years.

use std::path::PathBuf;

use tokio::sync::OnceCell;

use store::{
    Catalog, CredentialStore, FileBlobStore, FileTreeStore, NewUser, PortalConfig, Role,
    StoreError,
};

static BACKEND: OnceCell<Backend> = OnceCell::const_new();

/// The server-side adapters plus deployment configuration.
pub struct Backend {
    pub credentials: CredentialStore<FileTreeStore>,
    pub catalog: Catalog<FileTreeStore, FileBlobStore>,
    pub config: PortalConfig,
    pub data_dir: PathBuf,
    /// Directory served at `/media` by the web server.
    pub media_dir: PathBuf,
}

/// Get or initialize the backend.
pub async fn backend() -> Result<&'static Backend, StoreError> {
    BACKEND
        .get_or_try_init(|| async {
            dotenvy::dotenv().ok();

            let data_dir = std::env::var("PORTAL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./portal-data"));
            std::fs::create_dir_all(&data_dir).map_err(StoreError::unavailable)?;

            let config = load_config(&data_dir)?;
            let tree = FileTreeStore::new(data_dir.clone());
            let blobs = FileBlobStore::new(data_dir.clone());
            let media_dir = blobs.media_dir();

            let backend = Backend {
                credentials: CredentialStore::new(tree.clone()),
                catalog: Catalog::new(tree, blobs),
                config,
                data_dir,
                media_dir,
            };
            bootstrap_admin(&backend).await?;
            Ok(backend)
        })
        .await
}

fn load_config(data_dir: &std::path::Path) -> Result<PortalConfig, StoreError> {
    let path = data_dir.join(PortalConfig::filename());
    match std::fs::read_to_string(&path) {
        Ok(text) => PortalConfig::from_toml(&text).map_err(StoreError::unavailable),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PortalConfig::default()),
        Err(e) => Err(StoreError::unavailable(e)),
    }
}

/// Seed an admin account when the credential map is empty, so a fresh
/// deployment is reachable.
async fn bootstrap_admin(backend: &Backend) -> Result<(), StoreError> {
    if !backend.credentials.list_users().await?.is_empty() {
        return Ok(());
    }

    let password = match std::env::var("PORTAL_ADMIN_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ => {
            tracing::warn!("PORTAL_ADMIN_PASSWORD not set, seeding default admin password");
            "admin123".to_string()
        }
    };

    let uid = backend
        .credentials
        .add_user(NewUser {
            username: "admin".to_string(),
            password,
            full_name: "Administrateur".to_string(),
            email: "admin@localhost".to_string(),
            role: Role::Admin,
            year: None,
        })
        .await?;
    tracing::info!(%uid, "seeded initial admin account");
    Ok(())
}
