//! # API crate — shared fullstack server functions for the course portal
//!
//! Defines every Dioxus server function the web frontend calls, along with
//! the supporting modules they depend on.
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`backend`] | `server` | Process-wide storage adapters (lazy `OnceCell` singleton) |
//! | [`fallback`] | `server` | Static `index.json` catalog for unauthenticated visitors |
//! | [`session`] | — | Session keys and the client-safe [`SessionUser`] projection |
//! | [`validate`] | — | Field/file/link validation shared with tests |
//!
//! Reads of the catalog are public. Every mutation re-validates the caller's
//! role against the server-side session before touching the store — the
//! client's mirrored role flag is a UI convenience, never an authorization
//! source.
//!
//! Error policy: adapters return [`store::StoreError`] with human-readable
//! messages; server functions forward those messages in `ServerFnError` and
//! views display them as toasts. Nothing is retried automatically.

use dioxus::prelude::*;

#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod fallback;
pub mod session;
pub mod validate;

pub use session::SessionUser;
pub use store::{
    CatalogType, FallbackEntry, NewResource, NewUser, Resource, ResourceKind, Role, UserProfile,
    UserUpdate,
};

#[cfg(feature = "server")]
fn to_server_err(e: store::StoreError) -> ServerFnError {
    ServerFnError::new(e.to_string())
}

#[cfg(feature = "server")]
async fn current_session_user(
    session: &tower_sessions::Session,
) -> Result<Option<SessionUser>, ServerFnError> {
    let uid: Option<String> = session
        .get(session::SESSION_UID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    let Some(uid) = uid else {
        return Ok(None);
    };

    let backend = backend::backend().await.map_err(to_server_err)?;
    match backend.credentials.get_user(&uid).await {
        Ok(profile) if profile.is_active => Ok(Some(SessionUser {
            uid: profile.uid,
            username: profile.username,
            full_name: profile.full_name,
            role: profile.role,
        })),
        // Deleted or deactivated since login: drop the stale session.
        Ok(_) | Err(store::StoreError::NotFound(_)) => {
            session
                .flush()
                .await
                .map_err(|e| ServerFnError::new(e.to_string()))?;
            Ok(None)
        }
        Err(e) => Err(to_server_err(e)),
    }
}

/// Reject callers whose server-side session does not carry the admin role.
#[cfg(feature = "server")]
async fn require_admin() -> Result<SessionUser, ServerFnError> {
    let session: tower_sessions::Session = extract().await?;
    match current_session_user(&session).await? {
        Some(user) if user.is_admin() => Ok(user),
        Some(_) => Err(to_server_err(store::StoreError::AuthorizationDenied)),
        None => Err(to_server_err(store::StoreError::AuthenticationRequired)),
    }
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Get the current authenticated user from the session.
#[server]
pub async fn current_user() -> Result<Option<SessionUser>, ServerFnError> {
    let session: tower_sessions::Session = extract().await?;
    current_session_user(&session).await
}

/// Log in with username and password.
///
/// Failure is a single opaque message: wrong username, wrong password, and
/// a deactivated account are indistinguishable to the caller.
#[server]
pub async fn login(username: String, password: String) -> Result<SessionUser, ServerFnError> {
    let backend = backend::backend().await.map_err(to_server_err)?;
    let found = backend
        .credentials
        .find_user_for_login(&username, &password)
        .await
        .map_err(to_server_err)?;

    let Some(credential) = found else {
        return Err(ServerFnError::new("invalid username or password"));
    };

    let session: tower_sessions::Session = extract().await?;
    session
        .insert(session::SESSION_UID_KEY, credential.uid.clone())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    session
        .insert(session::SESSION_ROLE_KEY, credential.role.as_str().to_string())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let profile = backend
        .credentials
        .get_user(&credential.uid)
        .await
        .map_err(to_server_err)?;
    tracing::info!(uid = %profile.uid, role = %profile.role.as_str(), "login");
    Ok(SessionUser {
        uid: profile.uid,
        username: profile.username,
        full_name: profile.full_name,
        role: profile.role,
    })
}

/// Log out the current user by clearing the session.
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    let session: tower_sessions::Session = extract().await?;
    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// User management (admin only)
// ---------------------------------------------------------------------------

/// List all user profiles for the dashboard.
#[server]
pub async fn list_users() -> Result<Vec<UserProfile>, ServerFnError> {
    require_admin().await?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend.credentials.list_users().await.map_err(to_server_err)
}

/// Create a user. Returns the assigned uid.
#[server]
pub async fn add_user(input: NewUser) -> Result<String, ServerFnError> {
    require_admin().await?;
    validate::validate_new_user(&input).map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend.credentials.add_user(input).await.map_err(to_server_err)
}

/// Apply a partial update to a user.
#[server]
pub async fn update_user(uid: String, update: UserUpdate) -> Result<(), ServerFnError> {
    require_admin().await?;
    if let Some(ref password) = update.password {
        if !password.is_empty() && password.len() < 6 {
            return Err(ServerFnError::new("password must be at least 6 characters"));
        }
    }
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .credentials
        .update_user(&uid, update)
        .await
        .map_err(to_server_err)
}

/// Hard-delete a user.
#[server]
pub async fn delete_user(uid: String) -> Result<(), ServerFnError> {
    let admin = require_admin().await?;
    if admin.uid == uid {
        return Err(ServerFnError::new("you cannot delete your own account"));
    }
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend.credentials.delete_user(&uid).await.map_err(to_server_err)
}

/// Activate or deactivate a user.
#[server]
pub async fn toggle_user_status(uid: String, is_active: bool) -> Result<(), ServerFnError> {
    let admin = require_admin().await?;
    if admin.uid == uid && !is_active {
        return Err(ServerFnError::new("you cannot deactivate your own account"));
    }
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .credentials
        .toggle_user_status(&uid, is_active)
        .await
        .map_err(to_server_err)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Years configured for the department, for the browse and upload forms.
#[server]
pub async fn list_years() -> Result<Vec<String>, ServerFnError> {
    let backend = backend::backend().await.map_err(to_server_err)?;
    Ok(backend.config.catalog.years.clone())
}

/// Module names under `(catalog_type, year)`.
#[server]
pub async fn list_modules(catalog_type: String, year: String) -> Result<Vec<String>, ServerFnError> {
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .catalog
        .list_modules(catalog_type, &year)
        .await
        .map_err(to_server_err)
}

/// Resources under a module, newest first.
#[server]
pub async fn list_resources(
    catalog_type: String,
    year: String,
    module: String,
) -> Result<Vec<Resource>, ServerFnError> {
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .catalog
        .list_resources(catalog_type, &year, &module)
        .await
        .map_err(to_server_err)
}

/// Upload a file resource.
#[server]
pub async fn upload_resource(
    catalog_type: String,
    year: String,
    module: String,
    name: String,
    ext: String,
    bytes: Vec<u8>,
) -> Result<Resource, ServerFnError> {
    require_admin().await?;
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    validate::validate_upload(&name, &ext, bytes.len() as u64, &backend.config)
        .map_err(to_server_err)?;

    let resource = backend
        .catalog
        .add_resource(
            NewResource::File { name, ext, bytes },
            catalog_type,
            &year,
            &module,
        )
        .await
        .map_err(to_server_err)?;
    tracing::info!(id = %resource.id, %catalog_type, year, module, "uploaded resource");
    Ok(resource)
}

/// Add an external link resource.
#[server]
pub async fn add_link(
    catalog_type: String,
    year: String,
    module: String,
    name: String,
    url: String,
) -> Result<Resource, ServerFnError> {
    require_admin().await?;
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    validate::validate_link(&name, &url).map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .catalog
        .add_resource(NewResource::Link { name, url }, catalog_type, &year, &module)
        .await
        .map_err(to_server_err)
}

/// Delete a resource. Deleting an already-gone id is a no-op.
#[server]
pub async fn delete_resource(
    catalog_type: String,
    year: String,
    module: String,
    id: String,
) -> Result<(), ServerFnError> {
    require_admin().await?;
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .catalog
        .delete_resource(catalog_type, &year, &module, &id)
        .await
        .map_err(to_server_err)?;
    Ok(())
}

/// Delete several resources concurrently. Partial failure surfaces as one
/// aggregate error; succeeded deletions are kept.
#[server]
pub async fn delete_resources(
    catalog_type: String,
    year: String,
    module: String,
    ids: Vec<String>,
) -> Result<usize, ServerFnError> {
    require_admin().await?;
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    let outcome = backend
        .catalog
        .delete_resources(catalog_type, &year, &module, &ids)
        .await;
    if outcome.failed.is_empty() {
        Ok(outcome.removed)
    } else {
        Err(ServerFnError::new(format!(
            "{} of {} deletions failed ({} removed)",
            outcome.failed.len(),
            ids.len(),
            outcome.removed
        )))
    }
}

/// Create an empty module.
#[server]
pub async fn add_module(
    catalog_type: String,
    year: String,
    module: String,
) -> Result<(), ServerFnError> {
    require_admin().await?;
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .catalog
        .add_module(catalog_type, &year, &module)
        .await
        .map_err(to_server_err)
}

/// Rename a module, keeping its resources.
#[server]
pub async fn rename_module(
    catalog_type: String,
    year: String,
    from: String,
    to: String,
) -> Result<(), ServerFnError> {
    require_admin().await?;
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .catalog
        .rename_module(catalog_type, &year, &from, &to)
        .await
        .map_err(to_server_err)
}

/// Delete a module and its resources.
#[server]
pub async fn delete_module(
    catalog_type: String,
    year: String,
    module: String,
) -> Result<(), ServerFnError> {
    require_admin().await?;
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    backend
        .catalog
        .delete_module(catalog_type, &year, &module)
        .await
        .map_err(to_server_err)
}

/// Static fallback catalog for a catalog type, shown when the live store is
/// unreachable or empty.
#[server]
pub async fn fallback_catalog(catalog_type: String) -> Result<Vec<FallbackEntry>, ServerFnError> {
    let catalog_type: CatalogType = catalog_type.parse().map_err(to_server_err)?;
    let backend = backend::backend().await.map_err(to_server_err)?;
    fallback::load_fallback(&backend.data_dir, catalog_type)
        .await
        .map_err(to_server_err)
}
