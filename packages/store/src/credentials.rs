//! # Credential store adapter
//!
//! Reads and writes the flat username→credential map used for login, plus
//! the protected profile records. Every mutation dual-writes
//! `login_credentials/{uid}` and `users/{uid}` in a single multi-path
//! [`TreeStore::update`] batch, which the in-memory backend applies
//! atomically.
//!
//! Passwords are stored as unsalted SHA-256 hex digests and matched by
//! digest equality during the login scan. Login failure is a single `None`:
//! wrong username, wrong password, and an inactive account are deliberately
//! indistinguishable to the caller.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::models::{Credential, NewUser, Role, UserProfile, UserUpdate};
use crate::tree::TreeStore;

const CREDENTIALS_PATH: &str = "login_credentials";
const PROFILES_PATH: &str = "users";

/// Strip HTML-like tags and surrounding whitespace from a username.
pub fn sanitize_username(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// SHA-256 hex digest of a plaintext password.
pub fn digest_password(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Adapter over the credential and profile maps.
#[derive(Clone, Debug)]
pub struct CredentialStore<S: TreeStore> {
    tree: S,
}

impl<S: TreeStore> CredentialStore<S> {
    pub fn new(tree: S) -> Self {
        Self { tree }
    }

    /// Check a username/password pair against the credential map.
    ///
    /// Fetches the entire map and linear-scans it: O(n) in the user count,
    /// acceptable for a department-sized user base. Returns `Ok(None)` on
    /// any kind of mismatch.
    pub async fn find_user_for_login(
        &self,
        username: &str,
        raw_password: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let username = sanitize_username(username);
        let digest = digest_password(raw_password);

        let Some(map) = self.tree.get(CREDENTIALS_PATH).await? else {
            return Ok(None);
        };
        let Some(entries) = map.as_object() else {
            return Ok(None);
        };

        for (uid, value) in entries {
            let Ok(mut cred) = serde_json::from_value::<Credential>(value.clone()) else {
                continue;
            };
            cred.uid = uid.clone();
            if cred.username == username && cred.password_hash == digest && cred.is_active {
                return Ok(Some(cred));
            }
        }
        Ok(None)
    }

    /// Create a user, dual-writing profile and credential records. Returns
    /// the assigned uid.
    pub async fn add_user(&self, input: NewUser) -> Result<String, StoreError> {
        let username = sanitize_username(&input.username);
        if username.is_empty() {
            return Err(StoreError::ValidationFailed("username is required".into()));
        }
        if self.username_taken(&username, None).await? {
            return Err(StoreError::ValidationFailed(format!(
                "username {username} already exists"
            )));
        }

        let uid = uuid::Uuid::new_v4().to_string();
        let credential = Credential {
            uid: uid.clone(),
            username: username.clone(),
            password_hash: digest_password(&input.password),
            role: input.role,
            is_active: true,
        };
        let profile = UserProfile {
            uid: uid.clone(),
            username,
            full_name: input.full_name,
            email: input.email,
            role: input.role,
            year: input.year,
            is_active: true,
            created_at: chrono::Utc::now(),
        };

        self.tree
            .update(vec![
                (
                    format!("{CREDENTIALS_PATH}/{uid}"),
                    Some(serde_json::to_value(&credential).map_err(StoreError::unavailable)?),
                ),
                (
                    format!("{PROFILES_PATH}/{uid}"),
                    Some(serde_json::to_value(&profile).map_err(StoreError::unavailable)?),
                ),
            ])
            .await?;
        Ok(uid)
    }

    /// Apply a partial update. Only changed fields are written to the public
    /// credential map; the password is re-hashed only when a new one is
    /// supplied.
    pub async fn update_user(&self, uid: &str, update: UserUpdate) -> Result<(), StoreError> {
        let mut profile = self.get_user(uid).await?;
        let mut ops: Vec<(String, Option<Value>)> = Vec::new();

        if let Some(raw) = update.username {
            let username = sanitize_username(&raw);
            if username.is_empty() {
                return Err(StoreError::ValidationFailed("username is required".into()));
            }
            if username != profile.username && self.username_taken(&username, Some(uid)).await? {
                return Err(StoreError::ValidationFailed(format!(
                    "username {username} already exists"
                )));
            }
            ops.push((
                format!("{CREDENTIALS_PATH}/{uid}/username"),
                Some(Value::String(username.clone())),
            ));
            profile.username = username;
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            ops.push((
                format!("{CREDENTIALS_PATH}/{uid}/passwordHash"),
                Some(Value::String(digest_password(&password))),
            ));
        }
        if let Some(role) = update.role {
            ops.push((
                format!("{CREDENTIALS_PATH}/{uid}/role"),
                Some(Value::String(role.as_str().to_string())),
            ));
            profile.role = role;
        }
        if let Some(full_name) = update.full_name {
            profile.full_name = full_name;
        }
        if let Some(email) = update.email {
            profile.email = email;
        }
        if let Some(year) = update.year {
            profile.year = Some(year);
        }

        ops.push((
            format!("{PROFILES_PATH}/{uid}"),
            Some(serde_json::to_value(&profile).map_err(StoreError::unavailable)?),
        ));
        self.tree.update(ops).await
    }

    /// Hard-delete a user from both maps. No cascade to resources.
    pub async fn delete_user(&self, uid: &str) -> Result<(), StoreError> {
        // Surface NotFound so the dashboard can report a stale row.
        let _ = self.get_user(uid).await?;
        self.tree
            .update(vec![
                (format!("{CREDENTIALS_PATH}/{uid}"), None),
                (format!("{PROFILES_PATH}/{uid}"), None),
            ])
            .await
    }

    /// Flip the active flag in both maps.
    pub async fn toggle_user_status(&self, uid: &str, is_active: bool) -> Result<(), StoreError> {
        let _ = self.get_user(uid).await?;
        self.tree
            .update(vec![
                (
                    format!("{CREDENTIALS_PATH}/{uid}/isActive"),
                    Some(Value::Bool(is_active)),
                ),
                (
                    format!("{PROFILES_PATH}/{uid}/isActive"),
                    Some(Value::Bool(is_active)),
                ),
            ])
            .await
    }

    /// All profile records, sorted by username, for the admin dashboard.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, StoreError> {
        let Some(map) = self.tree.get(PROFILES_PATH).await? else {
            return Ok(Vec::new());
        };
        let Some(entries) = map.as_object() else {
            return Ok(Vec::new());
        };
        let mut users: Vec<UserProfile> = entries
            .iter()
            .filter_map(|(uid, value)| {
                let mut profile = serde_json::from_value::<UserProfile>(value.clone()).ok()?;
                profile.uid = uid.clone();
                Some(profile)
            })
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    /// Fetch one profile record, or `NotFound`.
    pub async fn get_user(&self, uid: &str) -> Result<UserProfile, StoreError> {
        let value = self
            .tree
            .get(&format!("{PROFILES_PATH}/{uid}"))
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {uid}")))?;
        let mut profile =
            serde_json::from_value::<UserProfile>(value).map_err(StoreError::unavailable)?;
        profile.uid = uid.to_string();
        Ok(profile)
    }

    /// Username uniqueness spans active and inactive records.
    async fn username_taken(
        &self,
        username: &str,
        except_uid: Option<&str>,
    ) -> Result<bool, StoreError> {
        let Some(map) = self.tree.get(CREDENTIALS_PATH).await? else {
            return Ok(false);
        };
        let Some(entries) = map.as_object() else {
            return Ok(false);
        };
        Ok(entries.iter().any(|(uid, value)| {
            except_uid != Some(uid.as_str())
                && value.get("username").and_then(|v| v.as_str()) == Some(username)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTreeStore;
    use crate::models::Role;

    fn new_user(username: &str, password: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            full_name: "Test User".to_string(),
            email: format!("{username}@example.org"),
            role,
            year: Some("3".to_string()),
        }
    }

    #[test]
    fn test_sanitize_username() {
        assert_eq!(sanitize_username("  amina "), "amina");
        assert_eq!(sanitize_username("<script>bad</script>amina"), "badamina");
        assert_eq!(sanitize_username("<b>x"), "x");
    }

    #[test]
    fn test_digest_is_fixed_length_hex() {
        let d = digest_password("secret");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(d, digest_password("secret"));
        assert_ne!(d, digest_password("Secret"));
    }

    #[tokio::test]
    async fn test_add_then_login() {
        let store = CredentialStore::new(MemoryTreeStore::new());
        let uid = store
            .add_user(new_user("amina", "pass123", Role::Student))
            .await
            .unwrap();

        let found = store
            .find_user_for_login("amina", "pass123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.uid, uid);
        assert_eq!(found.role, Role::Student);

        // Any other password yields None, not an error.
        assert!(store
            .find_user_for_login("amina", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_user_for_login("nobody", "pass123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_login_sanitizes_username() {
        let store = CredentialStore::new(MemoryTreeStore::new());
        store
            .add_user(new_user("amina", "pass123", Role::Student))
            .await
            .unwrap();
        assert!(store
            .find_user_for_login(" <i>amina</i> ", "pass123")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_even_inactive() {
        let store = CredentialStore::new(MemoryTreeStore::new());
        let uid = store
            .add_user(new_user("amina", "pass123", Role::Student))
            .await
            .unwrap();
        store.toggle_user_status(&uid, false).await.unwrap();

        let err = store
            .add_user(new_user("amina", "other", Role::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login() {
        let store = CredentialStore::new(MemoryTreeStore::new());
        let uid = store
            .add_user(new_user("amina", "pass123", Role::Student))
            .await
            .unwrap();
        store.toggle_user_status(&uid, false).await.unwrap();
        assert!(store
            .find_user_for_login("amina", "pass123")
            .await
            .unwrap()
            .is_none());

        store.toggle_user_status(&uid, true).await.unwrap();
        assert!(store
            .find_user_for_login("amina", "pass123")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_both_maps() {
        let store = CredentialStore::new(MemoryTreeStore::new());
        let uid = store
            .add_user(new_user("amina", "pass123", Role::Admin))
            .await
            .unwrap();
        store.delete_user(&uid).await.unwrap();

        assert!(store
            .find_user_for_login("amina", "pass123")
            .await
            .unwrap()
            .is_none());
        assert!(store.list_users().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_user(&uid).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rehashes_only_when_password_supplied() {
        let store = CredentialStore::new(MemoryTreeStore::new());
        let uid = store
            .add_user(new_user("amina", "pass123", Role::Student))
            .await
            .unwrap();

        store
            .update_user(
                &uid,
                UserUpdate {
                    full_name: Some("Amina B.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // Old password still valid.
        assert!(store
            .find_user_for_login("amina", "pass123")
            .await
            .unwrap()
            .is_some());

        store
            .update_user(
                &uid,
                UserUpdate {
                    password: Some("newpass".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(store
            .find_user_for_login("amina", "pass123")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_user_for_login("amina", "newpass")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_update_username_uniqueness() {
        let store = CredentialStore::new(MemoryTreeStore::new());
        store
            .add_user(new_user("amina", "a", Role::Student))
            .await
            .unwrap();
        let uid = store
            .add_user(new_user("karim", "b", Role::Student))
            .await
            .unwrap();

        let err = store
            .update_user(
                &uid,
                UserUpdate {
                    username: Some("amina".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ValidationFailed(_)));
    }
}
