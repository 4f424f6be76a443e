//! # Domain models for users and catalog resources
//!
//! Defines the records stored in the portal tree and the inputs the adapters
//! accept. These types are `Serialize + Deserialize` so they can cross the
//! server/client boundary via Dioxus server functions, and they double as the
//! on-disk JSON shapes (camelCase field names, matching the records described
//! in the data model).
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Role`] | `student` or `admin`; admin unlocks the management dashboard. |
//! | [`CatalogType`] | `cours` (course materials) or `td` (tutorial materials). |
//! | [`Credential`] | Publicly-readable login record under `login_credentials/{uid}`. |
//! | [`UserProfile`] | Protected profile record under `users/{uid}`, superset of [`Credential`]. |
//! | [`Resource`] | A file or external link under `resources/{type}/{year}/{module}/{id}`. |
//! | [`NewUser`] / [`UserUpdate`] / [`NewResource`] | Adapter inputs. |
//! | [`FallbackEntry`] | One row of the static `index.json` fallback catalog. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StoreError;

/// User role. Admin unlocks the management dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(StoreError::ValidationFailed(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// Which catalog a resource belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogType {
    Cours,
    Td,
}

impl CatalogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogType::Cours => "cours",
            CatalogType::Td => "td",
        }
    }
}

impl FromStr for CatalogType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cours" => Ok(CatalogType::Cours),
            "td" => Ok(CatalogType::Td),
            other => Err(StoreError::ValidationFailed(format!(
                "unknown catalog type: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for CatalogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publicly-readable credential record, stored under `login_credentials/{uid}`.
///
/// Kept separate from [`UserProfile`] so unauthenticated clients never see
/// personal data. The two records are dual-written on every mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(default)]
    pub uid: String,
    pub username: String,
    /// SHA-256 hex digest of the password.
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// Protected profile record, stored under `users/{uid}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    /// Enrollment cohort; only meaningful when `role == Student`.
    #[serde(default)]
    pub year: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub year: Option<String>,
}

/// Partial update for an existing user. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    /// Re-hashed only when supplied.
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub year: Option<String>,
}

/// Whether a resource is an uploaded file or an external link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Link,
}

/// A catalog entry shown to students, stored under
/// `resources/{type}/{year}/{module}/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    /// Retrievable URL: `/media/...` for files, the target for links.
    pub url: String,
    /// Blob store location; present only for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// File extension; present only for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    /// Size in bytes; present only for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// Normalize a raw catalog entry into a uniform `Resource`.
    ///
    /// Older records are heterogeneous: links may lack a `type` tag, file
    /// records may carry `description` instead of `name` or `downloadURL`
    /// instead of `url`. Entries that cannot be made sense of are skipped.
    pub fn from_entry(id: &str, value: &serde_json::Value) -> Option<Resource> {
        let obj = value.as_object()?;

        let name = obj
            .get("name")
            .or_else(|| obj.get("description"))
            .and_then(|v| v.as_str())?
            .to_string();
        let url = obj
            .get("url")
            .or_else(|| obj.get("downloadURL"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let location = obj
            .get("location")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let kind = match obj.get("type").and_then(|v| v.as_str()) {
            Some("file") => ResourceKind::File,
            Some("link") => ResourceKind::Link,
            // Untagged records: a blob location means a file.
            _ if location.is_some() => ResourceKind::File,
            _ => ResourceKind::Link,
        };

        let ext = obj
            .get("ext")
            .or_else(|| obj.get("fileType"))
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let size = obj.get("size").and_then(|v| v.as_u64());
        let created_at = obj
            .get("createdAt")
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default();

        Some(Resource {
            id: id.to_string(),
            kind,
            name,
            url,
            location,
            ext,
            size,
            created_at,
        })
    }
}

/// Input for creating a resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NewResource {
    File {
        name: String,
        ext: String,
        bytes: Vec<u8>,
    },
    Link {
        name: String,
        url: String,
    },
}

/// One row of the static fallback catalog (`cours/index.json`, `td/index.json`)
/// served to unauthenticated visitors when the live store is unreachable or
/// empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEntry {
    pub name: String,
    pub url: String,
    pub uploaded_at: String,
    pub year: String,
    pub ext: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Student.as_str(), "student");
        assert!("prof".parse::<Role>().is_err());
    }

    #[test]
    fn test_catalog_type_parse() {
        assert_eq!("td".parse::<CatalogType>().unwrap(), CatalogType::Td);
        assert!("exam".parse::<CatalogType>().is_err());
    }

    #[test]
    fn test_resource_from_tagged_file_entry() {
        let entry = json!({
            "type": "file",
            "name": "chapitre-1",
            "url": "/media/cours/3/compta/abc.pdf",
            "location": "cours/3/compta/abc.pdf",
            "ext": "pdf",
            "size": 1024,
            "createdAt": "2024-10-01T12:00:00Z",
        });
        let r = Resource::from_entry("abc", &entry).unwrap();
        assert_eq!(r.kind, ResourceKind::File);
        assert_eq!(r.name, "chapitre-1");
        assert_eq!(r.size, Some(1024));
        assert_eq!(r.ext.as_deref(), Some("pdf"));
    }

    #[test]
    fn test_resource_from_legacy_untagged_entry() {
        // Old link records: description + url, no type tag.
        let entry = json!({
            "description": "Polycopié externe",
            "url": "https://example.org/poly.pdf",
        });
        let r = Resource::from_entry("x1", &entry).unwrap();
        assert_eq!(r.kind, ResourceKind::Link);
        assert_eq!(r.name, "Polycopié externe");
        assert_eq!(r.url, "https://example.org/poly.pdf");
    }

    #[test]
    fn test_resource_from_garbage_entry() {
        assert!(Resource::from_entry("x", &json!(true)).is_none());
        assert!(Resource::from_entry("x", &json!({"size": 3})).is_none());
    }
}
