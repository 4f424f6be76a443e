//! Storage adapters and domain models for the course portal.
//!
//! Everything here is UI-free and server-framework-free: a hierarchical
//! record tree ([`TreeStore`]), a binary object store ([`BlobStore`]), and
//! the credential/catalog adapters built on top of them. Two backends are
//! provided, an in-memory one for tests and a filesystem one for the server.

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;

pub mod blobs;
pub mod tree;

mod memory;
pub use memory::{MemoryBlobStore, MemoryTreeStore};

mod file_store;
pub use file_store::{FileBlobStore, FileTreeStore};

pub use blobs::{blob_path, BlobStore, StoredBlob};
pub use catalog::{BulkOutcome, Catalog};
pub use config::PortalConfig;
pub use credentials::CredentialStore;
pub use error::StoreError;
pub use models::{
    CatalogType, Credential, FallbackEntry, NewResource, NewUser, Resource, ResourceKind, Role,
    UserProfile, UserUpdate,
};
pub use tree::TreeStore;
