//! Caller-side validation, applied before any adapter is touched.
//!
//! The storage layer does not enforce field constraints; everything here
//! maps to `StoreError::ValidationFailed` with a message the views display
//! as-is.

use store::{NewUser, PortalConfig, StoreError};

/// Validate an upload before the blob store sees it: non-empty name, size
/// under the configured cap, extension on the whitelist.
pub fn validate_upload(
    name: &str,
    ext: &str,
    size: u64,
    config: &PortalConfig,
) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::ValidationFailed("a name is required".into()));
    }
    if !config.extension_allowed(ext) {
        return Err(StoreError::ValidationFailed(format!(
            "file type .{ext} is not allowed"
        )));
    }
    if size == 0 {
        return Err(StoreError::ValidationFailed("the file is empty".into()));
    }
    if size > config.max_size_bytes() {
        return Err(StoreError::ValidationFailed(format!(
            "file exceeds the {} MB limit",
            config.uploads.max_size_mb
        )));
    }
    Ok(())
}

/// Validate an external link: non-empty name, http(s) URL.
pub fn validate_link(name: &str, url: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::ValidationFailed("a name is required".into()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(StoreError::ValidationFailed(
            "the link must start with http:// or https://".into(),
        ));
    }
    Ok(())
}

/// Validate a user creation form.
pub fn validate_new_user(input: &NewUser) -> Result<(), StoreError> {
    if input.username.trim().is_empty() {
        return Err(StoreError::ValidationFailed("username is required".into()));
    }
    if input.password.len() < 6 {
        return Err(StoreError::ValidationFailed(
            "password must be at least 6 characters".into(),
        ));
    }
    if input.full_name.trim().is_empty() {
        return Err(StoreError::ValidationFailed("full name is required".into()));
    }
    if !input.email.contains('@') {
        return Err(StoreError::ValidationFailed("invalid email address".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::Role;

    #[test]
    fn test_validate_upload() {
        let config = PortalConfig::default();
        assert!(validate_upload("ch1", "pdf", 1024, &config).is_ok());
        assert!(validate_upload("", "pdf", 1024, &config).is_err());
        assert!(validate_upload("ch1", "exe", 1024, &config).is_err());
        assert!(validate_upload("ch1", "pdf", 0, &config).is_err());
        assert!(validate_upload("ch1", "pdf", 51 * 1024 * 1024, &config).is_err());
        // Cap is inclusive.
        assert!(validate_upload("ch1", "pdf", 50 * 1024 * 1024, &config).is_ok());
    }

    #[test]
    fn test_validate_link() {
        assert!(validate_link("poly", "https://example.org/x.pdf").is_ok());
        assert!(validate_link("poly", "ftp://example.org/x.pdf").is_err());
        assert!(validate_link("poly", "javascript:alert(1)").is_err());
        assert!(validate_link("", "https://example.org").is_err());
    }

    #[test]
    fn test_validate_new_user() {
        let user = NewUser {
            username: "amina".to_string(),
            password: "secret1".to_string(),
            full_name: "Amina B.".to_string(),
            email: "amina@example.org".to_string(),
            role: Role::Student,
            year: Some("2".to_string()),
        };
        assert!(validate_new_user(&user).is_ok());
        assert!(validate_new_user(&NewUser {
            password: "short".to_string(),
            ..user.clone()
        })
        .is_err());
        assert!(validate_new_user(&NewUser {
            email: "not-an-email".to_string(),
            ..user
        })
        .is_err());
    }
}
