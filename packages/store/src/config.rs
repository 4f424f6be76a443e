//! # Portal configuration — `portal.toml`
//!
//! Deployment-level settings read from the data directory at startup. A
//! missing or empty file is equivalent to the defaults.
//!
//! ```toml
//! [catalog]
//! years = ["1", "2", "3", "4", "5"]
//!
//! [uploads]
//! max_size_mb = 50
//! allowed_extensions = ["pdf", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "zip", "rar", "txt"]
//! ```

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `portal.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
}

/// Catalog structure settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Enrollment years offered by the department.
    #[serde(default = "default_years")]
    pub years: Vec<String>,
}

/// Upload validation settings, enforced by the caller before the blob store
/// is touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_years() -> Vec<String> {
    ["1", "2", "3", "4", "5"].map(String::from).to_vec()
}

fn default_max_size_mb() -> u64 {
    50
}

fn default_extensions() -> Vec<String> {
    ["pdf", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "zip", "rar", "txt"]
        .map(String::from)
        .to_vec()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            years: default_years(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
            allowed_extensions: default_extensions(),
        }
    }
}

impl PortalConfig {
    /// The well-known filename inside the data directory.
    pub fn filename() -> &'static str {
        "portal.toml"
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Maximum upload size in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.uploads.max_size_mb * 1024 * 1024
    }

    pub fn extension_allowed(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.uploads.allowed_extensions.iter().any(|e| *e == ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PortalConfig::default();
        assert_eq!(config.uploads.max_size_mb, 50);
        assert!(config.extension_allowed("PDF"));
        assert!(!config.extension_allowed("exe"));
        assert_eq!(config.catalog.years.len(), 5);
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml = r#"
            [uploads]
            max_size_mb = 10
            allowed_extensions = ["pdf"]
        "#;
        let config = PortalConfig::from_toml(toml).unwrap();
        assert_eq!(config.uploads.max_size_mb, 10);
        assert!(!config.extension_allowed("zip"));
        // Missing sections fall back to defaults.
        assert_eq!(config.catalog.years, PortalConfig::default().catalog.years);

        let text = config.to_toml().unwrap();
        assert_eq!(PortalConfig::from_toml(&text).unwrap(), config);
    }
}
