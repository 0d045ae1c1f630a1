//! Catalog document loading.
//!
//! The document keeps the `appsettings.json` shape:
//!
//! ```json
//! {
//!   "RegistryEntries": {
//!     "advertising_id": [
//!       { "KeyPath": "Software\\Microsoft\\Windows\\CurrentVersion\\AdvertisingInfo",
//!         "KeyName": "Enabled" }
//!     ]
//!   },
//!   "Labels": { "advertising_id": "Disable personalized ads" }
//! }
//! ```

use crate::domain::{builtin_label, AppError, Catalog, RegistryValueRef, Result, SettingDefinition};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Env var naming an explicit catalog document.
pub const CATALOG_ENV: &str = "AD_DISABLER_CATALOG";

/// Document looked up next to the executable.
pub const CATALOG_FILE_NAME: &str = "catalog.json";

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(
        rename = "RegistryEntries",
        alias = "registry_entries",
        deserialize_with = "unique_entries"
    )]
    registry_entries: Vec<(String, serde_json::Value)>,

    #[serde(rename = "Labels", alias = "labels", default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct EntryDocument {
    #[serde(rename = "KeyPath", alias = "key_path")]
    key_path: String,

    #[serde(rename = "KeyName", alias = "value_name")]
    value_name: String,

    #[serde(rename = "ValueInverted", alias = "value_inverted", default)]
    value_inverted: bool,

    #[serde(rename = "RequiresAdminPermissions", alias = "requires_admin", default)]
    requires_admin: bool,
}

/// Collects `RegistryEntries` in document order, rejecting repeated ids.
fn unique_entries<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, serde_json::Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, serde_json::Value)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of setting ids to registry entries")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries: Self::Value = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(id) = map.next_key::<String>()? {
                if entries.iter().any(|(seen, _)| *seen == id) {
                    return Err(de::Error::custom(format!("duplicate setting id \"{id}\"")));
                }
                let value = map.next_value()?;
                entries.push((id, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

/// Parses and validates a catalog document.
///
/// # Errors
///
/// Returns `InvalidCatalog` if the JSON is malformed or describes an invalid
/// catalog.
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let document: CatalogDocument =
        serde_json::from_str(json).map_err(|e| AppError::InvalidCatalog(e.to_string()))?;

    let mut settings = Vec::with_capacity(document.registry_entries.len());
    for (id, entries) in document.registry_entries {
        let entries: Vec<EntryDocument> = serde_json::from_value(entries)
            .map_err(|e| AppError::InvalidCatalog(format!("setting \"{id}\": {e}")))?;

        let requires_admin = entries.iter().any(|e| e.requires_admin);
        let values = entries
            .into_iter()
            .map(|e| RegistryValueRef {
                key_path: e.key_path,
                value_name: e.value_name,
                inverted: e.value_inverted,
            })
            .collect();
        let label = document
            .labels
            .get(&id)
            .cloned()
            .or_else(|| builtin_label(&id))
            .unwrap_or_else(|| id.clone());

        settings.push(SettingDefinition {
            id,
            label,
            values,
            requires_admin,
        });
    }

    Catalog::new(settings)
}

/// Reads and parses the document at `path`.
///
/// # Errors
///
/// Returns `CatalogRead` if the file cannot be read, or `InvalidCatalog`
/// if its contents are invalid.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let json = std::fs::read_to_string(path).map_err(|e| AppError::CatalogRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_catalog(&json)
}

/// Where the catalog document would be found, if anywhere.
///
/// An explicit `AD_DISABLER_CATALOG` always wins, even if the file is
/// missing, so a typo surfaces as an error instead of a silent fallback.
pub fn catalog_path() -> Option<PathBuf> {
    locate_catalog(std::env::var_os(CATALOG_ENV), std::env::current_exe().ok())
}

fn locate_catalog(explicit: Option<OsString>, exe: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(explicit) = explicit.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }

    let exe = exe?;
    let candidate = exe.parent()?.join(CATALOG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Loads the configured catalog document, or falls back to the built-in
/// table.
///
/// # Errors
///
/// Returns an error if a catalog document is configured but unusable.
pub fn resolve_catalog() -> Result<Catalog> {
    catalog_or_builtin(catalog_path().as_deref())
}

fn catalog_or_builtin(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalog document");
            load_catalog(path)
        }
        None => {
            tracing::debug!("using built-in catalog");
            Ok(Catalog::builtin())
        }
    }
}
