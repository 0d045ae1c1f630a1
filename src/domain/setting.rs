//! Setting domain types.

use super::error::AppError;
use serde::{Deserialize, Serialize};

/// One DWORD value under the current user's hive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryValueRef {
    /// Path relative to `HKEY_CURRENT_USER`.
    pub key_path: String,
    pub value_name: String,
    /// When set, a stored `1` means the feature is off.
    pub inverted: bool,
}

impl RegistryValueRef {
    pub fn new(key_path: impl Into<String>, value_name: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
            value_name: value_name.into(),
            inverted: false,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Whether `raw` means "feature turned off" for this value.
    pub fn reads_as_disabled(&self, raw: u32) -> bool {
        if self.inverted {
            raw != 0
        } else {
            raw == 0
        }
    }

    /// Data to write so the feature ends up off (`enable`) or back on.
    pub fn data_for(&self, enable: bool) -> u32 {
        u32::from(self.inverted == enable)
    }
}

/// One toggle's worth of configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDefinition {
    pub id: String,
    pub label: String,
    pub values: Vec<RegistryValueRef>,
    pub requires_admin: bool,
}

impl SettingDefinition {
    /// Distinct key paths, in catalog order.
    pub fn key_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::with_capacity(self.values.len());
        for value in &self.values {
            if !paths
                .iter()
                .any(|p| p.eq_ignore_ascii_case(value.key_path.as_str()))
            {
                paths.push(&value.key_path);
            }
        }
        paths
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleState {
    /// Control is inert: missing elevation or unreadable registry state.
    Disabled,
    /// Every value reads "feature off".
    On,
    /// At least one value reads "feature on".
    Off,
}

impl ToggleState {
    pub fn is_checked(&self) -> bool {
        matches!(self, Self::On)
    }

    pub fn is_interactive(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// Reconciled view of one setting, as handed to the window.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingStatus {
    pub id: String,
    pub label: String,
    pub requires_admin: bool,
    pub state: ToggleState,
    /// Every key of the setting already exists.
    pub configured: bool,
    pub error: Option<AppError>,
}
