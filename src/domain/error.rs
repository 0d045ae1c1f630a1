//! Error types for the application.

use thiserror::Error;

pub type Result<T = (), E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Access denied to registry key {path}: {reason}")]
    KeyAccessDenied { path: String, reason: String },

    #[error("Failed to read registry key {path}: {reason}")]
    KeyReadFailed { path: String, reason: String },

    #[error("Failed to create registry key {path}: {reason}")]
    KeyCreateFailed { path: String, reason: String },

    #[error("Failed to write registry value {path}\\{name}: {reason}")]
    ValueWriteFailed {
        path: String,
        name: String,
        reason: String,
    },

    #[error("Registry value {path}\\{name} is not an integer ({found})")]
    UnexpectedValueType {
        path: String,
        name: String,
        found: String,
    },

    #[error(
        "Setting partially applied: wrote [{}], failed on {failed}: {cause}",
        .succeeded.join(", ")
    )]
    PartialApply {
        succeeded: Vec<String>,
        failed: String,
        cause: Box<AppError>,
    },

    #[error("Administrator privileges required to change \"{0}\"")]
    InsufficientPrivilege(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Setting \"{0}\" is already being applied")]
    ToggleInProgress(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Failed to read catalog {path}: {reason}")]
    CatalogRead { path: String, reason: String },

    #[error("Failed to restart as administrator: {0}")]
    Elevation(String),
}

impl AppError {
    /// Message shown in the window's status banner.
    pub fn to_user_string(&self) -> String {
        match self {
            Self::InsufficientPrivilege(_) => {
                format!("{self}. Restart the program as administrator.")
            }
            Self::PartialApply { .. } => {
                format!("{self}. The checkbox shows what was actually written.")
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_apply_lists_written_values() {
        let err = AppError::PartialApply {
            succeeded: vec!["Foo".into(), "Bar".into()],
            failed: "Baz".into(),
            cause: Box::new(AppError::ValueWriteFailed {
                path: "Software\\Test".into(),
                name: "Baz".into(),
                reason: "boom".into(),
            }),
        };
        let text = err.to_string();
        assert!(text.contains("wrote [Foo, Bar]"));
        assert!(text.contains("failed on Baz"));
        assert!(text.contains("boom"));
    }
}
