//! Registry access adapter - everything the core needs from the hive.

use crate::domain::{AppError, Result};
use std::io;

/// Current-user hive access. Paths are relative to `HKEY_CURRENT_USER`.
pub trait Registry {
    type Key: RegistryKey;

    fn key_exists(&self, path: &str) -> Result<bool>;

    /// `Ok(None)` when the key or the value is absent. Never creates keys.
    fn read_dword(&self, path: &str, name: &str) -> Result<Option<u32>>;

    /// Opens `path` for writing, creating missing keys. The handle is
    /// released when the returned value is dropped.
    fn open_or_create(&self, path: &str) -> Result<Self::Key>;

    fn read_int(&self, path: &str, name: &str, default: u32) -> Result<u32> {
        Ok(self.read_dword(path, name)?.unwrap_or(default))
    }
}

pub trait RegistryKey {
    fn path(&self) -> &str;

    fn write_int(&self, name: &str, data: u32) -> Result<()>;
}

#[cfg(windows)]
pub type SystemRegistry = super::win_registry::WinRegistry;

/// Stand-in hive for hosts without a Windows registry.
#[cfg(not(windows))]
pub type SystemRegistry = super::memory_registry::MemoryRegistry;

#[cfg_attr(not(windows), allow(dead_code))]
fn access_error(path: &str, e: &io::Error) -> AppError {
    AppError::KeyAccessDenied {
        path: path.to_string(),
        reason: e.to_string(),
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn read_error(path: &str, e: &io::Error) -> AppError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        access_error(path, e)
    } else {
        AppError::KeyReadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn create_error(path: &str, e: &io::Error) -> AppError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        access_error(path, e)
    } else {
        AppError::KeyCreateFailed {
            path: path.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn write_error(path: &str, name: &str, e: &io::Error) -> AppError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        access_error(path, e)
    } else {
        AppError::ValueWriteFailed {
            path: path.to_string(),
            name: name.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_map_to_access_denied() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(
            read_error("Software\\X", &denied),
            AppError::KeyAccessDenied { .. }
        ));
        assert!(matches!(
            create_error("Software\\X", &denied),
            AppError::KeyAccessDenied { .. }
        ));
        assert!(matches!(
            write_error("Software\\X", "V", &denied),
            AppError::KeyAccessDenied { .. }
        ));
    }

    #[test]
    fn other_errors_keep_their_kind() {
        let other = io::Error::other("disk on fire");
        assert!(matches!(
            read_error("Software\\X", &other),
            AppError::KeyReadFailed { .. }
        ));
        assert!(matches!(
            create_error("Software\\X", &other),
            AppError::KeyCreateFailed { .. }
        ));
        assert!(matches!(
            write_error("Software\\X", "V", &other),
            AppError::ValueWriteFailed { .. }
        ));
    }
}
