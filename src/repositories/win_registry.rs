//! `HKEY_CURRENT_USER` access - thin wrapper over winreg.

use super::registry::{create_error, read_error, write_error, Registry, RegistryKey};
use crate::domain::{AppError, Result};
use std::io;
use winreg::enums::{RegType, HKEY_CURRENT_USER, KEY_READ, KEY_WRITE};
use winreg::RegKey;

/// Stateless: every call opens its own handles from the predefined root.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinRegistry;

fn root() -> RegKey {
    RegKey::predef(HKEY_CURRENT_USER)
}

impl WinRegistry {
    pub fn current_user() -> Self {
        Self
    }

    /// `Ok(None)` if the key does not exist.
    fn open_read(&self, path: &str) -> Result<Option<RegKey>> {
        match root().open_subkey_with_flags(path, KEY_READ) {
            Ok(key) => Ok(Some(key)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(read_error(path, &e)),
        }
    }
}

impl Registry for WinRegistry {
    type Key = WinKey;

    fn key_exists(&self, path: &str) -> Result<bool> {
        Ok(self.open_read(path)?.is_some())
    }

    fn read_dword(&self, path: &str, name: &str) -> Result<Option<u32>> {
        let Some(key) = self.open_read(path)? else {
            return Ok(None);
        };

        let raw = match key.get_raw_value(name) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_error(path, &e)),
        };

        let bytes: &[u8] = &raw.bytes;
        let unexpected = |found: String| AppError::UnexpectedValueType {
            path: path.to_string(),
            name: name.to_string(),
            found,
        };

        match &raw.vtype {
            RegType::REG_DWORD => bytes
                .get(..4)
                .and_then(|b| b.try_into().ok())
                .map(|b| Some(u32::from_le_bytes(b)))
                .ok_or_else(|| unexpected("truncated REG_DWORD".into())),
            RegType::REG_QWORD => bytes
                .get(..8)
                .and_then(|b| b.try_into().ok())
                .map(|b| Some(u32::try_from(u64::from_le_bytes(b)).unwrap_or(u32::MAX)))
                .ok_or_else(|| unexpected("truncated REG_QWORD".into())),
            RegType::REG_SZ | RegType::REG_EXPAND_SZ => {
                let text: String = key
                    .get_value(name)
                    .map_err(|e| read_error(path, &e))?;
                text.trim()
                    .parse::<u32>()
                    .map(Some)
                    .map_err(|_| unexpected(format!("string \"{}\"", text.trim())))
            }
            other => Err(unexpected(format!("{other:?}"))),
        }
    }

    fn open_or_create(&self, path: &str) -> Result<WinKey> {
        let (key, _) = root()
            .create_subkey_with_flags(path, KEY_WRITE)
            .map_err(|e| create_error(path, &e))?;
        Ok(WinKey {
            path: path.to_string(),
            key,
        })
    }
}

/// Write handle; the underlying `HKEY` is closed on drop.
pub struct WinKey {
    path: String,
    key: RegKey,
}

impl RegistryKey for WinKey {
    fn path(&self) -> &str {
        &self.path
    }

    fn write_int(&self, name: &str, data: u32) -> Result<()> {
        self.key
            .set_value(name, &data)
            .map_err(|e| write_error(&self.path, name, &e))
    }
}
