//! In-memory hive with fault injection.

use super::registry::{Registry, RegistryKey};
use crate::domain::{AppError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Hive {
    keys: HashMap<String, HashMap<String, u32>>,
    denied: HashSet<String>,
    failing_creates: HashSet<String>,
    failing_writes: HashSet<(String, String)>,
}

/// Case-insensitive registry living in process memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    hive: Arc<Mutex<Hive>>,
}

fn normalize(s: &str) -> String {
    s.trim_end_matches('\\').to_ascii_lowercase()
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user() -> Self {
        Self::new()
    }

    fn hive(&self) -> MutexGuard<'_, Hive> {
        self.hive.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `data`, creating the key if needed.
    pub fn set(&self, path: &str, name: &str, data: u32) {
        self.hive()
            .keys
            .entry(normalize(path))
            .or_default()
            .insert(normalize(name), data);
    }

    pub fn get(&self, path: &str, name: &str) -> Option<u32> {
        self.hive()
            .keys
            .get(&normalize(path))
            .and_then(|values| values.get(&normalize(name)).copied())
    }

    pub fn create_key(&self, path: &str) {
        self.hive().keys.entry(normalize(path)).or_default();
    }

    /// Every access to `path` fails with `KeyAccessDenied`.
    pub fn deny(&self, path: &str) {
        self.hive().denied.insert(normalize(path));
    }

    /// Creating `path` fails with `KeyCreateFailed` unless it already exists.
    pub fn fail_create(&self, path: &str) {
        self.hive().failing_creates.insert(normalize(path));
    }

    /// Writing `name` under `path` fails with `ValueWriteFailed`.
    pub fn fail_write(&self, path: &str, name: &str) {
        self.hive()
            .failing_writes
            .insert((normalize(path), normalize(name)));
    }

    pub fn key_count(&self) -> usize {
        self.hive().keys.len()
    }

    fn check_access(hive: &Hive, path: &str) -> Result<()> {
        if hive.denied.contains(&normalize(path)) {
            return Err(AppError::KeyAccessDenied {
                path: path.to_string(),
                reason: "access is denied".into(),
            });
        }
        Ok(())
    }
}

impl Registry for MemoryRegistry {
    type Key = MemoryKey;

    fn key_exists(&self, path: &str) -> Result<bool> {
        let hive = self.hive();
        Self::check_access(&hive, path)?;
        Ok(hive.keys.contains_key(&normalize(path)))
    }

    fn read_dword(&self, path: &str, name: &str) -> Result<Option<u32>> {
        let hive = self.hive();
        Self::check_access(&hive, path)?;
        Ok(hive
            .keys
            .get(&normalize(path))
            .and_then(|values| values.get(&normalize(name)).copied()))
    }

    fn open_or_create(&self, path: &str) -> Result<MemoryKey> {
        let mut hive = self.hive();
        Self::check_access(&hive, path)?;

        let key = normalize(path);
        if !hive.keys.contains_key(&key) {
            if hive.failing_creates.contains(&key) {
                return Err(AppError::KeyCreateFailed {
                    path: path.to_string(),
                    reason: "the system cannot create the key".into(),
                });
            }
            hive.keys.insert(key, HashMap::new());
        }

        Ok(MemoryKey {
            path: path.to_string(),
            hive: Arc::clone(&self.hive),
        })
    }
}

/// Open handle into a [`MemoryRegistry`].
#[derive(Debug)]
pub struct MemoryKey {
    path: String,
    hive: Arc<Mutex<Hive>>,
}

impl RegistryKey for MemoryKey {
    fn path(&self) -> &str {
        &self.path
    }

    fn write_int(&self, name: &str, data: u32) -> Result<()> {
        let mut hive = self.hive.lock().unwrap_or_else(PoisonError::into_inner);
        let key = normalize(&self.path);

        if hive.failing_writes.contains(&(key.clone(), normalize(name))) {
            return Err(AppError::ValueWriteFailed {
                path: self.path.clone(),
                name: name.to_string(),
                reason: "the device is not ready".into(),
            });
        }

        hive.keys
            .entry(key)
            .or_default()
            .insert(normalize(name), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_and_names_are_case_insensitive() {
        let reg = MemoryRegistry::new();
        reg.set(r"Software\Test\", "Enabled", 1);
        assert_eq!(reg.read_dword(r"software\TEST", "enabled").unwrap(), Some(1));
        assert!(reg.key_exists(r"SOFTWARE\test").unwrap());
    }

    #[test]
    fn reads_never_create_keys() {
        let reg = MemoryRegistry::new();
        assert_eq!(reg.read_dword(r"Software\Missing", "Enabled").unwrap(), None);
        assert_eq!(reg.read_int(r"Software\Missing", "Enabled", 0).unwrap(), 0);
        assert!(!reg.key_exists(r"Software\Missing").unwrap());
        assert_eq!(reg.key_count(), 0);
    }

    #[test]
    fn writes_go_through_handles() {
        let reg = MemoryRegistry::new();
        {
            let key = reg.open_or_create(r"Software\Test").unwrap();
            assert_eq!(key.path(), r"Software\Test");
            key.write_int("Enabled", 0).unwrap();
        }
        assert_eq!(reg.get(r"Software\Test", "Enabled"), Some(0));
    }

    #[test]
    fn denied_keys_fail_every_access() {
        let reg = MemoryRegistry::new();
        reg.deny(r"Software\Locked");
        assert!(matches!(
            reg.key_exists(r"Software\Locked"),
            Err(AppError::KeyAccessDenied { .. })
        ));
        assert!(reg.read_dword(r"Software\Locked", "X").is_err());
        assert!(reg.open_or_create(r"Software\Locked").is_err());
    }

    #[test]
    fn injected_create_and_write_failures() {
        let reg = MemoryRegistry::new();
        reg.fail_create(r"Software\NoCreate");
        assert!(matches!(
            reg.open_or_create(r"Software\NoCreate"),
            Err(AppError::KeyCreateFailed { .. })
        ));

        reg.fail_write(r"Software\Test", "Broken");
        let key = reg.open_or_create(r"Software\Test").unwrap();
        key.write_int("Fine", 1).unwrap();
        assert!(matches!(
            key.write_int("Broken", 1),
            Err(AppError::ValueWriteFailed { .. })
        ));
        assert_eq!(reg.get(r"Software\Test", "Broken"), None);
    }
}
