use crate::domain::Result;
use crate::repositories::{MemoryKey, MemoryRegistry, Registry, RegistryKey};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts every adapter call, key writes included.
pub struct SpyRegistry {
    pub inner: MemoryRegistry,
    calls: Arc<AtomicUsize>,
}

impl SpyRegistry {
    pub fn new() -> Self {
        Self {
            inner: MemoryRegistry::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Registry for SpyRegistry {
    type Key = SpyKey;

    fn key_exists(&self, path: &str) -> Result<bool> {
        self.record();
        self.inner.key_exists(path)
    }

    fn read_dword(&self, path: &str, name: &str) -> Result<Option<u32>> {
        self.record();
        self.inner.read_dword(path, name)
    }

    fn open_or_create(&self, path: &str) -> Result<SpyKey> {
        self.record();
        Ok(SpyKey {
            inner: self.inner.open_or_create(path)?,
            calls: Arc::clone(&self.calls),
        })
    }
}

pub struct SpyKey {
    inner: MemoryKey,
    calls: Arc<AtomicUsize>,
}

impl RegistryKey for SpyKey {
    fn path(&self) -> &str {
        self.inner.path()
    }

    fn write_int(&self, name: &str, data: u32) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.write_int(name, data)
    }
}
