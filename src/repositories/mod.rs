//! Side-effecting adapters: registry, catalog documents, elevation.

pub mod catalog_file;
pub mod elevation;
pub mod memory_registry;
pub mod registry;
#[cfg(windows)]
pub mod win_registry;

pub use catalog_file::{load_catalog, parse_catalog, resolve_catalog};
pub use elevation::{is_elevated, restart_as_admin};
pub use memory_registry::{MemoryKey, MemoryRegistry};
pub use registry::{Registry, RegistryKey, SystemRegistry};
#[cfg(windows)]
pub use win_registry::{WinKey, WinRegistry};
