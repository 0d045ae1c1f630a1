pub mod domain;
pub mod repositories;
pub mod services;

// Public, stable-ish API surface for consumers (UI / other crates)

pub use crate::domain::{
    AppError, Catalog, RegistryValueRef, Result, SettingDefinition, SettingStatus, ToggleState,
};

pub use crate::repositories::{
    is_elevated, resolve_catalog, restart_as_admin, MemoryRegistry, Registry, RegistryKey,
    SystemRegistry,
};

pub use crate::services::{apply, compute_state, Toggler};

pub mod prelude {
    pub use crate::domain::{
        AppError, Catalog, RegistryValueRef, Result, SettingDefinition, SettingStatus,
        ToggleState,
    };
    pub use crate::repositories::{is_elevated, Registry, RegistryKey, SystemRegistry};
    pub use crate::services::{apply, compute_state, Toggler};
}
