//! Toggle application - writes every value of one setting.

use crate::domain::{AppError, RegistryValueRef, Result, SettingDefinition};
use crate::repositories::{Registry, RegistryKey};

/// Writes `setting` so its feature ends up off (`enable`) or back on.
///
/// Values are written in catalog order with no rollback.
///
/// # Errors
///
/// - `InsufficientPrivilege` for an admin-only setting when not elevated;
///   nothing is written.
/// - The adapter error if the first value fails; nothing was written.
/// - `PartialApply` if a later value fails after earlier ones succeeded.
pub fn apply<R: Registry + ?Sized>(
    setting: &SettingDefinition,
    enable: bool,
    registry: &R,
    is_elevated: bool,
) -> Result<()> {
    if setting.requires_admin && !is_elevated {
        return Err(AppError::InsufficientPrivilege(setting.id.clone()));
    }

    let mut written = Vec::with_capacity(setting.values.len());
    for value in &setting.values {
        let data = value.data_for(enable);

        if let Err(cause) = write_value(registry, value, data) {
            if written.is_empty() {
                return Err(cause);
            }
            tracing::warn!(
                setting = %setting.id,
                failed = %value.value_name,
                written = written.len(),
                "setting partially applied"
            );
            return Err(AppError::PartialApply {
                succeeded: written,
                failed: value.value_name.clone(),
                cause: Box::new(cause),
            });
        }

        written.push(value.value_name.clone());
    }

    tracing::info!(setting = %setting.id, enable, values = written.len(), "setting applied");
    Ok(())
}

fn write_value<R: Registry + ?Sized>(
    registry: &R,
    value: &RegistryValueRef,
    data: u32,
) -> Result<()> {
    let key = registry.open_or_create(&value.key_path)?;
    key.write_int(&value.value_name, data)
}
