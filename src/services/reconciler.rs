//! State reconciliation - reads registry state, never writes it.

use crate::domain::{Catalog, Result, SettingDefinition, SettingStatus, ToggleState};
use crate::repositories::Registry;

/// Missing values read as this.
const DEFAULT_DWORD: u32 = 0;

/// Computes the toggle state of one setting.
///
/// Admin-only settings short-circuit to `Disabled` without touching the
/// registry when the process is not elevated.
///
/// # Errors
///
/// Returns the adapter error if any key of the setting cannot be read.
pub fn compute_state<R: Registry + ?Sized>(
    setting: &SettingDefinition,
    registry: &R,
    is_elevated: bool,
) -> Result<ToggleState> {
    if setting.requires_admin && !is_elevated {
        return Ok(ToggleState::Disabled);
    }

    let mut all_disabled = true;
    for value in &setting.values {
        let raw = registry.read_int(&value.key_path, &value.value_name, DEFAULT_DWORD)?;
        let disabled = value.reads_as_disabled(raw);
        tracing::debug!(
            setting = %setting.id,
            key = %value.key_path,
            value = %value.value_name,
            raw,
            disabled,
            "read registry value"
        );
        all_disabled &= disabled;
    }

    Ok(if all_disabled {
        ToggleState::On
    } else {
        ToggleState::Off
    })
}

fn keys_present<R: Registry + ?Sized>(setting: &SettingDefinition, registry: &R) -> Result<bool> {
    for path in setting.key_paths() {
        if !registry.key_exists(path)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Reconciles one setting into the view handed to the window. Read
/// failures become `Disabled` with the error attached.
pub fn reconcile<R: Registry + ?Sized>(
    setting: &SettingDefinition,
    registry: &R,
    is_elevated: bool,
) -> SettingStatus {
    let mut status = SettingStatus {
        id: setting.id.clone(),
        label: setting.label.clone(),
        requires_admin: setting.requires_admin,
        state: ToggleState::Disabled,
        configured: false,
        error: None,
    };

    let outcome = compute_state(setting, registry, is_elevated).and_then(|state| {
        if state == ToggleState::Disabled {
            return Ok((state, false));
        }
        Ok((state, keys_present(setting, registry)?))
    });

    match outcome {
        Ok((state, configured)) => {
            status.state = state;
            status.configured = configured;
        }
        Err(e) => {
            tracing::warn!(setting = %setting.id, error = %e, "failed to reconcile setting");
            status.error = Some(e);
        }
    }

    status
}

/// Reconciles every setting; one unreadable setting does not stop the rest.
pub fn reconcile_all<R: Registry + ?Sized>(
    catalog: &Catalog,
    registry: &R,
    is_elevated: bool,
) -> Vec<SettingStatus> {
    catalog
        .iter()
        .map(|setting| reconcile(setting, registry, is_elevated))
        .collect()
}
