//! Presentation-facing facade over the catalog, reconciler and applier.

use super::{applier, reconciler};
use crate::domain::{AppError, Catalog, Result, SettingStatus, ToggleState};
use crate::repositories::Registry;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};

pub struct Toggler<R> {
    catalog: Catalog,
    registry: R,
    is_elevated: bool,
    in_flight: Mutex<HashSet<String>>,
}

/// Marks a setting as being applied until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a Mutex<HashSet<String>>, id: &str) -> Result<Self> {
        let mut ids = set.lock().unwrap_or_else(PoisonError::into_inner);
        if !ids.insert(id.to_string()) {
            return Err(AppError::ToggleInProgress(id.to_string()));
        }
        Ok(Self {
            set,
            id: id.to_string(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl<R: Registry> Toggler<R> {
    /// `is_elevated` is queried once by the caller and cached here.
    pub fn new(catalog: Catalog, registry: R, is_elevated: bool) -> Self {
        Self {
            catalog,
            registry,
            is_elevated,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn is_elevated(&self) -> bool {
        self.is_elevated
    }

    /// Reconciled status of every setting, in catalog order.
    pub fn get_all_setting_states(&self) -> Vec<SettingStatus> {
        reconciler::reconcile_all(&self.catalog, &self.registry, self.is_elevated)
    }

    /// Plain id -> state mapping.
    pub fn state_map(&self) -> BTreeMap<String, ToggleState> {
        self.get_all_setting_states()
            .into_iter()
            .map(|s| (s.id, s.state))
            .collect()
    }

    /// # Errors
    ///
    /// Returns `UnknownSetting` if `id` is not in the catalog.
    pub fn setting_status(&self, id: &str) -> Result<SettingStatus> {
        let setting = self
            .catalog
            .get(id)
            .ok_or_else(|| AppError::UnknownSetting(id.to_string()))?;
        Ok(reconciler::reconcile(setting, &self.registry, self.is_elevated))
    }

    /// Applies a user click. Callers should re-query the setting's status
    /// afterwards, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSetting`, `ToggleInProgress` if the same setting is
    /// already being applied, or any error from the applier.
    pub fn on_toggle(&self, id: &str, enable: bool) -> Result<()> {
        let setting = self
            .catalog
            .get(id)
            .ok_or_else(|| AppError::UnknownSetting(id.to_string()))?;
        let _guard = InFlight::acquire(&self.in_flight, id)?;

        applier::apply(setting, enable, &self.registry, self.is_elevated)
    }

    #[cfg(test)]
    fn is_applying(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryRegistry;

    const CONTENT: &str = r"Software\Microsoft\Windows\CurrentVersion\ContentDeliveryManager";

    fn toggler(is_elevated: bool) -> Toggler<MemoryRegistry> {
        Toggler::new(Catalog::builtin(), MemoryRegistry::new(), is_elevated)
    }

    #[test]
    fn initial_states_follow_defaults() {
        let map = toggler(false).state_map();
        assert_eq!(map.len(), 12);
        assert_eq!(map["advertising_id"], ToggleState::On);
        assert_eq!(map["bing_search"], ToggleState::Disabled);
        assert_eq!(map["edge_search_widget"], ToggleState::Disabled);

        let elevated = toggler(true).state_map();
        // The inverted policy value reads 0 when absent.
        assert_eq!(elevated["bing_search"], ToggleState::Off);
        assert_eq!(elevated["edge_search_widget"], ToggleState::On);
    }

    #[test]
    fn toggle_then_requery() {
        let t = toggler(false);
        t.registry().set(CONTENT, "SubscribedContent-338389Enabled", 1);
        assert_eq!(t.setting_status("windows_tips").unwrap().state, ToggleState::Off);

        t.on_toggle("windows_tips", true).unwrap();
        let status = t.setting_status("windows_tips").unwrap();
        assert_eq!(status.state, ToggleState::On);
        assert!(status.configured);
        assert!(!t.is_applying("windows_tips"));
    }

    #[test]
    fn admin_toggle_is_rejected_when_not_elevated() {
        let t = toggler(false);
        assert_eq!(
            t.on_toggle("edge_search_widget", true),
            Err(AppError::InsufficientPrivilege("edge_search_widget".into()))
        );
        assert_eq!(t.registry().key_count(), 0);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let t = toggler(true);
        assert!(matches!(
            t.on_toggle("cb99", true),
            Err(AppError::UnknownSetting(_))
        ));
        assert!(matches!(
            t.setting_status("cb99"),
            Err(AppError::UnknownSetting(_))
        ));
    }

    #[test]
    fn concurrent_toggle_of_same_setting_is_refused() {
        let t = toggler(false);
        let guard = InFlight::acquire(&t.in_flight, "windows_tips").unwrap();

        assert!(t.is_applying("windows_tips"));
        assert_eq!(
            t.on_toggle("windows_tips", true),
            Err(AppError::ToggleInProgress("windows_tips".into()))
        );
        // Other settings are unaffected.
        t.on_toggle("welcome_experience", true).unwrap();

        drop(guard);
        t.on_toggle("windows_tips", true).unwrap();
    }

    #[test]
    fn failed_apply_releases_the_guard() {
        let t = toggler(false);
        t.registry().fail_create(CONTENT);

        assert!(t.on_toggle("windows_tips", true).is_err());
        assert!(!t.is_applying("windows_tips"));
    }

    #[test]
    fn partial_apply_is_visible_after_requery() {
        let t = toggler(false);
        t.registry().set(CONTENT, "RotatingLockScreenOverlayEnabled", 1);
        t.registry().set(CONTENT, "SubscribedContent-338387Enabled", 1);
        t.registry().fail_write(CONTENT, "SubscribedContent-338387Enabled");

        let err = t.on_toggle("lock_screen_tips", true).unwrap_err();
        assert!(matches!(err, AppError::PartialApply { .. }));
        assert_eq!(
            t.setting_status("lock_screen_tips").unwrap().state,
            ToggleState::Off
        );
    }
}
