//! The fixed catalog of toggleable settings.

use super::error::{AppError, Result};
use super::setting::{RegistryValueRef, SettingDefinition};

const CUR_VER: &str = r"Software\Microsoft\Windows\CurrentVersion";
const CONTENT_DELIVERY: &str =
    r"Software\Microsoft\Windows\CurrentVersion\ContentDeliveryManager";
const EXPLORER_ADVANCED: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";

/// Immutable, ordered set of settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    settings: Vec<SettingDefinition>,
}

impl Catalog {
    /// Builds a catalog, rejecting malformed entries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` if the table is empty, an id repeats, or a
    /// value reference is incomplete or not relative to the user hive.
    pub fn new(settings: Vec<SettingDefinition>) -> Result<Self> {
        validate(&settings)?;
        Ok(Self { settings })
    }

    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self {
            settings: builtin_settings(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&SettingDefinition> {
        self.settings.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SettingDefinition> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a SettingDefinition;
    type IntoIter = std::slice::Iter<'a, SettingDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.settings.iter()
    }
}

/// Label of a built-in setting, if `id` names one.
pub fn builtin_label(id: &str) -> Option<String> {
    builtin_settings()
        .into_iter()
        .find(|s| s.id == id)
        .map(|s| s.label)
}

fn validate(settings: &[SettingDefinition]) -> Result<()> {
    if settings.is_empty() {
        return Err(AppError::InvalidCatalog("no settings defined".into()));
    }

    for (i, setting) in settings.iter().enumerate() {
        if setting.id.trim().is_empty() {
            return Err(AppError::InvalidCatalog(format!(
                "setting #{} has an empty id",
                i + 1
            )));
        }
        if settings[..i].iter().any(|s| s.id == setting.id) {
            return Err(AppError::InvalidCatalog(format!(
                "duplicate setting id \"{}\"",
                setting.id
            )));
        }
        if setting.values.is_empty() {
            return Err(AppError::InvalidCatalog(format!(
                "setting \"{}\" has no registry values",
                setting.id
            )));
        }
        for value in &setting.values {
            validate_value(&setting.id, value)?;
        }
    }

    Ok(())
}

fn validate_value(id: &str, value: &RegistryValueRef) -> Result<()> {
    let path = value.key_path.trim();
    if path.is_empty() || value.value_name.trim().is_empty() {
        return Err(AppError::InvalidCatalog(format!(
            "setting \"{id}\" has an empty key path or value name"
        )));
    }

    let upper = path.to_ascii_uppercase();
    if path.starts_with('\\') || upper.starts_with("HKEY_") || upper.starts_with("HKCU") {
        return Err(AppError::InvalidCatalog(format!(
            "setting \"{id}\": key path \"{path}\" must be relative to the current user hive"
        )));
    }

    Ok(())
}

fn setting(id: &str, label: &str, values: Vec<RegistryValueRef>) -> SettingDefinition {
    SettingDefinition {
        id: id.into(),
        label: label.into(),
        values,
        requires_admin: false,
    }
}

fn admin(mut setting: SettingDefinition) -> SettingDefinition {
    setting.requires_admin = true;
    setting
}

fn builtin_settings() -> Vec<SettingDefinition> {
    let content = |name: &str| RegistryValueRef::new(CONTENT_DELIVERY, name);

    vec![
        setting(
            "sync_provider_notifications",
            "Disable Sync Provider Notifications in File Explorer",
            vec![RegistryValueRef::new(
                EXPLORER_ADVANCED,
                "ShowSyncProviderNotifications",
            )],
        ),
        setting(
            "lock_screen_tips",
            "Disable Get Fun Facts, Tips, Tricks, and More on Your Lock Screen",
            vec![
                content("RotatingLockScreenOverlayEnabled"),
                content("SubscribedContent-338387Enabled"),
            ],
        ),
        setting(
            "settings_suggested_content",
            "Disable Show Suggested Content in Settings",
            vec![
                content("SubscribedContent-338393Enabled"),
                content("SubscribedContent-353694Enabled"),
                content("SubscribedContent-353696Enabled"),
            ],
        ),
        setting(
            "windows_tips",
            "Disable Get Tips and Suggestions When Using Windows",
            vec![content("SubscribedContent-338389Enabled")],
        ),
        setting(
            "finish_setup_suggestions",
            "Disable Suggest Ways to Get the Most Out of Windows and Finish Setting Up This Device",
            vec![RegistryValueRef::new(
                format!(r"{CUR_VER}\UserProfileEngagement"),
                "ScoobeSystemSettingEnabled",
            )],
        ),
        setting(
            "welcome_experience",
            "Disable Show Me the Windows Welcome Experience After Updates",
            vec![content("SubscribedContent-310093Enabled")],
        ),
        setting(
            "advertising_id",
            "Disable Let Apps Show Me Personalized Ads by Using My Advertising ID",
            vec![RegistryValueRef::new(
                format!(r"{CUR_VER}\AdvertisingInfo"),
                "Enabled",
            )],
        ),
        setting(
            "tailored_experiences",
            "Disable Tailored Experiences",
            vec![RegistryValueRef::new(
                format!(r"{CUR_VER}\Privacy"),
                "TailoredExperiencesWithDiagnosticDataEnabled",
            )],
        ),
        setting(
            "start_recommendations",
            "Disable Show Recommendations for Tips, Shortcuts, New Apps, and More in Start",
            vec![RegistryValueRef::new(
                EXPLORER_ADVANCED,
                "Start_IrisRecommendations",
            )],
        ),
        setting(
            "notification_suggestions",
            "Disable Get Notified About Suggestions and Tips in Notifications",
            vec![RegistryValueRef::new(
                format!(r"{CUR_VER}\Notifications\Settings\Windows.ActionCenter.SmartOptOut"),
                "Enabled",
            )],
        ),
        admin(setting(
            "bing_search",
            "Disable Bing Results in Windows Search",
            vec![
                RegistryValueRef::new(
                    r"Software\Policies\Microsoft\Windows\Explorer",
                    "DisableSearchBoxSuggestions",
                )
                .inverted(),
                RegistryValueRef::new(format!(r"{CUR_VER}\Search"), "BingSearchEnabled"),
            ],
        )),
        admin(setting(
            "edge_search_widget",
            "Disable Edge Desktop Search Widget Bar",
            vec![RegistryValueRef::new(
                r"Software\Policies\Microsoft\Edge",
                "WebWidgetAllowed",
            )],
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        assert!(Catalog::new(builtin_settings()).is_ok());
    }

    #[test]
    fn two_builtin_settings_require_admin() {
        let catalog = Catalog::builtin();
        let admin: Vec<&str> = catalog
            .iter()
            .filter(|s| s.requires_admin)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(admin, vec!["bing_search", "edge_search_widget"]);
    }

    #[test]
    fn only_search_policy_value_is_inverted() {
        let inverted: Vec<_> = Catalog::builtin()
            .iter()
            .flat_map(|s| s.values.iter())
            .filter(|v| v.inverted)
            .map(|v| v.value_name.clone())
            .collect();
        assert_eq!(inverted, vec!["DisableSearchBoxSuggestions".to_string()]);
    }

    #[test]
    fn suggested_content_governs_three_values() {
        let catalog = Catalog::builtin();
        let setting = catalog.get("settings_suggested_content").unwrap();
        assert_eq!(setting.values.len(), 3);
        assert_eq!(setting.key_paths(), vec![CONTENT_DELIVERY]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut settings = builtin_settings();
        settings.push(settings[0].clone());
        let err = Catalog::new(settings).unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_empty_catalog_and_empty_values() {
        assert!(Catalog::new(Vec::new()).is_err());
        assert!(Catalog::new(vec![setting("x", "x", Vec::new())]).is_err());
    }

    #[test]
    fn rejects_absolute_key_paths() {
        for path in [
            r"HKEY_CURRENT_USER\Software\Test",
            r"HKCU\Software\Test",
            r"\Software\Test",
        ] {
            let settings = vec![setting(
                "x",
                "x",
                vec![RegistryValueRef::new(path, "Enabled")],
            )];
            assert!(Catalog::new(settings).is_err(), "{path} accepted");
        }
    }

    #[test]
    fn builtin_labels_resolve_by_id() {
        assert_eq!(
            builtin_label("tailored_experiences").as_deref(),
            Some("Disable Tailored Experiences")
        );
        assert_eq!(builtin_label("nope"), None);
    }
}
