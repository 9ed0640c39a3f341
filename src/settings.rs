/// Extension settings as persisted in chrome.storage.sync
use crate::base_url::{normalize_base_url, try_normalize_base_url, DEFAULT_BASE_URL};
use crate::error::{Result, ShortenError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Keys read and written in the synced storage area
pub const SETTINGS_KEYS: [&str; 4] = ["apiKey", "baseUrl", "autoCopy", "autoOpenStats"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub auto_copy: bool,
    pub auto_open_stats: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            auto_copy: true,
            auto_open_stats: false,
        }
    }
}

/// Raw record as returned by `storage.sync.get`; every key may be missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub auto_copy: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub auto_open_stats: Option<bool>,
}

/// Flags written by older versions may be strings or numbers
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).map(|v| truthy(&v)))
}

/// JavaScript truthiness of a stored value
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        let defaults = Settings::default();
        Settings {
            api_key: stored.api_key.unwrap_or_default(),
            base_url: normalize_base_url(stored.base_url.as_deref().unwrap_or_default()),
            auto_copy: stored.auto_copy.unwrap_or(defaults.auto_copy),
            auto_open_stats: stored.auto_open_stats.unwrap_or(defaults.auto_open_stats),
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Fold a storage change into these settings
    pub fn apply_change(&mut self, change: &SettingsChange) -> ChangeEffect {
        let defaults = Settings::default();
        let mut effect = ChangeEffect::default();

        if let Some(base_url) = &change.base_url {
            self.base_url = normalize_base_url(base_url.as_deref().unwrap_or_default());
            effect.base_url_changed = true;
        }

        if let Some(api_key) = &change.api_key {
            self.api_key = api_key.clone().unwrap_or_default();
            effect.api_key_changed = true;
        }

        if let Some(auto_copy) = change.auto_copy {
            self.auto_copy = auto_copy.unwrap_or(defaults.auto_copy);
        }

        if let Some(auto_open_stats) = change.auto_open_stats {
            self.auto_open_stats = auto_open_stats.unwrap_or(defaults.auto_open_stats);
        }

        effect
    }
}

/// One `storage.onChanged` entry: `{ oldValue?, newValue? }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    #[serde(default)]
    pub new_value: Option<serde_json::Value>,
}

/// Changed keys only. The outer `Option` says whether the key changed, the
/// inner one carries the new value (`None` when the key was removed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChange {
    pub api_key: Option<Option<String>>,
    pub base_url: Option<Option<String>>,
    pub auto_copy: Option<Option<bool>>,
    pub auto_open_stats: Option<Option<bool>>,
}

impl SettingsChange {
    pub fn from_storage_changes(changes: &HashMap<String, StorageChange>) -> Self {
        let text = |key: &str| {
            changes.get(key).map(|change| {
                change
                    .new_value
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
        };
        let flag = |key: &str| {
            changes
                .get(key)
                .map(|change| change.new_value.as_ref().filter(|v| !v.is_null()).map(truthy))
        };

        SettingsChange {
            api_key: text("apiKey"),
            base_url: text("baseUrl"),
            auto_copy: flag("autoCopy"),
            auto_open_stats: flag("autoOpenStats"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsChange::default()
    }
}

/// What a settings change means for the UI
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChangeEffect {
    pub api_key_changed: bool,
    pub base_url_changed: bool,
}

/// Values typed into the options page
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsForm {
    pub api_key: String,
    pub base_url: String,
    pub auto_copy: bool,
    pub auto_open_stats: bool,
}

impl OptionsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        OptionsForm {
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            auto_copy: settings.auto_copy,
            auto_open_stats: settings.auto_open_stats,
        }
    }

    /// Strict counterpart of the loading path: a bad base URL is reported
    /// instead of silently replaced.
    pub fn validate(&self) -> Result<Settings> {
        let base_url = try_normalize_base_url(&self.base_url)?;

        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(ShortenError::validation("API key is required."));
        }

        Ok(Settings {
            api_key: api_key.to_string(),
            base_url,
            auto_copy: self.auto_copy,
            auto_open_stats: self.auto_open_stats,
        })
    }
}

impl Default for OptionsForm {
    fn default() -> Self {
        OptionsForm::from_settings(&Settings::default())
    }
}
