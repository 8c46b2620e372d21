use std::{
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::persistence::{
    default_app_data_dir,
    load_json_or_default,
    save_json,
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_HISTORY_KEY: &str = "gengo_history";

/// User-editable settings kept in `settings.json` inside the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub history_key: String,
    /// argv template, e.g. `["espeak-ng", "-v", "{lang}", "{text}"]`
    pub speech_command: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 60,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            speech_command: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        load_json_or_default(data_dir, SETTINGS_FILE)
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), crate::core::GengoError> {
        save_json(data_dir, self, SETTINGS_FILE)
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub history_key: String,
    pub speech_command: Option<Vec<String>>,
}

impl Config {
    /// flag/env > settings file > default
    pub fn resolve(overrides: Overrides) -> Self {
        let data_dir = overrides.data_dir.unwrap_or_else(default_app_data_dir);
        let settings = Settings::load(&data_dir);
        Self::from_parts(data_dir, settings, overrides.api_key, overrides.model)
    }

    pub fn from_parts(
        data_dir: PathBuf,
        settings: Settings,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("API_KEY").ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            data_dir,
            api_key,
            model: model.filter(|m| !m.trim().is_empty()).unwrap_or(settings.model),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
            history_key: settings.history_key,
            speech_command: settings.speech_command,
        }
    }
}
