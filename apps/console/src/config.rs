use std::{collections::HashMap, fs, path::{Path, PathBuf}};

use anyhow::Context;

pub const SETTINGS_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub actor: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./data/console.json"),
            actor: "console".into(),
            log_filter: "info".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then `path` (if readable), then the environment.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("data_file") {
                settings.data_file = PathBuf::from(v);
            }
            if let Some(v) = file_cfg.get("actor") {
                settings.actor = v.clone();
            }
            if let Some(v) = file_cfg.get("log") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("CONSOLE_DATA_FILE") {
        settings.data_file = PathBuf::from(v);
    }
    if let Some(v) = env("APP__DATA_FILE") {
        settings.data_file = PathBuf::from(v);
    }

    if let Some(v) = env("CONSOLE_ACTOR") {
        settings.actor = v;
    }
    if let Some(v) = env("APP__ACTOR") {
        settings.actor = v;
    }

    if let Some(v) = env("CONSOLE_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG") {
        settings.log_filter = v;
    }

    settings
}

pub fn ensure_parent_dir_exists(data_file: &Path) -> anyhow::Result<()> {
    let Some(parent) = data_file.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for data file '{}'",
            parent.display(),
            data_file.display()
        )
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
