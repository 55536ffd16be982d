use crate::models::AppSettings;
use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn get_config_dir() -> PathBuf {
    ProjectDirs::from("", "", "pdfcropper")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join("pdfcropper"))
}

pub fn settings_path() -> PathBuf {
    get_config_dir().join("settings.json")
}

fn atomic_write(path: &Path, data: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;

    Ok(())
}

pub fn load_settings() -> AppSettings {
    load_settings_from(&settings_path())
}

/// Reads settings from `path`. A missing file gives the defaults; a
/// corrupted one gives the defaults plus whatever fields still parse.
pub fn load_settings_from(path: &Path) -> AppSettings {
    let Ok(data) = fs::read_to_string(path) else {
        return AppSettings::default();
    };

    match serde_json::from_str::<AppSettings>(&data) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupted settings, using defaults");
            recover_settings(&data)
        }
    }
}

fn recover_settings(data: &str) -> AppSettings {
    let mut settings = AppSettings::default();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(data) else {
        return settings;
    };
    let Some(obj) = value.as_object() else {
        return settings;
    };

    if let Some(v) = obj.get("cache_size").and_then(serde_json::Value::as_u64) {
        settings.cache_size = usize::try_from(v).unwrap_or(settings.cache_size);
    }
    if let Some(v) = obj.get("last_directory").and_then(|v| v.as_str()) {
        settings.last_directory = Some(PathBuf::from(v));
    }
    if let Some(v) = obj.get("log_filter").and_then(|v| v.as_str()) {
        settings.log_filter = v.to_string();
    }
    settings
}

pub fn save_settings(settings: &AppSettings) {
    if let Err(e) = save_settings_to(&settings_path(), settings) {
        warn!(error = %e, "failed to save settings");
    }
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let data = serde_json::to_string_pretty(settings).map_err(io::Error::other)?;
    atomic_write(path, &data)
}

/// Remembers the directory of a file the user just picked.
pub fn remember_directory(settings: &mut AppSettings, file: &Path) {
    if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
        settings.last_directory = Some(dir.to_path_buf());
        save_settings(settings);
    }
}
