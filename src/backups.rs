use std::path::{Path, PathBuf};

use time::{format_description, OffsetDateTime};

use crate::{config::get_backups_folder, settings::Settings};

const DATE_FORMAT: &str = "[year]-[month]-[day]-[hour]-[minute]-[second]";

pub fn load_backups() -> Vec<PathBuf> {
    list_backups_in(&get_backups_folder())
}

fn list_backups_in(backup_folder: &Path) -> Vec<PathBuf> {
    let files = std::fs::read_dir(backup_folder);
    let mut result = vec![];
    if let Ok(files) = files {
        for file in files.flatten() {
            let path = file.path();
            let is_backup = path.extension().unwrap_or_default().to_string_lossy() == "json"
                && path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .starts_with("settings-");
            if is_backup {
                result.push(path);
            }
        }
    }
    result.sort_by_key(|path| backup_sort_key(path));
    result.reverse();
    result
}

/// Orders `settings-<date>-<n>.json` after `settings-<date>.json`, and by `n` numerically.
fn backup_sort_key(path: &Path) -> (String, u32) {
    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let date = stem.trim_start_matches("settings-");
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() > 6 {
        if let Ok(counter) = parts[6..].join("-").parse::<u32>() {
            return (parts[..6].join("-"), counter);
        }
    }
    (date.to_string(), 0)
}

pub fn backup_settings_file(settings_path: &Path) -> eyre::Result<PathBuf> {
    backup_settings_file_to(settings_path, &get_backups_folder())
}

pub(crate) fn backup_settings_file_to(settings_path: &Path, backup_folder: &Path) -> eyre::Result<PathBuf> {
    let format = format_description::parse(DATE_FORMAT)?;
    let date_string = OffsetDateTime::now_utc().format(&format)?;
    let mut new_path = backup_folder.join(format!("settings-{date_string}.json"));
    let mut counter = 1;
    while new_path.exists() {
        new_path = backup_folder.join(format!("settings-{date_string}-{counter}.json"));
        counter += 1;
    }
    std::fs::copy(settings_path, &new_path)?;
    tracing::info!(backup = %new_path.display(), "Backed up settings");
    Ok(new_path)
}

/// Replaces the settings file with a backup, keeping a backup of the file being replaced.
pub fn restore_backup(backup: &Path, settings_path: &Path) -> eyre::Result<Settings> {
    restore_backup_with_folder(backup, settings_path, &get_backups_folder())
}

fn restore_backup_with_folder(
    backup: &Path,
    settings_path: &Path,
    backup_folder: &Path,
) -> eyre::Result<Settings> {
    let content = std::fs::read_to_string(backup)?;
    let restored: Settings = serde_json::from_str(&content)
        .map_err(|e| eyre::eyre!("Backup {} is not a valid settings file: {e}", backup.display()))?;
    if settings_path.exists() {
        backup_settings_file_to(settings_path, backup_folder)?;
    }
    std::fs::copy(backup, settings_path)?;
    tracing::info!(backup = %backup.display(), "Restored settings from backup");
    Ok(restored)
}
