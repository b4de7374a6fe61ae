use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{backups::backup_settings_file_to, config::get_backups_folder};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub xenia_path: String,
    pub ui_type: UiType,
    pub game_library: Vec<GameEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiType {
    /// Tile grid
    #[default]
    Metro,
    List,
}

impl UiType {
    pub fn name(&self) -> &'static str {
        match self {
            UiType::Metro => "Metro",
            UiType::List => "List",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GameEntry {
    pub path: String,
    pub fps_counter: bool,
    pub resolution: String,
}

/// Reads the settings file, falling back to the defaults when it is missing or unreadable.
///
/// A file that does not parse is copied to the backups folder before the defaults are
/// returned, so the next save does not lose it for good.
pub fn load_settings(path: &Path) -> Settings {
    load_settings_with_backup_folder(path, &get_backups_folder())
}

fn load_settings_with_backup_folder(path: &Path, backup_folder: &Path) -> Settings {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Settings::default();
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "Could not read settings file");
            return Settings::default();
        }
    };
    match serde_json::from_str::<Settings>(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "Settings file is corrupted. A new file will be created.");
            match backup_settings_file_to(path, backup_folder) {
                Ok(backup) => {
                    tracing::info!(backup = %backup.display(), "Kept a copy of the corrupted settings")
                }
                Err(err) => tracing::error!("Failed to back up corrupted settings: {err:?}"),
            }
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> eyre::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = to_pretty_json(settings)?;
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);
    std::fs::write(tmp_path, content)?;
    std::fs::rename(tmp_path, path)?;
    tracing::debug!(path = %path.display(), games = settings.game_library.len(), "Saved settings");
    Ok(())
}

pub fn ensure_settings_file(path: &Path, settings: &Settings) -> eyre::Result<()> {
    if !path.exists() {
        save_settings(path, settings)?;
    }
    Ok(())
}

fn to_pretty_json(settings: &Settings) -> eyre::Result<Vec<u8>> {
    let mut content = vec![];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    settings.serialize(&mut serializer)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(path: &str) -> GameEntry {
        GameEntry {
            path: path.to_string(),
            fps_counter: false,
            resolution: "720p".to_string(),
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ui_type, UiType::Metro);
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            xenia_path: "xenia/xenia.exe".to_string(),
            ui_type: UiType::List,
            game_library: vec![game("/games/halo3.iso")],
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn file_is_written_with_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        save_settings(&path, &Settings::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    \"xenia_path\": \"\""));
        assert!(content.contains("\"ui_type\": \"Metro\""));
        assert!(!dir.path().join("settings.json.tmp").exists());
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"xenia_path": "C:/xenia/xenia.exe"}"#).unwrap();
        let settings = load_settings(&path);
        assert_eq!(settings.xenia_path, "C:/xenia/xenia.exe");
        assert!(settings.game_library.is_empty());
        assert_eq!(settings.ui_type, UiType::Metro);
    }

    fn backups_in(folder: &Path) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(folder)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[test]
    fn corrupted_file_resets_to_defaults_and_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let backup_folder = dir.path().join("backup");
        std::fs::create_dir_all(&backup_folder).unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let settings = load_settings_with_backup_folder(&path, &backup_folder);
        assert_eq!(settings, Settings::default());

        let backups = backups_in(&backup_folder);
        assert_eq!(backups.len(), 1);
        assert_eq!(
            std::fs::read_to_string(&backups[0]).unwrap(),
            "{ this is not json"
        );
    }

    #[test]
    fn wrong_shape_counts_as_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let backup_folder = dir.path().join("backup");
        std::fs::create_dir_all(&backup_folder).unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"game_library": "not a list"}"#).unwrap();

        let settings = load_settings_with_backup_folder(&path, &backup_folder);
        assert_eq!(settings, Settings::default());
        assert_eq!(backups_in(&backup_folder).len(), 1);
    }

    #[test]
    fn ensure_does_not_overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.game_library.push(game("/games/gears.iso"));
        save_settings(&path, &settings).unwrap();

        ensure_settings_file(&path, &Settings::default()).unwrap();
        assert_eq!(load_settings(&path), settings);
    }
}
