use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{
    options::LibraryOptions,
    settings::{GameEntry, Settings},
};

pub const RESOLUTIONS: [&str; 4] = ["720p", "1080p", "1440p", "4K"];

impl GameEntry {
    pub fn new<S: Into<String>>(path: S, options: &LibraryOptions) -> Self {
        Self {
            path: path.into(),
            fps_counter: options.default_fps_counter,
            resolution: options.default_resolution.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.clone())
    }

    pub fn label(&self) -> String {
        let fps = if self.fps_counter {
            "Enabled"
        } else {
            "Disabled"
        };
        format!("{} - {} - FPS: {}", self.display_name(), self.resolution, fps)
    }
}

pub fn find_games_in_folder<P: AsRef<Path>>(folder: P, extensions: &[String]) -> Vec<PathBuf> {
    let mut games: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            extensions.iter().any(|ext| name.ends_with(ext.as_str()))
        })
        .map(|entry| entry.into_path())
        .collect();
    games.sort();
    games
}

/// Adds every game whose path is not in the library yet, returns how many were added.
pub fn add_games(settings: &mut Settings, games: &[PathBuf], options: &LibraryOptions) -> usize {
    let mut added = 0;
    for game in games {
        let path = game.to_string_lossy();
        if settings.game_library.iter().any(|g| g.path == path) {
            continue;
        }
        settings.game_library.push(GameEntry::new(path, options));
        added += 1;
    }
    added
}

pub fn remove_game(settings: &mut Settings, path: &str) -> bool {
    let before = settings.game_library.len();
    settings.game_library.retain(|g| g.path != path);
    before != settings.game_library.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn finds_isos_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("halo3.iso"));
        touch(&dir.path().join("shooters").join("gears").join("gears.iso"));
        touch(&dir.path().join("readme.txt"));
        touch(&dir.path().join("UPPER.ISO"));
        std::fs::create_dir_all(dir.path().join("folder.iso")).unwrap();

        let games = find_games_in_folder(dir.path(), &[".iso".to_string()]);
        assert_eq!(
            games,
            vec![
                dir.path().join("halo3.iso"),
                dir.path().join("shooters").join("gears").join("gears.iso"),
            ]
        );
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn symlinked_games_are_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("storage");
        touch(&storage.join("fable2.iso"));
        let library = dir.path().join("library");
        std::fs::create_dir_all(&library).unwrap();
        std::os::unix::fs::symlink(storage.join("fable2.iso"), library.join("fable2.iso"))
            .unwrap();

        let games = find_games_in_folder(&library, &[".iso".to_string()]);
        assert_eq!(games, vec![library.join("fable2.iso")]);
    }

    #[test]
    fn missing_folder_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let games = find_games_in_folder(dir.path().join("nope"), &[".iso".to_string()]);
        assert!(games.is_empty());
    }

    #[test]
    fn add_games_skips_known_paths() {
        let options = LibraryOptions::default();
        let mut settings = Settings::default();
        let games = vec![PathBuf::from("/games/a.iso"), PathBuf::from("/games/b.iso")];

        assert_eq!(add_games(&mut settings, &games, &options), 2);
        settings.game_library[0].fps_counter = true;
        let more = vec![PathBuf::from("/games/b.iso"), PathBuf::from("/games/c.iso")];
        assert_eq!(add_games(&mut settings, &more, &options), 1);

        let paths: Vec<&str> = settings.game_library.iter().map(|g| g.path.as_str()).collect();
        assert_eq!(paths, vec!["/games/a.iso", "/games/b.iso", "/games/c.iso"]);
        assert!(settings.game_library[0].fps_counter);
        assert_eq!(settings.game_library[2].resolution, "720p");
    }

    #[test]
    fn duplicates_within_one_batch_are_added_once() {
        let mut settings = Settings::default();
        let games = vec![PathBuf::from("/games/a.iso"), PathBuf::from("/games/a.iso")];
        assert_eq!(add_games(&mut settings, &games, &LibraryOptions::default()), 1);
    }

    #[test]
    fn remove_game_by_path() {
        let mut settings = Settings::default();
        add_games(
            &mut settings,
            &[PathBuf::from("/games/a.iso")],
            &LibraryOptions::default(),
        );
        assert!(!remove_game(&mut settings, "/games/b.iso"));
        assert!(remove_game(&mut settings, "/games/a.iso"));
        assert!(settings.game_library.is_empty());
    }

    #[test]
    fn label_shows_name_resolution_and_fps() {
        let mut game = GameEntry::new("/games/Halo 3.iso", &LibraryOptions::default());
        assert_eq!(game.label(), "Halo 3.iso - 720p - FPS: Disabled");
        game.fps_counter = true;
        game.resolution = "1080p".to_string();
        assert_eq!(game.label(), "Halo 3.iso - 1080p - FPS: Enabled");
    }
}
