use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use crate::options::Options;

#[cfg(target_family = "unix")]
pub fn get_config_folder() -> PathBuf {
    let config_home = std::env::var("XDG_CONFIG_HOME");
    let home = std::env::var("HOME");
    match (config_home, home) {
        (Ok(p), _) => Path::new(&p).join("xenia-frontend"),
        (Err(_), Ok(home)) => Path::new(&home).join(".config").join("xenia-frontend"),
        _ => Path::new("").to_path_buf(),
    }
}

#[cfg(windows)]
pub fn get_config_folder() -> PathBuf {
    let config_home = std::env::var("APPDATA");
    match config_home {
        Ok(p) => Path::new(&p).join("xenia-frontend"),
        Err(_) => Path::new("").to_path_buf(),
    }
}

pub fn get_config_file() -> PathBuf {
    get_config_folder().join("config.toml")
}

/// Relative paths from the options live next to the config file.
fn resolve(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        get_config_folder().join(path)
    }
}

pub fn get_settings_file(options: &Options) -> PathBuf {
    resolve(&options.library.settings_file)
}

pub fn get_emulator_folder(options: &Options) -> PathBuf {
    resolve(&options.emulator.folder)
}

pub fn get_download_file(options: &Options) -> PathBuf {
    resolve(&options.emulator.archive)
}

pub fn get_backups_folder() -> PathBuf {
    let backups_path = get_config_folder().join("backup");
    let _ = create_dir_all(&backups_path);
    backups_path
}
