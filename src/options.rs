use crate::config::get_config_file;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_CONFIG: &str = include_str!("defaultconfig.toml");

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    pub debug: bool,
    pub emulator: EmulatorOptions,
    pub library: LibraryOptions,
    pub builder: BuilderOptions,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EmulatorOptions {
    pub download_url: String,
    pub folder: String,
    pub executable: String,
    pub archive: String,
    /// Inserted between the emulator and the game path
    pub launch_args: Vec<String>,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        Self {
            download_url: "https://xenia-project.github.io/downloads/xenia.zip".to_string(),
            folder: "xenia".to_string(),
            executable: "xenia.exe".to_string(),
            archive: "xenia.zip".to_string(),
            launch_args: vec![],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LibraryOptions {
    pub settings_file: String,
    pub game_extensions: Vec<String>,
    pub default_resolution: String,
    pub default_fps_counter: bool,
    pub grid_columns: usize,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            settings_file: "settings.json".to_string(),
            game_extensions: vec![".iso".to_string()],
            default_resolution: "720p".to_string(),
            default_fps_counter: false,
            grid_columns: 3,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BuilderOptions {
    pub python: String,
    pub packager_module: String,
    pub packager_args: Vec<String>,
    pub staging_folder: String,
    pub main_script_name: String,
    pub helper_script_name: String,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        #[cfg(windows)]
        let python = "python";
        #[cfg(not(windows))]
        let python = "python3";
        Self {
            python: python.to_string(),
            packager_module: "PyInstaller".to_string(),
            packager_args: vec!["--onefile".to_string()],
            staging_folder: "temp".to_string(),
            main_script_name: "main.py".to_string(),
            helper_script_name: "helper.py".to_string(),
        }
    }
}

impl Options {
    pub fn new() -> Result<Self, ConfigError> {
        let config_file = get_config_file();
        let config_file = config_file.to_string_lossy();
        let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(File::with_name(config_file.as_ref()).required(false))
            // Optional per environment overrides, RUN_MODE defaults to development
            .add_source(File::with_name(&format!("config/{env}")).required(false))
            // Not meant to be checked in
            .add_source(File::with_name("local.toml").required(false))
            .add_source(environment())
            .build()?;
        let mut options = config.try_deserialize::<Options>()?;
        sanitize(&mut options);
        Ok(options)
    }
}

/// Eg. `XENIA_FRONTEND_DEBUG=true` sets the `debug` key
fn environment() -> Environment {
    Environment::with_prefix("xenia_frontend")
        .prefix_separator("_")
        .separator("-")
}

pub fn save_options(options: &Options) -> eyre::Result<()> {
    let config_file = get_config_file();
    if let Some(parent) = config_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string(options)?;
    std::fs::write(&config_file, content)?;
    tracing::info!(path = %config_file.display(), "Saved options");
    Ok(())
}

fn sanitize(options: &mut Options) {
    if options.library.grid_columns == 0 {
        options.library.grid_columns = 1;
    }
    options
        .library
        .game_extensions
        .retain(|ext| !ext.trim().is_empty());
    if options.library.game_extensions.is_empty() {
        options.library.game_extensions = LibraryOptions::default().game_extensions;
    }
}
