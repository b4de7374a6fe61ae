mod backups;
mod config;
mod emulator;
mod exe_builder;
mod library;
mod logging;
mod options;
mod settings;
mod single_instance;
mod ui;

use std::path::Path;

use crate::{
    config::get_settings_file,
    emulator::{ensure_files, run_game},
    library::{add_games, find_games_in_folder},
    options::{save_options, Options},
    settings::{load_settings, save_settings},
    single_instance::InstanceLock,
};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let (options, options_error) = match Options::new() {
        Ok(options) => (options, None),
        Err(err) => (Options::default(), Some(err)),
    };
    let _log_guard = logging::init_logging(options.debug);
    if let Some(err) = options_error {
        tracing::error!("Could not read config.toml, using defaults: {err}");
    }

    let args: Vec<String> = std::env::args().collect();
    if args.contains(&"--exe-builder".to_string()) {
        return ui::run_builder_ui(options);
    }
    if args.contains(&"--write-config".to_string()) {
        return save_options(&options);
    }
    if args.contains(&"--install".to_string()) {
        return install(&options);
    }
    if let Some(folder) = arg_value(&args, "--add-games") {
        return add_games_from_folder(&options, Path::new(folder));
    }
    if let Some(game) = arg_value(&args, "--run") {
        let settings = load_settings(&get_settings_file(&options));
        let status = run_game(&settings, &options, game)?;
        tracing::info!(%status, "Emulator exited");
        return Ok(());
    }

    let _lock = match InstanceLock::acquire() {
        Ok(lock) => lock,
        Err(msg) => {
            tracing::error!("{msg}");
            return Err(eyre::eyre!(msg));
        }
    };
    ui::run_ui(options)
}

fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|i| args.get(i + 1))
        .map(|value| value.as_str())
}

fn install(options: &Options) -> eyre::Result<()> {
    let settings_path = get_settings_file(options);
    let mut settings = load_settings(&settings_path);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(ensure_files(&settings_path, &mut settings, options, &None))?;
    tracing::info!(path = %settings.xenia_path, "Xenia is ready");
    Ok(())
}

fn add_games_from_folder(options: &Options, folder: &Path) -> eyre::Result<()> {
    let settings_path = get_settings_file(options);
    let mut settings = load_settings(&settings_path);
    let games = find_games_in_folder(folder, &options.library.game_extensions);
    let added = add_games(&mut settings, &games, &options.library);
    save_settings(&settings_path, &settings)?;
    tracing::info!(found = games.len(), added, "Updated game library");
    Ok(())
}
