use std::{
    ffi::OsStr,
    path::Path,
    process::{Command, ExitStatus},
};

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use thiserror::Error;

use crate::{options::Options, settings::Settings};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Xenia path is not set!")]
    PathNotSet,
    #[error("Could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs the emulator with the given game and waits for it to exit.
pub fn run_game(
    settings: &Settings,
    options: &Options,
    game_path: &str,
) -> Result<ExitStatus, LaunchError> {
    if settings.xenia_path.is_empty() {
        tracing::warn!("Xenia path is not set!");
        return Err(LaunchError::PathNotSet);
    }
    tracing::info!(emulator = %settings.xenia_path, game = game_path, "Launching game");
    let status = Command::new(&settings.xenia_path)
        .args(&options.emulator.launch_args)
        .arg(game_path)
        .status()
        .map_err(|source| LaunchError::Spawn {
            program: settings.xenia_path.clone(),
            source,
        })?;
    tracing::info!(game = game_path, %status, "Game exited");
    Ok(status)
}

pub fn is_emulator_running(settings: &Settings, options: &Options) -> bool {
    let name = Path::new(&settings.xenia_path)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| options.emulator.executable.clone().into());
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::new(),
    );
    let running = system
        .processes_by_exact_name(OsStr::new(&name))
        .next()
        .is_some();
    running
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_refused() {
        let result = run_game(&Settings::default(), &Options::default(), "/games/a.iso");
        assert!(matches!(result, Err(LaunchError::PathNotSet)));
        assert_eq!(result.unwrap_err().to_string(), "Xenia path is not set!");
    }

    #[test]
    fn missing_emulator_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            xenia_path: dir.path().join("missing.exe").to_string_lossy().to_string(),
            ..Default::default()
        };
        let result = run_game(&settings, &Options::default(), "/games/a.iso");
        assert!(matches!(result, Err(LaunchError::Spawn { .. })));
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn passes_launch_args_then_game_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("args.txt");
        let script = dir.path().join("fake-xenia.sh");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nexit 3\n", out.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let settings = Settings {
            xenia_path: script.to_string_lossy().to_string(),
            ..Default::default()
        };
        let mut options = Options::default();
        options.emulator.launch_args = vec!["--fullscreen".to_string()];

        let status = run_game(&settings, &options, "/games/halo 3.iso").unwrap();
        assert_eq!(status.code(), Some(3));
        let args = std::fs::read_to_string(&out).unwrap();
        assert_eq!(args, "--fullscreen\n/games/halo 3.iso\n");
    }

    #[test]
    fn unknown_emulator_is_not_running() {
        let settings = Settings {
            xenia_path: "/nowhere/definitely-not-a-running-emulator.exe".to_string(),
            ..Default::default()
        };
        assert!(!is_emulator_running(&settings, &Options::default()));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn running_process_is_found_by_file_name() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let settings = Settings {
            xenia_path: "/usr/bin/sleep".to_string(),
            ..Default::default()
        };
        let running = is_emulator_running(&settings, &Options::default());
        let _ = child.kill();
        let _ = child.wait();
        assert!(running);
    }
}
