use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use thiserror::Error;

use crate::options::BuilderOptions;

#[derive(Debug, Default, Clone)]
pub struct BuildRequest {
    pub main_script: Option<PathBuf>,
    pub helper_script: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// Where the packager puts the finished executable
    pub output_folder: PathBuf,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Please select both scripts!")]
    MissingScripts,
    #[error("Could not stage {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' failed with {status}")]
    PackagerFailed { command: String, status: ExitStatus },
}

/// Removes the staging folder when dropped, whatever happened to the build.
struct StagingFolder {
    path: PathBuf,
}

impl StagingFolder {
    fn create(path: PathBuf) -> Result<Self, BuildError> {
        std::fs::create_dir_all(&path).map_err(|source| BuildError::Staging {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    fn stage(&self, script: &Path, name: &str) -> Result<(), BuildError> {
        std::fs::copy(script, self.path.join(name))
            .map(|_| ())
            .map_err(|source| BuildError::Staging {
                path: script.to_path_buf(),
                source,
            })
    }
}

impl Drop for StagingFolder {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(path = %self.path.display(), "Could not clean up staging folder: {err}");
        }
    }
}

pub fn build_exe(
    request: &BuildRequest,
    options: &BuilderOptions,
    work_dir: &Path,
) -> Result<BuildOutcome, BuildError> {
    let (main_script, helper_script) = match (&request.main_script, &request.helper_script) {
        (Some(main), Some(helper)) => (main, helper),
        _ => return Err(BuildError::MissingScripts),
    };

    let staging = StagingFolder::create(work_dir.join(&options.staging_folder))?;
    staging.stage(main_script, &options.main_script_name)?;
    staging.stage(helper_script, &options.helper_script_name)?;

    let entry_point = Path::new(&options.staging_folder).join(&options.main_script_name);
    let mut command = Command::new(&options.python);
    command
        .current_dir(work_dir)
        .arg("-m")
        .arg(&options.packager_module)
        .args(&options.packager_args)
        .arg(&entry_point);
    let command_line = describe(options, &entry_point);
    tracing::info!(command = %command_line, "Running packager");

    let status = command.status().map_err(|source| BuildError::Spawn {
        program: options.python.clone(),
        source,
    })?;
    if !status.success() {
        tracing::error!(command = %command_line, %status, "Packager failed");
        return Err(BuildError::PackagerFailed {
            command: command_line,
            status,
        });
    }
    tracing::info!("EXE built successfully!");
    Ok(BuildOutcome {
        output_folder: work_dir.join("dist"),
    })
}

fn describe(options: &BuilderOptions, entry_point: &Path) -> String {
    let mut parts = vec![
        options.python.clone(),
        "-m".to_string(),
        options.packager_module.clone(),
    ];
    parts.extend(options.packager_args.iter().cloned());
    parts.push(entry_point.to_string_lossy().to_string());
    parts.join(" ")
}

pub fn script_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripts(dir: &Path) -> BuildRequest {
        let main = dir.join("app.py");
        let helper = dir.join("utils.py");
        std::fs::write(&main, "import helper\nprint('main')\n").unwrap();
        std::fs::write(&helper, "def help(): pass\n").unwrap();
        BuildRequest {
            main_script: Some(main),
            helper_script: Some(helper),
        }
    }

    #[cfg(target_family = "unix")]
    fn fake_python(dir: &Path, exit_code: i32) -> String {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.join("fake-python.sh");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\ncat temp/main.py > staged-main\ncat temp/helper.py > staged-helper\nprintf '%s\\n' \"$@\" > args\nexit {exit_code}\n"
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.to_string_lossy().to_string()
    }

    #[test]
    fn both_scripts_are_required() {
        let dir = tempfile::tempdir().unwrap();
        let request = BuildRequest {
            main_script: Some(dir.path().join("main.py")),
            helper_script: None,
        };
        let result = build_exe(&request, &BuilderOptions::default(), dir.path());
        assert!(matches!(result, Err(BuildError::MissingScripts)));
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn missing_script_file_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let request = BuildRequest {
            main_script: Some(dir.path().join("gone.py")),
            helper_script: Some(dir.path().join("gone_too.py")),
        };
        let result = build_exe(&request, &BuilderOptions::default(), dir.path());
        assert!(matches!(result, Err(BuildError::Staging { .. })));
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn stages_scripts_and_runs_packager() {
        let dir = tempfile::tempdir().unwrap();
        let request = scripts(dir.path());
        let options = BuilderOptions {
            python: fake_python(dir.path(), 0),
            ..Default::default()
        };

        let outcome = build_exe(&request, &options, dir.path()).unwrap();
        assert_eq!(outcome.output_folder, dir.path().join("dist"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("staged-main")).unwrap(),
            "import helper\nprint('main')\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("staged-helper")).unwrap(),
            "def help(): pass\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("args")).unwrap(),
            "-m\nPyInstaller\n--onefile\ntemp/main.py\n"
        );
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn failing_packager_is_reported_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let request = scripts(dir.path());
        let options = BuilderOptions {
            python: fake_python(dir.path(), 1),
            ..Default::default()
        };

        let err = build_exe(&request, &options, dir.path()).unwrap_err();
        assert!(matches!(err, BuildError::PackagerFailed { .. }));
        assert!(err.to_string().contains("-m PyInstaller --onefile temp/main.py"));
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn unknown_interpreter_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let request = scripts(dir.path());
        let options = BuilderOptions {
            python: dir.path().join("no-python").to_string_lossy().to_string(),
            ..Default::default()
        };
        let result = build_exe(&request, &options, dir.path());
        assert!(matches!(result, Err(BuildError::Spawn { .. })));
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn file_name_for_labels() {
        assert_eq!(script_file_name(Path::new("/home/me/tool.py")), "tool.py");
        assert_eq!(script_file_name(Path::new("/")), "");
    }
}
