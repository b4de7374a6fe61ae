use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::config::get_config_folder;

fn get_lock_file_path() -> PathBuf {
    get_config_folder().join("xenia-frontend.lock")
}

/// Held for as long as the launcher window is open
pub struct InstanceLock {
    _file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Fails when the lock file names a process that is still alive.
    pub fn acquire() -> Result<Self, String> {
        Self::acquire_at(get_lock_file_path())
    }

    fn acquire_at(lock_path: PathBuf) -> Result<Self, String> {
        if let Some(parent) = lock_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        if let Some(pid) = read_lock_pid(&lock_path) {
            if pid != std::process::id() as usize && is_process_running(pid) {
                return Err(format!(
                    "Another instance of the launcher is already running (PID: {pid})"
                ));
            }
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| format!("Failed to create lock file: {e}"))?;
        write!(file, "{}", std::process::id())
            .map_err(|e| format!("Failed to write lock file: {e}"))?;
        Ok(InstanceLock {
            _file: file,
            path: lock_path,
        })
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn read_lock_pid(lock_path: &Path) -> Option<usize> {
    let mut contents = String::new();
    File::open(lock_path)
        .ok()?
        .read_to_string(&mut contents)
        .ok()?;
    contents.trim().parse::<usize>().ok()
}

fn is_process_running(pid: usize) -> bool {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);
    system.process(Pid::from(pid)).is_some()
}
