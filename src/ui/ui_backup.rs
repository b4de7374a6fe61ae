use std::path::PathBuf;

use crate::backups::{backup_settings_file, load_backups, restore_backup};

use super::LauncherApp;

#[derive(Default)]
pub struct BackupState {
    pub available_backups: Option<Vec<PathBuf>>,
}

impl LauncherApp {
    pub(crate) fn render_backups(&mut self, ui: &mut egui::Ui) {
        ui.heading("Backups");
        ui.label("Restore the game library from an earlier copy of the settings file");

        let available_backups = self
            .backup_state
            .available_backups
            .get_or_insert_with(load_backups);

        if available_backups.is_empty() {
            ui.label("No backups found");
        }
        let mut to_restore = None;
        for backup_path in available_backups.iter() {
            let name = backup_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            if ui.button(name).clicked() {
                to_restore = Some(backup_path.clone());
            }
        }

        if let Some(backup_path) = to_restore {
            match restore_backup(&backup_path, &self.settings_path) {
                Ok(settings) => {
                    self.path_input = settings.xenia_path.clone();
                    self.settings = settings;
                    self.set_status("Restored settings from backup");
                }
                Err(err) => {
                    tracing::error!("Failed to restore backup: {err:?}");
                    self.set_error(format!("Failed to restore backup: {err}"));
                }
            }
            self.backup_state.available_backups = None;
        }

        if ui.button("Back up settings").clicked() {
            self.save();
            match backup_settings_file(&self.settings_path) {
                Ok(_) => self.set_status("Settings backed up"),
                Err(err) => self.set_error(format!("Failed to back up settings: {err}")),
            }
            self.backup_state.available_backups = None;
        }
    }
}
