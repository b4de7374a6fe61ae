use copypasta::ClipboardProvider;
use eframe::egui;
use egui::{RichText, ScrollArea};
use egui_extras::{Column, TableBuilder};

use crate::{
    library::{add_games, find_games_in_folder, remove_game, RESOLUTIONS},
    settings::UiType,
};

use super::{
    ui_colors::{ERROR_COLOR, TEXT_COLOR},
    LauncherApp, Screen, SECTION_SPACING,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

impl LauncherApp {
    pub(crate) fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Settings").size(24.0).strong().color(TEXT_COLOR));
        });

        ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                self.render_emulator_settings(ui);
                ui.add_space(SECTION_SPACING);
                self.render_library_settings(ui);
                ui.add_space(SECTION_SPACING);
                self.render_backups(ui);
                ui.add_space(SECTION_SPACING);

                if ui.button("Back").clicked() {
                    self.screen = Screen::Home;
                }
                self.render_status(ui);
                ui.label(format!("Version: {VERSION}"));
            });
    }

    fn render_emulator_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Xenia");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.path_input)
                .hint_text("Xenia Emulator Path")
                .desired_width(f32::INFINITY),
        );
        if response.lost_focus() {
            let path = self.path_input.trim().to_string();
            self.set_xenia_path(path);
        }
        if !self.settings.xenia_path.is_empty() {
            let path = std::path::Path::new(&self.settings.xenia_path);
            if !path.exists() {
                ui.colored_label(ERROR_COLOR, "The emulator was not found at this path");
            } else if cfg!(target_family = "unix") && !is_executable::is_executable(path) {
                ui.colored_label(ERROR_COLOR, "This file is not executable");
            }
        }

        ui.horizontal(|ui| {
            if ui.button("Browse").clicked() {
                let picked = rfd::FileDialog::new()
                    .set_title("Select Xenia Executable")
                    .add_filter("Executable Files", &["exe"])
                    .pick_file();
                if let Some(file_path) = picked {
                    self.set_xenia_path(file_path.to_string_lossy().to_string());
                }
            }
            let install_button = ui
                .add_enabled(!self.is_installing(), egui::Button::new("Install Xenia"))
                .on_hover_text("Download Xenia into the launcher folder");
            if install_button.clicked() {
                self.start_install();
            }
        });

        let mut ui_type = self.settings.ui_type;
        egui::ComboBox::from_label("Layout")
            .selected_text(ui_type.name())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut ui_type, UiType::Metro, UiType::Metro.name());
                ui.selectable_value(&mut ui_type, UiType::List, UiType::List.name());
            });
        if ui_type != self.settings.ui_type {
            self.settings.ui_type = ui_type;
            self.save();
        }
    }

    fn render_library_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Games");
        if ui.button("Add Games").clicked() {
            if let Some(folder_path) = rfd::FileDialog::new()
                .set_title("Select Game Folder")
                .pick_folder()
            {
                self.add_games_from_folder(&folder_path);
            }
        }

        if self.settings.game_library.is_empty() {
            ui.label("No games available");
            return;
        }

        let mut changed = false;
        let mut to_remove = None;
        let mut to_copy = None;
        let games = &mut self.settings.game_library;
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().clip(true))
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Game");
                });
                header.col(|ui| {
                    ui.strong("Resolution");
                });
                header.col(|ui| {
                    ui.strong("FPS");
                });
                header.col(|_| {});
                header.col(|_| {});
            })
            .body(|mut body| {
                for (index, game) in games.iter_mut().enumerate() {
                    body.row(28.0, |mut row| {
                        row.col(|ui| {
                            ui.label(game.display_name()).on_hover_text(&game.path);
                        });
                        row.col(|ui| {
                            egui::ComboBox::from_id_source(("resolution", index))
                                .selected_text(game.resolution.as_str())
                                .show_ui(ui, |ui| {
                                    for resolution in RESOLUTIONS {
                                        if ui
                                            .selectable_label(game.resolution == resolution, resolution)
                                            .clicked()
                                        {
                                            game.resolution = resolution.to_string();
                                            changed = true;
                                        }
                                    }
                                });
                        });
                        row.col(|ui| {
                            changed |= ui.checkbox(&mut game.fps_counter, "").changed();
                        });
                        row.col(|ui| {
                            if ui.button("Copy path").clicked() {
                                to_copy = Some(game.path.clone());
                            }
                        });
                        row.col(|ui| {
                            if ui.button("Remove").clicked() {
                                to_remove = Some(game.path.clone());
                            }
                        });
                    });
                }
            });

        if let Some(path) = to_remove {
            changed |= remove_game(&mut self.settings, &path);
        }
        if let Some(path) = to_copy {
            copy_to_clipboard(path);
        }
        if changed {
            self.save();
        }
    }

    pub(crate) fn add_games_from_folder(&mut self, folder_path: &std::path::Path) {
        let games = find_games_in_folder(folder_path, &self.options.library.game_extensions);
        if games.is_empty() {
            self.set_status("No games found in that folder");
            return;
        }
        let added = add_games(&mut self.settings, &games, &self.options.library);
        tracing::info!(folder = %folder_path.display(), found = games.len(), added, "Scanned game folder");
        self.save();
        self.set_status(format!("Added {added} new game(s)"));
    }
}

fn copy_to_clipboard(content: String) {
    match copypasta::ClipboardContext::new() {
        Ok(mut clipboard_ctx) => {
            if let Err(err) = clipboard_ctx.set_contents(content) {
                tracing::warn!("Could not copy to clipboard: {err}");
            }
        }
        Err(err) => tracing::warn!("Clipboard not available: {err}"),
    }
}
