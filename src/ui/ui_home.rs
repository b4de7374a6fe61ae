use eframe::egui;
use egui::{Button, RichText, ScrollArea};
use tokio::sync::watch;

use crate::{
    emulator::{is_emulator_running, run_game},
    settings::UiType,
};

use super::{
    ui_colors::{ACCENT_COLOR, ERROR_COLOR, TEXT_COLOR},
    FetchStatus, LauncherApp, Screen, SECTION_SPACING,
};

const TILE_HEIGHT: f32 = 60.0;

impl LauncherApp {
    pub(crate) fn render_home(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Xenia Game Launcher")
                    .size(24.0)
                    .strong()
                    .color(TEXT_COLOR),
            );
        });
        ui.add_space(SECTION_SPACING);

        let bottom_height = 60.0;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height((ui.available_height() - bottom_height).max(0.0))
            .show(ui, |ui| {
                self.render_game_grid(ui);
            });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add(Button::new(RichText::new("Settings").color(TEXT_COLOR)).fill(ACCENT_COLOR))
                    .clicked()
                {
                    self.screen = Screen::Settings;
                }
                self.render_status(ui);
            });
        });
    }

    pub(crate) fn render_status(&self, ui: &mut egui::Ui) {
        if self.is_installing() || self.running_game.is_some() {
            ui.spinner();
        }
        if let Some((name, _)) = &self.running_game {
            ui.label(format!("Running {name}"));
        } else if !self.status.is_empty() {
            if self.status_error {
                ui.colored_label(ERROR_COLOR, &self.status);
            } else {
                ui.label(&self.status);
            }
        }
    }

    fn render_game_grid(&mut self, ui: &mut egui::Ui) {
        if self.settings.game_library.is_empty() {
            ui.label("No games available");
            return;
        }
        let columns = match self.settings.ui_type {
            UiType::Metro => self.options.library.grid_columns.max(1),
            UiType::List => 1,
        };
        let spacing = ui.spacing().item_spacing.x;
        let tile_width =
            ((ui.available_width() - spacing * (columns as f32 - 1.0)) / columns as f32).max(50.0);
        let can_launch = self.running_game.is_none();

        let mut clicked = None;
        egui::Grid::new("game_grid")
            .num_columns(columns)
            .spacing([spacing, spacing])
            .show(ui, |ui| {
                for (index, game) in self.settings.game_library.iter().enumerate() {
                    let tile = Button::new(RichText::new(game.label()).color(TEXT_COLOR))
                        .fill(ACCENT_COLOR)
                        .wrap(true)
                        .min_size(egui::vec2(tile_width, TILE_HEIGHT));
                    let response = ui
                        .add_enabled(can_launch, tile)
                        .on_hover_text(&game.path);
                    if response.clicked() {
                        clicked = Some(game.path.clone());
                    }
                    if (index + 1) % columns == 0 {
                        ui.end_row();
                    }
                }
            });

        if let Some(game_path) = clicked {
            self.launch(game_path);
        }
    }

    pub(crate) fn launch(&mut self, game_path: String) {
        if self.settings.xenia_path.is_empty() {
            self.set_error("Xenia path is not set!");
            return;
        }
        if is_emulator_running(&self.settings, &self.options) {
            self.set_error("Xenia is already running");
            return;
        }
        let name = self
            .settings
            .game_library
            .iter()
            .find(|g| g.path == game_path)
            .map(|g| g.display_name())
            .unwrap_or_else(|| game_path.clone());
        let (tx, rx) = watch::channel(FetchStatus::Fetching);
        let settings = self.settings.clone();
        let options = self.options.clone();
        self.rt.spawn_blocking(move || {
            let result = run_game(&settings, &options, &game_path).map_err(|e| e.to_string());
            let _ = tx.send(FetchStatus::Fetched(result));
        });
        self.running_game = Some((name, rx));
    }
}
