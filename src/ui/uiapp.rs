use std::{path::PathBuf, process::ExitStatus};

use eframe::{egui, App, Frame};
use egui::{Rounding, Stroke};
use tokio::{
    runtime::Runtime,
    sync::watch::{self, Receiver},
};

use crate::{
    config::get_settings_file,
    emulator::{install_emulator, needs_install, InstallProgress},
    options::Options,
    settings::{ensure_settings_file, load_settings, save_settings, Settings},
};

use super::{
    ui_colors::{
        ACCENT_COLOR, BACKGROUND_COLOR, BG_STROKE_COLOR, EXTRA_BACKGROUND_COLOR,
        LIGHT_ACCENT_COLOR, TEXT_COLOR,
    },
    BackupState, FetchStatus,
};

pub(crate) type RunningGame = (String, Receiver<FetchStatus<Result<ExitStatus, String>>>);

#[derive(PartialEq, Clone, Copy, Default, Debug)]
pub(crate) enum Screen {
    #[default]
    Home,
    Settings,
}

pub struct LauncherApp {
    pub(crate) screen: Screen,
    pub(crate) settings: Settings,
    pub(crate) settings_path: PathBuf,
    pub(crate) options: Options,
    pub(crate) rt: Runtime,
    pub(crate) path_input: String,
    pub(crate) status: String,
    pub(crate) status_error: bool,
    pub(crate) install_status: Option<Receiver<InstallProgress>>,
    pub(crate) running_game: Option<RunningGame>,
    pub(crate) backup_state: BackupState,
}

impl LauncherApp {
    pub fn new(options: Options) -> eyre::Result<Self> {
        let runtime = Runtime::new()?;
        let settings_path = get_settings_file(&options);
        let settings = load_settings(&settings_path);
        if let Err(err) = ensure_settings_file(&settings_path, &settings) {
            tracing::error!("Could not create settings file: {err:?}");
        }
        let mut app = Self {
            screen: Screen::Home,
            path_input: settings.xenia_path.clone(),
            settings,
            settings_path,
            options,
            rt: runtime,
            status: String::new(),
            status_error: false,
            install_status: None,
            running_game: None,
            backup_state: BackupState::default(),
        };
        if needs_install(&app.settings) {
            app.start_install();
        }
        Ok(app)
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
        self.status_error = false;
    }

    pub(crate) fn set_error<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
        self.status_error = true;
    }

    pub(crate) fn save(&mut self) {
        if let Err(err) = save_settings(&self.settings_path, &self.settings) {
            tracing::error!("Failed to save settings: {err:?}");
            self.set_error(format!("Failed to save settings: {err}"));
        }
    }

    pub(crate) fn set_xenia_path(&mut self, path: String) {
        self.path_input = path.clone();
        if self.settings.xenia_path != path {
            self.settings.xenia_path = path;
            self.save();
        }
    }

    pub(crate) fn is_installing(&self) -> bool {
        self.install_status
            .as_ref()
            .map(|rx| !matches!(&*rx.borrow(), InstallProgress::Done(_) | InstallProgress::Failed(_)))
            .unwrap_or(false)
    }

    pub(crate) fn start_install(&mut self) {
        if self.is_installing() {
            return;
        }
        let (tx, rx) = watch::channel(InstallProgress::NotStarted);
        let options = self.options.clone();
        self.rt.spawn(async move {
            let sender = Some(tx);
            let progress = match install_emulator(&options, &sender).await {
                Ok(path) => InstallProgress::Done(path),
                Err(err) => {
                    tracing::error!("Error installing Xenia: {err:?}");
                    InstallProgress::Failed(err.to_string())
                }
            };
            if let Some(sender) = &sender {
                let _ = sender.send(progress);
            }
        });
        self.install_status = Some(rx);
    }

    fn poll_install(&mut self, ctx: &egui::Context) {
        let progress = match &self.install_status {
            Some(rx) => rx.borrow().clone(),
            None => return,
        };
        match progress {
            InstallProgress::Done(path) => {
                self.install_status = None;
                self.set_xenia_path(path.to_string_lossy().to_string());
                self.set_status("Xenia installed successfully!");
            }
            InstallProgress::Failed(err) => {
                self.install_status = None;
                self.set_error(format!("Error installing Xenia: {err}"));
            }
            InstallProgress::NotStarted => {
                ctx.request_repaint();
            }
            InstallProgress::Downloading { downloaded, total } => {
                self.set_status(match total {
                    Some(total) if total > 0 => format!(
                        "Downloading Xenia {:.0}%",
                        downloaded as f64 / total as f64 * 100.0
                    ),
                    _ => format!("Downloading Xenia {} KiB", downloaded / 1024),
                });
                ctx.request_repaint();
            }
            InstallProgress::Extracting => {
                self.set_status("Extracting Xenia");
                ctx.request_repaint();
            }
        }
    }

    fn poll_running_game(&mut self, ctx: &egui::Context) {
        let finished = match &self.running_game {
            Some((name, rx)) => match &*rx.borrow() {
                FetchStatus::Fetching => {
                    ctx.request_repaint_after(std::time::Duration::from_millis(500));
                    None
                }
                FetchStatus::Fetched(Ok(status)) => Some(Ok(format!("{name} exited ({status})"))),
                FetchStatus::Fetched(Err(err)) => Some(Err(err.to_string())),
            },
            None => None,
        };
        match finished {
            Some(Ok(message)) => {
                self.running_game = None;
                self.set_status(message);
            }
            Some(Err(message)) => {
                self.running_game = None;
                self.set_error(message);
            }
            None => {}
        }
    }
}

impl App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_install(ctx);
        self.poll_running_game(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Home => self.render_home(ui),
            Screen::Settings => self.render_settings(ui),
        });
    }
}

pub(crate) fn create_style(style: &mut egui::Style) {
    style.spacing.item_spacing = egui::vec2(10.0, 10.0);
    style.spacing.button_padding = egui::vec2(10.0, 10.0);
    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BACKGROUND_COLOR;
    style.visuals.window_fill = BACKGROUND_COLOR;
    style.visuals.override_text_color = Some(TEXT_COLOR);
    style.visuals.widgets.noninteractive.rounding = Rounding::ZERO;
    style.visuals.extreme_bg_color = EXTRA_BACKGROUND_COLOR;
    style.visuals.widgets.inactive.bg_fill = ACCENT_COLOR;
    style.visuals.widgets.inactive.weak_bg_fill = ACCENT_COLOR;
    style.visuals.widgets.inactive.rounding = Rounding::ZERO;
    style.visuals.widgets.hovered.bg_fill = LIGHT_ACCENT_COLOR;
    style.visuals.widgets.hovered.weak_bg_fill = LIGHT_ACCENT_COLOR;
    style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, TEXT_COLOR);
    style.visuals.widgets.hovered.rounding = Rounding::ZERO;
    style.visuals.widgets.active.bg_fill = ACCENT_COLOR;
    style.visuals.widgets.active.weak_bg_fill = ACCENT_COLOR;
    style.visuals.widgets.active.rounding = Rounding::ZERO;
    style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BG_STROKE_COLOR);
    style.visuals.selection.bg_fill = ACCENT_COLOR;
}

pub(crate) fn setup(ctx: &egui::Context) {
    let mut style: egui::Style = (*ctx.style()).clone();
    create_style(&mut style);
    ctx.set_style(style);
}

pub fn run_ui(options: Options) -> eyre::Result<()> {
    let app = LauncherApp::new(options)?;
    let viewport = egui::ViewportBuilder::default()
        .with_title("Xbox 360 Metro UI")
        .with_position([100.0, 100.0])
        .with_inner_size([900.0, 600.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let run_result = eframe::run_native(
        "Xbox 360 Metro UI",
        native_options,
        Box::new(|cc| {
            setup(&cc.egui_ctx);
            Box::new(app)
        }),
    );
    run_result.map_err(|e| eyre::eyre!("Could not initialize: {:?}", e))
}
