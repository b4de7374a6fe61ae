use std::path::PathBuf;

use eframe::{egui, App, Frame};
use tokio::{
    runtime::Runtime,
    sync::watch::{self, Receiver},
};

use crate::{
    exe_builder::{build_exe, script_file_name, BuildOutcome, BuildRequest},
    options::Options,
};

use super::{setup, FetchStatus};

type BuildStatus = Receiver<FetchStatus<Result<BuildOutcome, String>>>;

pub struct ExeBuilderApp {
    options: Options,
    rt: Runtime,
    work_dir: PathBuf,
    request: BuildRequest,
    main_script_label: String,
    helper_script_label: String,
    build_status: Option<BuildStatus>,
}

impl ExeBuilderApp {
    pub fn new(options: Options) -> eyre::Result<Self> {
        Ok(Self {
            options,
            rt: Runtime::new()?,
            work_dir: std::env::current_dir()?,
            request: BuildRequest::default(),
            main_script_label: "Select the main script".to_string(),
            helper_script_label: "Select the helper script".to_string(),
            build_status: None,
        })
    }

    fn pick_script(title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Python Files", &["py"])
            .pick_file()
    }

    fn start_build(&mut self) {
        if self.request.main_script.is_none() || self.request.helper_script.is_none() {
            self.main_script_label = "Please select both scripts!".to_string();
            return;
        }
        let (tx, rx) = watch::channel(FetchStatus::Fetching);
        let request = self.request.clone();
        let options = self.options.builder.clone();
        let work_dir = self.work_dir.clone();
        self.rt.spawn_blocking(move || {
            let result = build_exe(&request, &options, &work_dir).map_err(|e| e.to_string());
            let _ = tx.send(FetchStatus::Fetched(result));
        });
        self.build_status = Some(rx);
    }

    fn poll_build(&mut self, ctx: &egui::Context) {
        let result = match &self.build_status {
            Some(rx) => match &*rx.borrow() {
                FetchStatus::Fetching => {
                    ctx.request_repaint_after(std::time::Duration::from_millis(250));
                    None
                }
                FetchStatus::Fetched(result) => Some(result.clone()),
            },
            None => None,
        };
        if let Some(result) = result {
            self.build_status = None;
            self.main_script_label = match result {
                Ok(outcome) => {
                    tracing::info!(output = %outcome.output_folder.display(), "Build finished");
                    "EXE built successfully!".to_string()
                }
                Err(err) => format!("Error during build: {err}"),
            };
        }
    }
}

impl App for ExeBuilderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_build(ctx);
        let building = self.build_status.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(&self.main_script_label);
            if ui.button("Select Main Script").clicked() {
                if let Some(file) = Self::pick_script("Select Main Script") {
                    self.main_script_label =
                        format!("Main script selected: {}", script_file_name(&file));
                    self.request.main_script = Some(file);
                }
            }

            ui.label(&self.helper_script_label);
            if ui.button("Select Helper Script").clicked() {
                if let Some(file) = Self::pick_script("Select Helper Script") {
                    self.helper_script_label =
                        format!("Helper script selected: {}", script_file_name(&file));
                    self.request.helper_script = Some(file);
                }
            }

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!building, egui::Button::new("Build EXE"))
                    .clicked()
                {
                    self.start_build();
                }
                if building {
                    ui.spinner();
                }
            });
        });
    }
}

pub fn run_builder_ui(options: Options) -> eyre::Result<()> {
    let app = ExeBuilderApp::new(options)?;
    let viewport = egui::ViewportBuilder::default()
        .with_title("EXE Builder")
        .with_position([100.0, 100.0])
        .with_inner_size([400.0, 200.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "EXE Builder",
        native_options,
        Box::new(|cc| {
            setup(&cc.egui_ctx);
            Box::new(app)
        }),
    )
    .map_err(|e| eyre::eyre!("Could not initialize: {:?}", e))
}
