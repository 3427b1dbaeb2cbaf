//! Mode switcher window implemented with egui/eframe

use anyhow::{anyhow, Result};
use eframe::{egui, CreationContext, NativeOptions};
use tracing::{error, info};

use super::components::mode_table::{self, ModeTableAction};
use super::components::output_tabs;
use super::constants::*;
use crate::catalog::{self, OutputCatalog};
use crate::config::Config;
use crate::display_server::{ModeId, OutputId};
use crate::snapshot::Snapshot;
use crate::switch;
use crate::x11::{self, X11Server};

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct ModeswitchApp {
    display: Option<String>,
    snapshot: Option<Snapshot<X11Server>>,
    catalogs: Vec<OutputCatalog>,
    selected_tab: usize,
    selected_mode: Option<ModeId>,
    status_message: Option<StatusMessage>,
}

impl ModeswitchApp {
    fn new(_cc: &CreationContext<'_>, display: Option<String>, snapshot: Option<Snapshot<X11Server>>) -> Self {
        let mut app = Self {
            display,
            snapshot: None,
            catalogs: Vec::new(),
            selected_tab: 0,
            selected_mode: None,
            status_message: None,
        };

        match snapshot {
            Some(snapshot) => app.install(snapshot),
            None => app.recapture(),
        }

        app
    }

    fn install(&mut self, snapshot: Snapshot<X11Server>) {
        self.catalogs = catalog::build_all(&snapshot);
        self.snapshot = Some(snapshot);
        if self.selected_tab >= self.catalogs.len() {
            self.selected_tab = 0;
        }
        self.selected_mode = None;
    }

    /// Capture a fresh snapshot, reusing the open session when there is one
    fn recapture(&mut self) {
        let result = match self.snapshot.take() {
            Some(snapshot) => Snapshot::capture(snapshot.into_server()),
            None => x11::capture(self.display.as_deref()),
        };

        match result {
            Ok(snapshot) => self.install(snapshot),
            Err(err) => {
                error!(error = ?err, "Failed to capture display resources");
                self.catalogs.clear();
                self.status_message = Some(StatusMessage {
                    text: describe(err),
                    color: STATUS_ERROR,
                });
            }
        }
    }

    fn activate(&mut self, output: OutputId, mode: ModeId) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };

        match switch::apply(snapshot, output, mode) {
            Ok(()) => {
                self.status_message = Some(StatusMessage {
                    text: format!("Switched to {}", catalog::format_mode_id(mode)),
                    color: STATUS_OK,
                });
                self.recapture();
            }
            Err(err) => {
                error!(error = ?err, output, mode, "Failed to switch mode");
                self.status_message = Some(StatusMessage {
                    text: describe(err),
                    color: STATUS_ERROR,
                });
            }
        }
    }
}

impl eframe::App for ModeswitchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut activate: Option<(OutputId, ModeId)> = None;

        egui::TopBottomPanel::top("outputs").show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                if ui.button("\u{1F504} Refresh").clicked() {
                    info!("Refresh requested from UI");
                    self.recapture();
                }
            });
            if output_tabs::ui(ui, &self.catalogs, &mut self.selected_tab) {
                self.selected_mode = None;
            }
            ui.add_space(ITEM_SPACING);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                let target = self.catalogs.get(self.selected_tab).map(|c| c.output);
                let apply = egui::Button::new("Apply");
                let enabled = target.is_some() && self.selected_mode.is_some();
                if ui.add_enabled(enabled, apply).clicked() {
                    activate = target.zip(self.selected_mode);
                }
                if let Some(message) = &self.status_message {
                    ui.colored_label(message.color, &message.text);
                }
            });
            ui.add_space(ITEM_SPACING);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(catalog) = self.catalogs.get(self.selected_tab) else {
                ui.label("No connected output is driven by a CRTC.");
                return;
            };

            match mode_table::ui(ui, catalog, self.selected_mode) {
                ModeTableAction::None => {}
                ModeTableAction::Select(mode) => self.selected_mode = Some(mode),
                ModeTableAction::Activate(mode) => {
                    self.selected_mode = Some(mode);
                    activate = Some((catalog.output, mode));
                }
            }
        });

        if let Some((output, mode)) = activate {
            self.activate(output, mode);
        }
    }
}

/// Error text with its cause chain, e.g. "failed to open ...: <reason>"
fn describe(err: crate::error::Error) -> String {
    format!("{:#}", anyhow::Error::from(err))
}

/// Open the display and run the window until it is closed
pub fn run_gui(config: &Config, display: Option<String>) -> Result<()> {
    // Capture before the window exists so the title can name the display
    let snapshot = match x11::capture(display.as_deref()) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            error!(error = ?err, "Initial capture failed");
            None
        }
    };
    let display_name = snapshot
        .as_ref()
        .map(|s| s.display_name().to_string())
        .or_else(|| display.clone())
        .unwrap_or_default();
    let title = format!("modeswitch {display_name}");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([f32::from(config.window_width), f32::from(config.window_height)])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title(title.as_str()),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(ModeswitchApp::new(cc, display, snapshot)))),
    )
    .map_err(|err| anyhow!("Failed to launch egui window: {err}"))
}
