use eframe::egui;

use crate::catalog::OutputCatalog;
use crate::display_server::ModeId;
use crate::gui::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTableAction {
    None,
    Select(ModeId),
    Activate(ModeId),
}

/// Striped table of an output's modes: XID, Preferred, Mode, Refresh, Pixclock
pub fn ui(ui: &mut egui::Ui, catalog: &OutputCatalog, selected: Option<ModeId>) -> ModeTableAction {
    let mut action = ModeTableAction::None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new(("mode_table", catalog.output))
                .striped(true)
                .num_columns(6)
                .spacing([SECTION_SPACING, ITEM_SPACING])
                .show(ui, |ui| {
                    for heading in ["XID", "Preferred", "Mode", "Refresh", "Pixclock", ""] {
                        ui.label(egui::RichText::new(heading).strong());
                    }
                    ui.end_row();

                    for entry in &catalog.entries {
                        let is_selected = selected == Some(entry.mode_id);
                        let xid = egui::RichText::new(&entry.id_label)
                            .monospace()
                            .color(XID_COLOR);
                        let response = ui.selectable_label(is_selected, xid);

                        ui.label(if entry.preferred { PREFERRED_MARKER } else { "" });
                        ui.label(&entry.name);
                        ui.monospace(&entry.refresh);
                        ui.monospace(&entry.pixel_clock);
                        ui.label(if entry.current { CURRENT_MARKER } else { "" });
                        ui.end_row();

                        if response.double_clicked() {
                            action = ModeTableAction::Activate(entry.mode_id);
                        } else if response.clicked() {
                            action = ModeTableAction::Select(entry.mode_id);
                        }
                    }
                });
        });

    action
}
