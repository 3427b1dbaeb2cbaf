use eframe::egui;

use crate::catalog::OutputCatalog;

/// Tab strip with one entry per catalogued output.
/// Returns true when the selection changed.
pub fn ui(ui: &mut egui::Ui, catalogs: &[OutputCatalog], selected_idx: &mut usize) -> bool {
    let before = *selected_idx;

    ui.horizontal_wrapped(|ui| {
        for (idx, catalog) in catalogs.iter().enumerate() {
            ui.selectable_value(selected_idx, idx, &catalog.label)
                .on_hover_text(hover_text(catalog));
        }
    });

    *selected_idx != before
}

fn hover_text(catalog: &OutputCatalog) -> String {
    let mut text = match &catalog.identification {
        Some(record) => {
            let mut text = format!(
                "{} {}",
                record.manufacturer.as_deref().unwrap_or("???"),
                record.display_name()
            );
            if !record.checksum_valid() {
                text.push_str("\nEDID checksum failed");
            }
            if !record.header_valid() {
                text.push_str("\nEDID header incorrect");
            }
            text
        }
        None => format!("{}: no identification data", catalog.output_name),
    };

    if let Some(entry) = catalog.current_entry() {
        text.push_str(&format!("\nCurrent: {} {}", entry.name, entry.refresh.trim()));
    }
    if !catalog.unresolved.is_empty() {
        text.push_str(&format!("\n{} advertised mode(s) missing", catalog.unresolved.len()));
    }
    text
}
