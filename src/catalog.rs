//! Per-output mode catalogs ready for presentation

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::format::{HZ_PER_MHZ, XID_HEX_WIDTH};
use crate::display_server::{DisplayServer, ModeId, ModeInfo, OutputId, OutputInfo};
use crate::edid::IdentificationRecord;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeCatalogEntry {
    pub mode_id: ModeId,
    /// e.g. "0x000001c4"
    pub id_label: String,
    pub name: String,
    /// e.g. " 59.95Hz"
    pub refresh: String,
    /// e.g. "148.500MHz"
    pub pixel_clock: String,
    pub preferred: bool,
    /// The mode the output's CRTC is driving right now
    pub current: bool,
    pub refresh_hz: f64,
    pub width: u16,
    pub height: u16,
}

impl ModeCatalogEntry {
    fn new(mode: &ModeInfo, preferred: bool, current: bool) -> Self {
        let refresh_hz = mode.refresh_hz();
        Self {
            mode_id: mode.id,
            id_label: format_mode_id(mode.id),
            name: mode.name.clone(),
            refresh: format!("{refresh_hz:6.2}Hz"),
            pixel_clock: format!("{:6.3}MHz", f64::from(mode.dot_clock) / HZ_PER_MHZ),
            preferred,
            current,
            refresh_hz,
            width: mode.width,
            height: mode.height,
        }
    }
}

pub fn format_mode_id(id: ModeId) -> String {
    format!("0x{id:0width$x}", width = XID_HEX_WIDTH)
}

/// Everything a presentation layer shows for one output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputCatalog {
    pub output: OutputId,
    pub output_name: String,
    /// "<output name>(<model name>)"
    pub label: String,
    pub identification: Option<IdentificationRecord>,
    pub entries: Vec<ModeCatalogEntry>,
    /// Advertised mode ids missing from the global mode table
    pub unresolved: Vec<ModeId>,
}

impl OutputCatalog {
    pub fn current_entry(&self) -> Option<&ModeCatalogEntry> {
        self.entries.iter().find(|entry| entry.current)
    }
}

pub fn output_label(output_name: &str, model_name: &str) -> String {
    format!("{output_name}({model_name})")
}

/// Build the catalog for one output.
///
/// Returns `None` for outputs that are disconnected or not driven by a CRTC.
pub fn build<S: DisplayServer>(snapshot: &Snapshot<S>, output: &OutputInfo) -> Option<OutputCatalog> {
    if !output.is_connected() {
        debug!(output = %output.name, "skipping disconnected output");
        return None;
    }

    let Some(crtc_id) = output.crtc else {
        debug!(output = %output.name, "skipping output without CRTC");
        return None;
    };

    let Some(crtc) = snapshot.crtc(crtc_id) else {
        warn!(output = %output.name, crtc = crtc_id, "CRTC missing from snapshot, skipping output");
        return None;
    };

    let identification = snapshot.identification(output.id);
    let model_name = identification
        .as_ref()
        .map(IdentificationRecord::display_name)
        .unwrap_or("");
    let label = output_label(&output.name, model_name);

    let mut entries = Vec::with_capacity(output.modes.len());
    let mut unresolved = Vec::new();
    for (position, &mode_id) in output.modes.iter().enumerate() {
        let Some(mode) = snapshot.mode(mode_id) else {
            warn!(output = %output.name, mode = mode_id, "advertised mode missing from mode table");
            unresolved.push(mode_id);
            continue;
        };

        let preferred = position < usize::from(output.num_preferred);
        let current = crtc.mode == Some(mode_id);
        entries.push(ModeCatalogEntry::new(mode, preferred, current));
    }

    Some(OutputCatalog {
        output: output.id,
        output_name: output.name.clone(),
        label,
        identification,
        entries,
        unresolved,
    })
}

/// Catalogs for every connected, active output in server order
pub fn build_all<S: DisplayServer>(snapshot: &Snapshot<S>) -> Vec<OutputCatalog> {
    snapshot
        .outputs()
        .iter()
        .filter_map(|output| build(snapshot, output))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_server::fake::{crtc, mode, output, FakeServer};
    use crate::display_server::{ConnectionState, ModeFlags};
    use crate::edid::tests::named_block;

    fn modes() -> Vec<ModeInfo> {
        vec![
            mode(0x40, "1920x1080", 148_500_000, 2200, 1125),
            mode(0x41, "1280x720", 74_250_000, 1650, 750),
            mode(0x42, "1024x768", 65_000_000, 1344, 806),
            mode(0x43, "800x600", 40_000_000, 1056, 628),
        ]
    }

    fn snapshot_with(output_info: OutputInfo) -> Snapshot<FakeServer> {
        let mut server = FakeServer::with_modes(modes());
        let crtc_id = output_info.crtc;
        let output_id = output_info.id;
        server.add_output(output_info);
        if let Some(id) = crtc_id {
            server.add_crtc(crtc(id, Some(0x41), vec![output_id]));
        }
        Snapshot::capture(server).unwrap()
    }

    #[test]
    fn test_entry_formatting() {
        let snapshot = snapshot_with(output(0x50, "DP-1", Some(0x60), vec![0x40], 1));
        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();

        let entry = &catalog.entries[0];
        assert_eq!(entry.id_label, "0x00000040");
        assert_eq!(entry.name, "1920x1080");
        assert_eq!(entry.refresh, " 60.00Hz");
        assert_eq!(entry.pixel_clock, "148.500MHz");
        assert!(entry.preferred);
    }

    #[test]
    fn test_refresh_formatting_respects_flags() {
        let mut server = FakeServer::with_modes(vec![ModeInfo {
            flags: ModeFlags {
                doublescan: false,
                interlace: true,
            },
            ..mode(0x70, "1920x1080i", 74_250_000, 2200, 1125)
        }]);
        server.add_output(output(0x50, "HDMI-1", Some(0x60), vec![0x70], 0));
        server.add_crtc(crtc(0x60, Some(0x70), vec![0x50]));
        let snapshot = Snapshot::capture(server).unwrap();

        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();
        assert_eq!(catalog.entries[0].refresh, " 60.00Hz");
        assert_eq!(catalog.entries[0].pixel_clock, "74.250MHz");
    }

    #[test]
    fn test_preferred_prefix() {
        let snapshot = snapshot_with(output(0x50, "DP-1", Some(0x60), vec![0x42, 0x40, 0x43, 0x41], 2));
        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();

        let preferred: Vec<bool> = catalog.entries.iter().map(|e| e.preferred).collect();
        assert_eq!(preferred, vec![true, true, false, false]);
        let ids: Vec<ModeId> = catalog.entries.iter().map(|e| e.mode_id).collect();
        assert_eq!(ids, vec![0x42, 0x40, 0x43, 0x41]);
    }

    #[test]
    fn test_unresolved_mode_skipped_in_order() {
        let snapshot = snapshot_with(output(0x50, "DP-1", Some(0x60), vec![0x43, 0x99, 0x40, 0x41], 0));
        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();

        let ids: Vec<ModeId> = catalog.entries.iter().map(|e| e.mode_id).collect();
        assert_eq!(ids, vec![0x43, 0x40, 0x41]);
        assert_eq!(catalog.unresolved, vec![0x99]);
    }

    #[test]
    fn test_preferred_counts_advertised_positions() {
        // The dangling id still occupies a preferred slot
        let snapshot = snapshot_with(output(0x50, "DP-1", Some(0x60), vec![0x99, 0x40, 0x41], 2));
        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();

        let preferred: Vec<bool> = catalog.entries.iter().map(|e| e.preferred).collect();
        assert_eq!(preferred, vec![true, false]);
    }

    #[test]
    fn test_current_mode_marked() {
        let snapshot = snapshot_with(output(0x50, "DP-1", Some(0x60), vec![0x40, 0x41], 1));
        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();

        assert_eq!(catalog.current_entry().map(|e| e.mode_id), Some(0x41));
    }

    #[test]
    fn test_disconnected_output_skipped() {
        let mut info = output(0x50, "DP-1", Some(0x60), vec![0x40], 1);
        info.connection = ConnectionState::Disconnected;
        let snapshot = snapshot_with(info);

        assert!(build(&snapshot, &snapshot.outputs()[0]).is_none());
        assert!(build_all(&snapshot).is_empty());
    }

    #[test]
    fn test_output_without_crtc_skipped() {
        let snapshot = snapshot_with(output(0x50, "DP-2", None, vec![0x40], 1));
        assert!(build(&snapshot, &snapshot.outputs()[0]).is_none());
    }

    #[test]
    fn test_label_with_model_name() {
        let mut server = FakeServer::with_modes(modes());
        server.add_output(output(0x50, "DP-1", Some(0x60), vec![0x40], 1));
        server.add_crtc(crtc(0x60, Some(0x40), vec![0x50]));
        server.set_edid(0x50, &named_block("U2720Q"));
        let snapshot = Snapshot::capture(server).unwrap();

        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();
        assert_eq!(catalog.label, "DP-1(U2720Q)");
        assert!(catalog.identification.is_some());
    }

    #[test]
    fn test_label_without_identification() {
        let snapshot = snapshot_with(output(0x50, "eDP-1", Some(0x60), vec![0x40], 1));
        let catalog = build(&snapshot, &snapshot.outputs()[0]).unwrap();

        assert_eq!(catalog.label, "eDP-1()");
        assert!(catalog.identification.is_none());
    }

    #[test]
    fn test_build_is_recomputable() {
        let snapshot = snapshot_with(output(0x50, "DP-1", Some(0x60), vec![0x40, 0x41], 1));
        assert_eq!(build_all(&snapshot), build_all(&snapshot));
    }
}
