//! Point-in-time view of the server's output/CRTC/mode graph
//!
//! A [`Snapshot`] owns the server session it was captured from and never
//! changes after capture. Observing server-side changes means capturing a new
//! one.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::constants::{edid, randr};
use crate::display_server::{
    CrtcId, CrtcInfo, DisplayServer, ModeId, ModeInfo, OutputId, OutputInfo, PropertyType,
    Timestamp,
};
use crate::edid::IdentificationRecord;
use crate::error::Error;

pub struct Snapshot<S: DisplayServer> {
    server: S,
    config_timestamp: Timestamp,
    outputs: Vec<OutputInfo>,
    crtcs: HashMap<CrtcId, CrtcInfo>,
    modes: Vec<ModeInfo>,
    mode_index: HashMap<ModeId, usize>,
}

impl<S: DisplayServer> Snapshot<S> {
    /// Enumerate the resource graph once over an open session
    pub fn capture(server: S) -> Result<Self, Error> {
        let resources = server.screen_resources()?;
        let config_timestamp = resources.config_timestamp;

        let mut mode_index = HashMap::with_capacity(resources.modes.len());
        for (index, mode) in resources.modes.iter().enumerate() {
            if mode_index.insert(mode.id, index).is_some() {
                warn!(mode = mode.id, "duplicate mode id in resource graph, keeping the last entry");
            }
        }

        let outputs = resources
            .outputs
            .iter()
            .map(|&output| server.output_info(output, config_timestamp))
            .collect::<Result<Vec<_>, _>>()?;

        let mut crtcs = HashMap::with_capacity(resources.crtcs.len());
        for &crtc in &resources.crtcs {
            match server.crtc_info(crtc, config_timestamp) {
                Ok(info) => {
                    crtcs.insert(crtc, info);
                }
                Err(err) => warn!(crtc, error = ?err, "Failed to fetch CRTC info"),
            }
        }

        info!(
            display = server.display_name(),
            outputs = outputs.len(),
            crtcs = crtcs.len(),
            modes = resources.modes.len(),
            "captured display resources"
        );

        Ok(Self {
            server,
            config_timestamp,
            outputs,
            crtcs,
            modes: resources.modes,
            mode_index,
        })
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Consume the snapshot, handing back the session for a fresh capture
    pub fn into_server(self) -> S {
        self.server
    }

    pub fn display_name(&self) -> &str {
        self.server.display_name()
    }

    pub fn config_timestamp(&self) -> Timestamp {
        self.config_timestamp
    }

    /// Outputs in server order
    pub fn outputs(&self) -> &[OutputInfo] {
        &self.outputs
    }

    pub fn output(&self, id: OutputId) -> Option<&OutputInfo> {
        self.outputs.iter().find(|output| output.id == id)
    }

    pub fn output_by_name(&self, name: &str) -> Option<&OutputInfo> {
        self.outputs.iter().find(|output| output.name == name)
    }

    pub fn mode(&self, id: ModeId) -> Option<&ModeInfo> {
        self.mode_index.get(&id).map(|&index| &self.modes[index])
    }

    pub fn crtc(&self, id: CrtcId) -> Option<&CrtcInfo> {
        self.crtcs.get(&id)
    }

    /// Raw identification block of an output, if it exposes one.
    ///
    /// Anything other than a non-empty 8-bit INTEGER array counts as absent.
    pub fn identification_bytes(&self, output: OutputId) -> Option<Vec<u8>> {
        let value = match self.server.output_property(
            output,
            randr::EDID_PROPERTY,
            edid::BLOCK_LENGTH as u32,
        ) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(err) => {
                warn!(output, error = ?err, "Failed to read identification property");
                return None;
            }
        };

        if value.type_ != PropertyType::Integer || value.format != 8 || value.num_items < 1 {
            debug!(
                output,
                type_ = ?value.type_,
                format = value.format,
                items = value.num_items,
                "identification property has unexpected shape"
            );
            return None;
        }

        Some(value.data)
    }

    /// Decoded identity of the monitor behind `output`
    pub fn identification(&self, output: OutputId) -> Option<IdentificationRecord> {
        let record = IdentificationRecord::from_bytes(&self.identification_bytes(output)?);
        if !record.diagnostics.is_clean() {
            debug!(output, diagnostics = ?record.diagnostics, "identification block not clean");
        }
        Some(record)
    }
}
