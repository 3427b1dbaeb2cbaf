//! Committing a mode to an output's CRTC

use tracing::{info, warn};

use crate::display_server::{CrtcConfig, DisplayServer, ModeId, OutputId, SetConfigStatus};
use crate::error::Error;
use crate::snapshot::Snapshot;

/// Drive `output` with `mode` on the CRTC it is currently bound to.
///
/// Position and rotation of the CRTC are kept and the CRTC ends up driving
/// only `output`. The server applies the change atomically or not at all, so
/// a failure leaves the previous configuration in place.
pub fn apply<S: DisplayServer>(snapshot: &Snapshot<S>, output: OutputId, mode: ModeId) -> Result<(), Error> {
    let info = snapshot.output(output).ok_or(Error::UnknownOutput(output))?;
    let crtc_id = info.crtc.ok_or(Error::NoCrtc { output })?;

    if !info.modes.contains(&mode) {
        return Err(Error::ModeNotAdvertised { output, mode });
    }

    // Without the CRTC's placement a commit would move or unrotate the output
    let Some(crtc) = snapshot.crtc(crtc_id) else {
        warn!(crtc = crtc_id, output = %info.name, "CRTC info missing from snapshot");
        return Err(Error::NoCrtc { output });
    };

    let config = CrtcConfig {
        config_timestamp: snapshot.config_timestamp(),
        x: crtc.x,
        y: crtc.y,
        mode,
        rotation: crtc.rotation,
        outputs: vec![output],
    };

    match snapshot.server().set_crtc_config(crtc_id, &config)? {
        SetConfigStatus::Success => {
            info!(output = %info.name, crtc = crtc_id, mode, "mode applied");
            Ok(())
        }
        status => Err(Error::ServerRejected {
            crtc: crtc_id,
            mode,
            status,
        }),
    }
}
