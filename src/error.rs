use thiserror::Error;

use crate::display_server::{CrtcId, ModeId, OutputId, SetConfigStatus};

/// Underlying cause reported by the display server binding
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Operational failures of the display-configuration core.
///
/// Soft problems (bad identification blocks, dangling mode references) are
/// never reported through this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open display server session")]
    Connection(#[source] BoxError),

    #[error("output {output:#x} is not driven by any CRTC")]
    NoCrtc { output: OutputId },

    #[error("server rejected mode {mode:#x} on CRTC {crtc:#x}: {status}")]
    ServerRejected {
        crtc: CrtcId,
        mode: ModeId,
        status: SetConfigStatus,
    },

    #[error("output {0:#x} is not part of the snapshot")]
    UnknownOutput(OutputId),

    #[error("output {output:#x} does not advertise mode {mode:#x}")]
    ModeNotAdvertised { output: OutputId, mode: ModeId },

    #[error("display server request failed")]
    Protocol(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_protocol_error_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset");
        let err = Error::Protocol(Box::new(cause));

        assert_eq!(err.to_string(), "display server request failed");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "connection reset");
    }

    #[test]
    fn test_connection_error_chain_through_anyhow() {
        let err = Error::Connection("RandR extension not available".into());
        let chained = format!("{:#}", anyhow::Error::from(err));

        assert_eq!(
            chained,
            "failed to open display server session: RandR extension not available"
        );
    }
}
