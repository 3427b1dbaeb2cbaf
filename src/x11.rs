//! RandR implementation of the display server binding
//!
//! Every method is a single blocking round trip over an x11rb
//! `RustConnection`. Timeouts and cancellation are left to the connection.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};
use x11rb::protocol::randr::{self, ConnectionExt as RandrExt};
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt as XprotoExt, Window};
use x11rb::rust_connection::RustConnection;

use crate::constants::randr::*;
use crate::display_server::{
    ConnectionState, CrtcConfig, CrtcId, CrtcInfo, DisplayServer, ModeFlags, ModeInfo, OutputId,
    OutputInfo, PropertyType, PropertyValue, ScreenResources, SetConfigStatus, Timestamp,
};
use crate::error::Error;
use crate::snapshot::Snapshot;

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Protocol(Box::new(err))
    }
}

impl From<ReplyError> for Error {
    fn from(err: ReplyError) -> Self {
        Error::Protocol(Box::new(err))
    }
}

impl From<ConnectError> for Error {
    fn from(err: ConnectError) -> Self {
        Error::Connection(Box::new(err))
    }
}

/// Open session to an X server with RandR 1.2 or newer
pub struct X11Server {
    conn: RustConnection,
    root: Window,
    display_name: String,
    /// Interned property names; NONE when the server does not know the name
    atoms: RefCell<HashMap<Vec<u8>, Atom>>,
}

impl X11Server {
    /// Connect to `display` (or `$DISPLAY`) and resolve the default screen's root
    pub fn open(display: Option<&str>) -> Result<Self, Error> {
        let (conn, screen_num) = x11rb::connect(display)?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| Error::Connection(format!("screen {screen_num} not found").into()))?;

        if conn
            .extension_information(randr::X11_EXTENSION_NAME)
            .map_err(|err| Error::Connection(err.into()))?
            .is_none()
        {
            return Err(Error::Connection("RandR extension not available".into()));
        }

        let version = conn
            .randr_query_version(REQUEST_MAJOR_VERSION, REQUEST_MINOR_VERSION)
            .map_err(|err| Error::Connection(err.into()))?
            .reply()
            .map_err(|err| Error::Connection(err.into()))?;
        if (version.major_version, version.minor_version) < (MIN_MAJOR_VERSION, MIN_MINOR_VERSION) {
            return Err(Error::Connection(format!(
                "RandR {}.{} too old, need {MIN_MAJOR_VERSION}.{MIN_MINOR_VERSION}",
                version.major_version, version.minor_version
            )
            .into()));
        }

        let display_name = display
            .map(str::to_owned)
            .or_else(|| std::env::var("DISPLAY").ok())
            .unwrap_or_default();
        debug!(
            display = %display_name,
            screen = screen_num,
            root,
            randr = %format!("{}.{}", version.major_version, version.minor_version),
            "connected to X server"
        );

        Ok(Self {
            conn,
            root,
            display_name,
            atoms: RefCell::new(HashMap::new()),
        })
    }

    fn atom(&self, name: &[u8]) -> Result<Atom, Error> {
        if let Some(&atom) = self.atoms.borrow().get(name) {
            return Ok(atom);
        }
        let atom = self.conn.intern_atom(true, name)?.reply()?.atom;
        self.atoms.borrow_mut().insert(name.to_vec(), atom);
        Ok(atom)
    }
}

/// Open the default display and capture its resources
pub fn capture(display: Option<&str>) -> Result<Snapshot<X11Server>, Error> {
    Snapshot::capture(X11Server::open(display)?)
}

fn mode_info(mode: &randr::ModeInfo, name: &[u8]) -> ModeInfo {
    let flags = u32::from(mode.mode_flags);
    ModeInfo {
        id: mode.id,
        name: String::from_utf8_lossy(name).into_owned(),
        width: mode.width,
        height: mode.height,
        dot_clock: mode.dot_clock,
        h_total: mode.htotal,
        v_total: mode.vtotal,
        flags: ModeFlags {
            doublescan: flags & u32::from(randr::ModeFlag::DOUBLE_SCAN) != 0,
            interlace: flags & u32::from(randr::ModeFlag::INTERLACE) != 0,
        },
    }
}

/// Output and CRTC info replies carry a status; anything but SUCCESS means
/// the reply fields are not meaningful
fn check_reply_status(status: randr::SetConfig, request: &str, id: u32) -> Result<(), Error> {
    if status == randr::SetConfig::SUCCESS {
        Ok(())
    } else {
        Err(Error::Protocol(
            format!("{request} for {id:#x} returned status {}", u8::from(status)).into(),
        ))
    }
}

fn nonzero(id: u32) -> Option<u32> {
    (id != x11rb::NONE).then_some(id)
}

impl DisplayServer for X11Server {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn screen_resources(&self) -> Result<ScreenResources, Error> {
        let reply = self.conn.randr_get_screen_resources(self.root)?.reply()?;

        // Mode names are packed back to back in `names`
        let mut names = reply.names.as_slice();
        let mut modes = Vec::with_capacity(reply.modes.len());
        for mode in &reply.modes {
            let (name, rest) = names.split_at(usize::from(mode.name_len).min(names.len()));
            names = rest;
            modes.push(mode_info(mode, name));
        }

        Ok(ScreenResources {
            config_timestamp: reply.config_timestamp,
            outputs: reply.outputs,
            crtcs: reply.crtcs,
            modes,
        })
    }

    fn output_info(&self, output: OutputId, config_timestamp: Timestamp) -> Result<OutputInfo, Error> {
        let reply = self
            .conn
            .randr_get_output_info(output, config_timestamp)?
            .reply()?;
        check_reply_status(reply.status, "GetOutputInfo", output)?;

        let connection = if reply.connection == randr::Connection::CONNECTED {
            ConnectionState::Connected
        } else if reply.connection == randr::Connection::DISCONNECTED {
            ConnectionState::Disconnected
        } else {
            ConnectionState::Unknown
        };

        Ok(OutputInfo {
            id: output,
            name: String::from_utf8_lossy(&reply.name).into_owned(),
            connection,
            crtc: nonzero(reply.crtc),
            modes: reply.modes,
            num_preferred: reply.num_preferred,
        })
    }

    fn crtc_info(&self, crtc: CrtcId, config_timestamp: Timestamp) -> Result<CrtcInfo, Error> {
        let reply = self.conn.randr_get_crtc_info(crtc, config_timestamp)?.reply()?;
        check_reply_status(reply.status, "GetCrtcInfo", crtc)?;
        Ok(CrtcInfo {
            id: crtc,
            x: reply.x,
            y: reply.y,
            mode: nonzero(reply.mode),
            rotation: u16::from(reply.rotation),
            outputs: reply.outputs,
        })
    }

    fn output_property(
        &self,
        output: OutputId,
        name: &[u8],
        max_bytes: u32,
    ) -> Result<Option<PropertyValue>, Error> {
        let property = self.atom(name)?;
        if property == x11rb::NONE {
            return Ok(None);
        }

        let reply = self
            .conn
            .randr_get_output_property(
                output,
                property,
                AtomEnum::ANY,
                0,
                max_bytes.div_ceil(PROPERTY_UNIT_BYTES),
                false,
                false,
            )?
            .reply()?;

        let type_ = if reply.type_ == u32::from(AtomEnum::INTEGER) {
            PropertyType::Integer
        } else {
            PropertyType::Other(reply.type_)
        };

        Ok(Some(PropertyValue {
            type_,
            format: reply.format,
            num_items: reply.num_items,
            data: reply.data,
        }))
    }

    fn set_crtc_config(&self, crtc: CrtcId, config: &CrtcConfig) -> Result<SetConfigStatus, Error> {
        let reply = self
            .conn
            .randr_set_crtc_config(
                crtc,
                x11rb::CURRENT_TIME,
                config.config_timestamp,
                config.x,
                config.y,
                config.mode,
                randr::Rotation::from(config.rotation),
                &config.outputs,
            )?
            .reply()?;

        let status = if reply.status == randr::SetConfig::SUCCESS {
            SetConfigStatus::Success
        } else if reply.status == randr::SetConfig::INVALID_CONFIG_TIME {
            SetConfigStatus::InvalidConfigTime
        } else if reply.status == randr::SetConfig::INVALID_TIME {
            SetConfigStatus::InvalidTime
        } else {
            SetConfigStatus::Failed
        };
        debug!(crtc, mode = config.mode, ?status, "SetCrtcConfig");
        Ok(status)
    }
}
