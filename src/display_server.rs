//! Display server binding
//!
//! The core never talks to X directly. Everything it needs from the server
//! goes through [`DisplayServer`], a set of blocking round trips that the
//! x11rb backend implements and tests replace with an in-memory fake.

use serde::Serialize;

use crate::error::Error;
use crate::timing;

pub type OutputId = u32;
pub type CrtcId = u32;
pub type ModeId = u32;

/// Server timestamp, used to detect stale configurations
pub type Timestamp = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeFlags {
    pub doublescan: bool,
    pub interlace: bool,
}

/// One entry of the global mode table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeInfo {
    pub id: ModeId,
    pub name: String,
    pub width: u16,
    pub height: u16,
    /// Pixel clock in Hz
    pub dot_clock: u32,
    pub h_total: u16,
    pub v_total: u16,
    pub flags: ModeFlags,
}

impl ModeInfo {
    pub fn refresh_hz(&self) -> f64 {
        timing::refresh_hz(
            self.dot_clock,
            self.h_total,
            self.v_total,
            self.flags.doublescan,
            self.flags.interlace,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputInfo {
    pub id: OutputId,
    pub name: String,
    pub connection: ConnectionState,
    pub crtc: Option<CrtcId>,
    /// Advertised modes; the first `num_preferred` are preferred
    pub modes: Vec<ModeId>,
    pub num_preferred: u16,
}

impl OutputInfo {
    pub fn is_connected(&self) -> bool {
        self.connection != ConnectionState::Disconnected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrtcInfo {
    pub id: CrtcId,
    pub x: i16,
    pub y: i16,
    pub mode: Option<ModeId>,
    /// Raw RandR rotation/reflection bits
    pub rotation: u16,
    pub outputs: Vec<OutputId>,
}

/// The resource graph rooted at the default screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenResources {
    pub config_timestamp: Timestamp,
    pub outputs: Vec<OutputId>,
    pub crtcs: Vec<CrtcId>,
    pub modes: Vec<ModeInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Integer,
    Other(u32),
}

/// Raw reply to an output property read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    pub type_: PropertyType,
    /// Element width in bits (8, 16 or 32)
    pub format: u8,
    pub num_items: u32,
    pub data: Vec<u8>,
}

/// Everything needed to drive a CRTC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrtcConfig {
    pub config_timestamp: Timestamp,
    pub x: i16,
    pub y: i16,
    pub mode: ModeId,
    pub rotation: u16,
    pub outputs: Vec<OutputId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SetConfigStatus {
    Success,
    InvalidConfigTime,
    InvalidTime,
    Failed,
}

impl std::fmt::Display for SetConfigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SetConfigStatus::Success => "success",
            SetConfigStatus::InvalidConfigTime => "configuration changed since snapshot",
            SetConfigStatus::InvalidTime => "request timestamp out of date",
            SetConfigStatus::Failed => "configuration refused",
        };
        f.write_str(text)
    }
}

/// Blocking round trips to the display server. Opening the session is the
/// implementation's constructor.
pub trait DisplayServer {
    /// Human-readable name of the connected display, e.g. ":0"
    fn display_name(&self) -> &str;

    /// Global resource graph of the default screen's root window
    fn screen_resources(&self) -> Result<ScreenResources, Error>;

    fn output_info(&self, output: OutputId, config_timestamp: Timestamp) -> Result<OutputInfo, Error>;

    fn crtc_info(&self, crtc: CrtcId, config_timestamp: Timestamp) -> Result<CrtcInfo, Error>;

    /// Read at most `max_bytes` of a named output property.
    /// `Ok(None)` when the property name is unknown to the server.
    fn output_property(
        &self,
        output: OutputId,
        name: &[u8],
        max_bytes: u32,
    ) -> Result<Option<PropertyValue>, Error>;

    fn set_crtc_config(&self, crtc: CrtcId, config: &CrtcConfig) -> Result<SetConfigStatus, Error>;
}
