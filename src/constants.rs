//! Application-wide constants
//!
//! Protocol values, identification block layout and display formatting live
//! here so every module agrees on them.

/// RandR protocol constants
pub mod randr {
    /// Minimum RandR version with output/CRTC resources (1.2)
    pub const MIN_MAJOR_VERSION: u32 = 1;
    pub const MIN_MINOR_VERSION: u32 = 2;

    /// Version we ask the server for
    pub const REQUEST_MAJOR_VERSION: u32 = 1;
    pub const REQUEST_MINOR_VERSION: u32 = 5;

    /// Output property holding the monitor identification block
    pub const EDID_PROPERTY: &[u8] = b"EDID";

    /// Property reads are expressed in 32-bit units on the wire
    pub const PROPERTY_UNIT_BYTES: u32 = 4;
}

/// Monitor identification block (EDID base block) layout
pub mod edid {
    /// Size of the base block; extension blocks are not decoded
    pub const BLOCK_LENGTH: usize = 128;

    /// Fixed 8-byte header
    pub const HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

    /// Big-endian packed manufacturer ID (three 5-bit letters)
    pub const MANUFACTURER_OFFSET: usize = 0x08;

    /// First of the four 18-byte descriptor blocks
    pub const DESCRIPTOR_START: usize = 0x36;
    pub const DESCRIPTOR_STRIDE: usize = 0x12;
    pub const DESCRIPTOR_COUNT: usize = 4;

    /// Descriptor tag (byte 3) for the display product name
    pub const TAG_MODEL_NAME: u8 = 0xFC;

    /// Text payload of a descriptor starts at byte 5 and is 13 bytes long
    pub const TEXT_OFFSET: usize = 5;
    pub const TEXT_LENGTH: usize = 13;

    /// Line-feed terminates descriptor text; the rest is padding
    pub const TEXT_TERMINATOR: u8 = 0x0A;

    /// Descriptor text is printable ASCII
    pub const TEXT_PRINTABLE: std::ops::RangeInclusive<u8> = 0x20..=0x7E;
}

/// Catalog formatting
pub mod format {
    /// Hex digits used for mode identifiers (32-bit XIDs)
    pub const XID_HEX_WIDTH: usize = 8;

    pub const HZ_PER_MHZ: f64 = 1_000_000.0;
}

/// Configuration file location
pub mod config {
    /// Directory under the XDG config dir
    pub const APP_DIR: &str = "modeswitch";

    pub const FILENAME: &str = "config.toml";
}
