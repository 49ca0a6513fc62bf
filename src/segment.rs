//! Segment framing types.

use crate::composition::Composition;
use crate::object::ImageFragment;
use crate::palette::Palette;
use crate::window::Window;

/// Segment type identifiers on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentType {
    /// Palette Definition Segment (0x14)
    Palette = 0x14,
    /// Object Definition Segment carrying image data (0x15)
    ImageFragment = 0x15,
    /// Presentation Composition Segment (0x16)
    Composition = 0x16,
    /// Window Definition Segment (0x17)
    WindowList = 0x17,
    /// End of display set (0x80)
    EndOfDisplaySet = 0x80,
}

impl TryFrom<u8> for SegmentType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x14 => Ok(SegmentType::Palette),
            0x15 => Ok(SegmentType::ImageFragment),
            0x16 => Ok(SegmentType::Composition),
            0x17 => Ok(SegmentType::WindowList),
            0x80 => Ok(SegmentType::EndOfDisplaySet),
            _ => Err(value),
        }
    }
}

/// A segment's payload, decoded once at the framing layer so downstream
/// code pattern-matches instead of re-testing numeric type codes. Unknown
/// wire types are skipped by the reader and never reach this type.
#[derive(Debug, Clone)]
pub enum SegmentPayload {
    Palette(Palette),
    ImageFragment(ImageFragment),
    Composition(Composition),
    WindowList(Vec<Window>),
    EndOfDisplaySet,
}

/// One framed segment: timestamps plus a decoded payload.
///
/// Timestamps are opaque 90kHz counters; the decoder passes them through
/// without interpretation.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Presentation timestamp
    pub pts: u32,
    /// Decoding timestamp
    pub dts: u32,
    pub payload: SegmentPayload,
}
