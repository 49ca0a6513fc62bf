//! Palette Definition Segment parsing and RGBA table construction.

use crate::error::DecodeError;
use crate::utils::{ycrcb_to_rgba, BigEndianReader};

/// One color definition inside a palette segment.
#[derive(Debug, Clone, Copy)]
pub struct PaletteEntry {
    /// Slot this entry occupies (0-255)
    pub index: u8,
    /// Luma
    pub y: u8,
    /// Red-difference chroma
    pub cr: u8,
    /// Blue-difference chroma
    pub cb: u8,
    /// Opacity, passed through to the output unchanged
    pub alpha: u8,
}

/// Palette Definition Segment: an id/version pair and its color entries.
///
/// Entries are kept in arrival order rather than eagerly converted, since a
/// later composition decides which palette actually gets rendered.
#[derive(Debug, Clone)]
pub struct Palette {
    pub id: u8,
    pub version: u8,
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Parse a palette payload: id, version, then 5-byte entries until the
    /// payload is exhausted.
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BigEndianReader::new(payload);
        let id = reader.read_u8().ok_or(DecodeError::MalformedPalette)?;
        let version = reader.read_u8().ok_or(DecodeError::MalformedPalette)?;

        if reader.remaining() % 5 != 0 {
            return Err(DecodeError::MalformedPalette);
        }

        let mut entries = Vec::with_capacity(reader.remaining() / 5);
        while reader.remaining() > 0 {
            let index = reader.read_u8().ok_or(DecodeError::MalformedPalette)?;
            let y = reader.read_u8().ok_or(DecodeError::MalformedPalette)?;
            let cr = reader.read_u8().ok_or(DecodeError::MalformedPalette)?;
            let cb = reader.read_u8().ok_or(DecodeError::MalformedPalette)?;
            let alpha = reader.read_u8().ok_or(DecodeError::MalformedPalette)?;
            entries.push(PaletteEntry {
                index,
                y,
                cr,
                cb,
                alpha,
            });
        }

        Ok(Self {
            id,
            version,
            entries,
        })
    }

    /// Build the 256-slot RGBA lookup table for this palette.
    ///
    /// Every slot starts as fully transparent black; indices never mentioned
    /// by an entry stay that way. Repeated indices overwrite in arrival
    /// order.
    pub fn rgba_table(&self) -> [u32; 256] {
        let mut table = [0u32; 256];
        for entry in &self.entries {
            table[entry.index as usize] = ycrcb_to_rgba(entry.y, entry.cr, entry.cb, entry.alpha);
        }
        table
    }
}
