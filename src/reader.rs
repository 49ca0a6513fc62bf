//! Segment reader: frames a raw byte stream into [`Segment`]s.

use log::debug;

use crate::composition::Composition;
use crate::error::DecodeError;
use crate::object::ImageFragment;
use crate::palette::Palette;
use crate::segment::{Segment, SegmentPayload, SegmentType};
use crate::utils::BigEndianReader;
use crate::window::parse_window_list;

/// Magic marker opening every segment: "PG".
const MAGIC: u16 = 0x5047;

/// Fixed header size: marker, pts, dts, type code, payload length.
const HEADER_LEN: usize = 13;

/// Pull-based reader over one raw stream of segments.
///
/// Framing failures (bad marker, truncation) are unrecoverable: byte
/// alignment is lost and no further segments can be read. Structural
/// failures inside a known payload leave the reader positioned at the next
/// segment so the caller can scope the damage to one display set.
pub struct SegmentReader<'a> {
    reader: BigEndianReader<'a>,
}

impl<'a> SegmentReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BigEndianReader::new(data),
        }
    }

    /// Read the next segment. `Ok(None)` means the stream ended cleanly at
    /// a segment boundary. Segments with unrecognized type codes are
    /// skipped in full and never surface.
    pub fn next_segment(&mut self) -> Result<Option<Segment>, DecodeError> {
        loop {
            if self.reader.remaining() == 0 {
                return Ok(None);
            }

            let offset = self.reader.position();
            let framing = |reason| DecodeError::MalformedSegment { offset, reason };

            if self.reader.remaining() < HEADER_LEN {
                return Err(framing("truncated segment header"));
            }

            let magic = self.reader.read_u16().ok_or(framing("truncated segment header"))?;
            if magic != MAGIC {
                return Err(framing("bad marker, expected \"PG\""));
            }

            let pts = self.reader.read_u32().ok_or(framing("truncated segment header"))?;
            let dts = self.reader.read_u32().ok_or(framing("truncated segment header"))?;
            let type_code = self.reader.read_u8().ok_or(framing("truncated segment header"))?;
            let length = self.reader.read_u16().ok_or(framing("truncated segment header"))? as usize;

            let segment_type = match SegmentType::try_from(type_code) {
                Ok(segment_type) => segment_type,
                Err(code) => {
                    // Forward compatibility: skip exactly the declared
                    // payload and keep going.
                    debug!("skipping unknown segment type {code:#04x} ({length} bytes)");
                    if !self.reader.skip(length) {
                        return Err(framing("truncated segment payload"));
                    }
                    continue;
                }
            };

            let payload = self
                .reader
                .read_bytes(length)
                .ok_or(framing("truncated segment payload"))?;

            let payload = match segment_type {
                SegmentType::Palette => SegmentPayload::Palette(Palette::parse(&payload)?),
                SegmentType::ImageFragment => {
                    SegmentPayload::ImageFragment(ImageFragment::parse(&payload)?)
                }
                SegmentType::Composition => {
                    SegmentPayload::Composition(Composition::parse(&payload)?)
                }
                SegmentType::WindowList => SegmentPayload::WindowList(parse_window_list(&payload)?),
                SegmentType::EndOfDisplaySet => {
                    if !payload.is_empty() {
                        return Err(DecodeError::MalformedEnd);
                    }
                    SegmentPayload::EndOfDisplaySet
                }
            };

            return Ok(Some(Segment { pts, dts, payload }));
        }
    }
}
