//! Image fragment (Object Definition Segment) parsing and chain assembly.

use crate::error::DecodeError;
use crate::utils::BigEndianReader;

const FLAG_FIRST: u8 = 0x80;
const FLAG_LAST: u8 = 0x40;

/// One wire-level chunk of a logical image's compressed payload.
///
/// A logical image is the concatenation of all fragments sharing an `id`,
/// bounded by the one flagged first through the one flagged last. Only the
/// first fragment carries the declared size and dimensions; every fragment
/// exclusively owns its data bytes.
#[derive(Debug, Clone)]
pub struct ImageFragment {
    pub id: u16,
    pub version: u8,
    pub is_first: bool,
    pub is_last: bool,
    /// Declared total compressed size (24-bit, first fragment only)
    pub declared_size: u32,
    /// Image width in pixels (first fragment only)
    pub width: u16,
    /// Image height in pixels (first fragment only)
    pub height: u16,
    /// Compressed data chunk
    pub data: Vec<u8>,
}

impl ImageFragment {
    /// Parse an image fragment payload. First fragments carry a 7-byte
    /// size/dimensions block after the flags; continuations are raw data.
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BigEndianReader::new(payload);
        let id = reader.read_u16().ok_or(DecodeError::MalformedImage)?;
        let version = reader.read_u8().ok_or(DecodeError::MalformedImage)?;
        let flags = reader.read_u8().ok_or(DecodeError::MalformedImage)?;

        let is_first = flags & FLAG_FIRST != 0;
        let is_last = flags & FLAG_LAST != 0;

        let (declared_size, width, height) = if is_first {
            let declared_size = reader.read_u24().ok_or(DecodeError::MalformedImage)?;
            let width = reader.read_u16().ok_or(DecodeError::MalformedImage)?;
            let height = reader.read_u16().ok_or(DecodeError::MalformedImage)?;
            (declared_size, width, height)
        } else {
            (0, 0, 0)
        };

        let data = reader
            .read_bytes(reader.remaining())
            .ok_or(DecodeError::MalformedImage)?;

        Ok(Self {
            id,
            version,
            is_first,
            is_last,
            declared_size,
            width,
            height,
            data,
        })
    }
}

/// Concatenate a fragment chain into one compressed buffer, checking that
/// the chain is bounded by first/last sequence flags.
pub fn assemble_fragments(fragments: &[ImageFragment]) -> Result<Vec<u8>, DecodeError> {
    let first = fragments.first().ok_or(DecodeError::ImageNotFound)?;
    let last = fragments.last().ok_or(DecodeError::ImageNotFound)?;
    if !first.is_first || !last.is_last {
        return Err(DecodeError::InvalidImageSequence { id: first.id });
    }

    let total: usize = fragments.iter().map(|f| f.data.len()).sum();
    let mut data = Vec::with_capacity(total);
    for fragment in fragments {
        data.extend_from_slice(&fragment.data);
    }
    Ok(data)
}
