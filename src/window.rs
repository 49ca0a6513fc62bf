//! Window Definition Segment parsing.

use crate::error::DecodeError;
use crate::utils::BigEndianReader;

/// A named on-screen rectangle that composition objects are placed into.
///
/// Windows are always resolved by `id`; ids are not guaranteed to be
/// contiguous or zero-based.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub id: u8,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Parse a window list payload: a count byte followed by that many fixed
/// 9-byte window records. The records must consume the payload exactly.
pub fn parse_window_list(payload: &[u8]) -> Result<Vec<Window>, DecodeError> {
    let mut reader = BigEndianReader::new(payload);
    let count = reader.read_u8().ok_or(DecodeError::MalformedWindowList)? as usize;

    if reader.remaining() != count * 9 {
        return Err(DecodeError::MalformedWindowList);
    }

    let mut windows = Vec::with_capacity(count);
    for _ in 0..count {
        let id = reader.read_u8().ok_or(DecodeError::MalformedWindowList)?;
        let x = reader.read_u16().ok_or(DecodeError::MalformedWindowList)?;
        let y = reader.read_u16().ok_or(DecodeError::MalformedWindowList)?;
        let width = reader.read_u16().ok_or(DecodeError::MalformedWindowList)?;
        let height = reader.read_u16().ok_or(DecodeError::MalformedWindowList)?;
        windows.push(Window {
            id,
            x,
            y,
            width,
            height,
        });
    }

    Ok(windows)
}
