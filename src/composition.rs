//! Presentation Composition Segment parsing.

use crate::error::DecodeError;
use crate::utils::BigEndianReader;

const OBJ_FLAG_CROPPED: u8 = 0x80;
const OBJ_FLAG_FORCED_ON: u8 = 0x40;

const PALETTE_FLAG_UPDATE: u8 = 0x80;

const STATE_EPOCH_START: u8 = 0x80;

/// Frame-rate code for 24 fps, the only rate this dialect defines.
const FRAME_RATE_24: u8 = 0x10;

/// How a display set relates to the running epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionState {
    /// Starts a new epoch; its display set becomes the baseline.
    EpochStart,
    /// Renders from the current baseline.
    Normal,
}

/// Reference to an image placed inside a window.
#[derive(Debug, Clone, Copy)]
pub struct CompositionObject {
    pub id: u16,
    pub window_id: u8,
    pub cropped: bool,
    /// Subtitle must be shown regardless of player preference
    pub forced: bool,
    pub x: u16,
    pub y: u16,
}

/// Presentation Composition Segment: display plane geometry, epoch state,
/// the palette to render with, and the objects to place.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Display plane width
    pub width: u16,
    /// Display plane height
    pub height: u16,
    /// Raw frame-rate code from the wire
    pub frame_rate: u8,
    pub number: u16,
    pub state: CompositionState,
    /// Palette-only update, passed through
    pub palette_update: bool,
    pub palette_id: u8,
    pub objects: Vec<CompositionObject>,
}

impl Composition {
    /// Parse a composition payload. The fixed 11-byte head is followed by
    /// `object_count` 8-byte object records which must consume the payload
    /// exactly.
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BigEndianReader::new(payload);
        let width = reader.read_u16().ok_or(DecodeError::MalformedComposition)?;
        let height = reader.read_u16().ok_or(DecodeError::MalformedComposition)?;
        let frame_rate = reader.read_u8().ok_or(DecodeError::MalformedComposition)?;
        let number = reader.read_u16().ok_or(DecodeError::MalformedComposition)?;
        let state_code = reader.read_u8().ok_or(DecodeError::MalformedComposition)?;
        let palette_flags = reader.read_u8().ok_or(DecodeError::MalformedComposition)?;
        let palette_id = reader.read_u8().ok_or(DecodeError::MalformedComposition)?;
        let count = reader.read_u8().ok_or(DecodeError::MalformedComposition)? as usize;

        if reader.remaining() != count * 8 {
            return Err(DecodeError::MalformedComposition);
        }

        let mut objects = Vec::with_capacity(count);
        for _ in 0..count {
            let id = reader.read_u16().ok_or(DecodeError::MalformedComposition)?;
            let window_id = reader.read_u8().ok_or(DecodeError::MalformedComposition)?;
            let flags = reader.read_u8().ok_or(DecodeError::MalformedComposition)?;
            let x = reader.read_u16().ok_or(DecodeError::MalformedComposition)?;
            let y = reader.read_u16().ok_or(DecodeError::MalformedComposition)?;
            objects.push(CompositionObject {
                id,
                window_id,
                cropped: flags & OBJ_FLAG_CROPPED != 0,
                forced: flags & OBJ_FLAG_FORCED_ON != 0,
                x,
                y,
            });
        }

        // Only the epoch-start code is significant; anything else behaves
        // as a normal update.
        let state = if state_code == STATE_EPOCH_START {
            CompositionState::EpochStart
        } else {
            CompositionState::Normal
        };

        Ok(Self {
            width,
            height,
            frame_rate,
            number,
            state,
            palette_update: palette_flags & PALETTE_FLAG_UPDATE != 0,
            palette_id,
            objects,
        })
    }

    /// Frames per second for this composition's rate code, 0 if unknown.
    pub fn fps(&self) -> u32 {
        match self.frame_rate {
            FRAME_RATE_24 => 24,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(state: u8, count: u8) -> Vec<u8> {
        vec![
            0x07, 0x80, // width 1920
            0x04, 0x38, // height 1080
            0x10, // frame rate code
            0x00, 0x05, // composition number
            state, 0x00, // state, palette flags
            0x02, // palette id
            count,
        ]
    }

    #[test]
    fn parse_epoch_start_with_object() {
        let mut payload = head(0x80, 1);
        payload.extend_from_slice(&[
            0x00, 0x01, // object id
            0x03, // window id
            0x40, // forced
            0x00, 0x10, 0x00, 0x20, // x, y
        ]);
        let comp = Composition::parse(&payload).unwrap();
        assert_eq!(comp.width, 1920);
        assert_eq!(comp.height, 1080);
        assert_eq!(comp.state, CompositionState::EpochStart);
        assert_eq!(comp.fps(), 24);
        assert_eq!(comp.palette_id, 2);
        assert_eq!(comp.objects.len(), 1);
        assert!(comp.objects[0].forced);
        assert!(!comp.objects[0].cropped);
        assert_eq!(comp.objects[0].window_id, 3);
    }

    #[test]
    fn non_epoch_start_codes_are_normal() {
        for code in [0x00u8, 0x40, 0x7F] {
            let comp = Composition::parse(&head(code, 0)).unwrap();
            assert_eq!(comp.state, CompositionState::Normal);
        }
    }

    #[test]
    fn unknown_frame_rate_code_is_zero_fps() {
        let mut payload = head(0x00, 0);
        payload[4] = 0x42;
        assert_eq!(Composition::parse(&payload).unwrap().fps(), 0);
    }

    #[test]
    fn object_records_must_fill_payload() {
        let mut payload = head(0x80, 2);
        payload.extend_from_slice(&[0u8; 8]); // declares 2 objects, holds 1
        assert!(matches!(
            Composition::parse(&payload),
            Err(DecodeError::MalformedComposition)
        ));
    }

    #[test]
    fn truncated_head_is_malformed() {
        assert!(matches!(
            Composition::parse(&[0x07, 0x80, 0x04]),
            Err(DecodeError::MalformedComposition)
        ));
    }
}
