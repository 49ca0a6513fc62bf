//! Run-length decoder for PGS subtitle bitmaps.
//!
//! The encoding mixes literal palette indices with zero-escaped runs:
//! - a non-zero byte is one pixel of that palette index
//! - `0x00 0x00` ends the current line
//! - `0x00 0xNN` (NN in 1-63) is NN pixels of index 0
//! - `0x00 0x4N 0xLL` is N*256+LL pixels of index 0
//! - `0x00 0x8N 0xCC` is N pixels of index CC (N in 1-63)
//! - `0x00 0xCN 0xLL 0xCC` is N*256+LL pixels of index CC

use crate::error::DecodeError;

/// Decoder states between consumed bytes. Escape arguments ride along in
/// the state so the loop stays a single byte-at-a-time fold.
#[derive(Clone, Copy)]
enum State {
    Normal,
    Escape,
    EscapeArg1(u8),
    EscapeArg2(u8, u8),
}

/// Expand one logical image's concatenated RLE payload into a
/// `width * height` RGBA raster using the given 256-entry palette.
///
/// The write cursor starts at element 0 and advances left-to-right,
/// top-to-bottom; an end-of-line code rounds it up to the next row
/// boundary. The entire input must be consumed: ending mid-escape is
/// [`TruncatedImage`](DecodeError::TruncatedImage), and any run landing
/// past the raster is [`RasterOverflow`](DecodeError::RasterOverflow).
pub fn decode_rle(
    data: &[u8],
    width: u16,
    height: u16,
    palette: &[u32; 256],
) -> Result<Vec<u32>, DecodeError> {
    let w = width as usize;
    let mut raster = vec![0u32; w * height as usize];
    let mut cursor = 0usize;
    let mut state = State::Normal;

    let overflow = || DecodeError::RasterOverflow { width, height };

    let mut emit = |cursor: &mut usize, run: usize, color: u32| {
        let end = *cursor + run;
        if end > raster.len() {
            return Err(overflow());
        }
        raster[*cursor..end].fill(color);
        *cursor = end;
        Ok(())
    };

    for &byte in data {
        state = match state {
            State::Normal => {
                if byte != 0 {
                    emit(&mut cursor, 1, palette[byte as usize])?;
                    State::Normal
                } else {
                    State::Escape
                }
            }
            State::Escape => {
                if byte == 0 {
                    // End of line: advance to the next row boundary. A
                    // cursor already on a boundary just closed a full row.
                    if w > 0 {
                        cursor = cursor.div_ceil(w) * w;
                    }
                    State::Normal
                } else if byte & 0xC0 == 0 {
                    emit(&mut cursor, byte as usize, palette[0])?;
                    State::Normal
                } else {
                    State::EscapeArg1(byte)
                }
            }
            State::EscapeArg1(arg1) => match arg1 & 0xC0 {
                0x40 => {
                    let run = (((arg1 & 0x3F) as usize) << 8) | byte as usize;
                    emit(&mut cursor, run, palette[0])?;
                    State::Normal
                }
                0x80 => {
                    emit(&mut cursor, (arg1 & 0x3F) as usize, palette[byte as usize])?;
                    State::Normal
                }
                0xC0 => State::EscapeArg2(arg1, byte),
                _ => return Err(DecodeError::InvalidRunCode { code: arg1 }),
            },
            State::EscapeArg2(arg1, arg2) => {
                let run = (((arg1 & 0x3F) as usize) << 8) | arg2 as usize;
                emit(&mut cursor, run, palette[byte as usize])?;
                State::Normal
            }
        };
    }

    if !matches!(state, State::Normal) {
        return Err(DecodeError::TruncatedImage);
    }

    Ok(raster)
}
