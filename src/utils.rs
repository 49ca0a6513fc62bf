//! Binary reading and color conversion helpers.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// Cursor over big-endian wire data (all PGS integer fields are big-endian).
///
/// Reads return `None` on exhaustion; callers map that onto the error that
/// fits their framing context.
pub struct BigEndianReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BigEndianReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len() - self.position()
    }

    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        self.cursor.read_u8().ok()
    }

    #[inline]
    pub fn read_u16(&mut self) -> Option<u16> {
        self.cursor.read_u16::<BigEndian>().ok()
    }

    #[inline]
    pub fn read_u24(&mut self) -> Option<u32> {
        let mut buf = [0u8; 3];
        self.cursor.read_exact(&mut buf).ok()?;
        Some(((buf[0] as u32) << 16) | ((buf[1] as u32) << 8) | (buf[2] as u32))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Option<u32> {
        self.cursor.read_u32::<BigEndian>().ok()
    }

    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf).ok()?;
        Some(buf)
    }

    #[inline]
    pub fn skip(&mut self, len: usize) -> bool {
        let new_pos = self.position() + len;
        if new_pos <= self.cursor.get_ref().len() {
            self.cursor.set_position(new_pos as u64);
            true
        } else {
            false
        }
    }
}

/// Convert one palette entry from Y/Cr/Cb/alpha to packed RGBA.
///
/// Fixed-point BT.601 transform with the bias terms folded into the
/// constants. Each intermediate is truncated to an integer and wrapped into
/// 16 bits before the final shift; out-of-range values wrap modulo 65536
/// rather than clamping, which is part of the output contract.
///
/// Packing is `(R << 24) | (G << 16) | (B << 8) | A`.
#[inline]
pub fn ycrcb_to_rgba(y: u8, cr: u8, cb: u8, alpha: u8) -> u32 {
    let y = y as f64;
    let cr = cr as f64;
    let cb = cb as f64;

    let t_r = 298.082 * y + 408.583 * cr - 57067.776;
    let t_g = 298.082 * y - 100.291 * cb - 208.120 * cr + 34707.456;
    let t_b = 298.082 * y + 516.412 * cb - 70870.016;

    let r = ((t_r as i64 as u16) >> 8) as u32;
    let g = ((t_g as i64 as u16) >> 8) as u32;
    let b = ((t_b as i64 as u16) >> 8) as u32;

    (r << 24) | (g << 16) | (b << 8) | alpha as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_tracks_position_and_remaining() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = BigEndianReader::new(&data);

        assert_eq!(reader.read_u16(), Some(0x0102));
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.read_u24(), Some(0x030405));
        assert_eq!(reader.read_u8(), None);
    }

    #[test]
    fn reader_skip_rejects_overrun() {
        let data = [0u8; 4];
        let mut reader = BigEndianReader::new(&data);
        assert!(reader.skip(4));
        assert!(!reader.skip(1));
    }

    #[test]
    fn video_range_white_and_black() {
        // Y=235, Cr=Cb=128 is reference white in video range. The blue
        // intermediate truncates to 65279, one shy of full scale.
        let white = ycrcb_to_rgba(235, 128, 128, 255);
        assert_eq!(white, 0xFFFFFEFF);

        // Y=16, Cr=Cb=128 is reference black.
        let black = ycrcb_to_rgba(16, 128, 128, 200);
        assert_eq!(black, 0x000000C8);
    }

    #[test]
    fn conversion_is_deterministic() {
        let a = ycrcb_to_rgba(112, 57, 201, 33);
        let b = ycrcb_to_rgba(112, 57, 201, 33);
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_intermediates_wrap() {
        // All-zero chroma pushes the intermediates far out of [0, 65535];
        // the wrapped values are stable and reproducible.
        let wrapped = ycrcb_to_rgba(0, 0, 0, 0);
        let again = ycrcb_to_rgba(0, 0, 0, 0);
        assert_eq!(wrapped, again);
        assert_eq!(wrapped & 0xFF, 0);
    }

    #[test]
    fn alpha_passes_through() {
        for alpha in [0u8, 1, 127, 255] {
            assert_eq!(ycrcb_to_rgba(180, 128, 128, alpha) & 0xFF, alpha as u32);
        }
    }
}
